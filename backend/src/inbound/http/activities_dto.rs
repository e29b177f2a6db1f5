//! Request and response shapes for the activity endpoints.
//!
//! Query parameters arrive as raw strings and are parsed field by field so
//! every rejection carries the offending field in its details. Listing
//! parameters resolve the deprecated `search` alias here, before the domain
//! query is constructed; the echoed `filters` block reports the effective
//! term.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use pagination::{PageMeta, PageRequest, PageRequestError};

use crate::domain::activity_service::ActivityListing;
use crate::domain::{
    Activity, ActivityCategory, ActivityDraft, ActivityQuery, ActivityStatus, ActivityUpdate,
    CountRange, DateRange, Error, SortDirection, SortField, SortKey,
};
use crate::inbound::http::validation::{
    ErrorCode, FieldName, field_error, parse_enum, parse_iso_timestamp, parse_non_negative_i32,
    parse_optional_enum, parse_search_term, parse_u32,
};

/// Maximum accepted length of a search term, in characters.
const SEARCH_TERM_MAX_LEN: usize = 100;

/// Raw query parameters of `GET /api/v1/activities`.
///
/// All fields are optional strings; defaults and validation are applied when
/// converting into [`ActivityQuery`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListActivitiesParams {
    /// One-based page number; defaults to 1.
    pub page: Option<String>,
    /// Page size between 1 and 100; defaults to 10.
    pub limit: Option<String>,
    /// Status equality filter.
    pub status: Option<String>,
    /// Category equality filter.
    pub category: Option<String>,
    /// Free-text term matched against title, description, and location.
    pub keyword: Option<String>,
    /// Deprecated alias of `keyword`, honoured only when `keyword` is absent.
    pub search: Option<String>,
    /// Sort field; defaults to `date`.
    pub sort_by: Option<String>,
    /// Sort direction; defaults to `desc`.
    pub sort_order: Option<String>,
    /// Inclusive lower occurrence-date bound (ISO date).
    pub date_from: Option<String>,
    /// Inclusive upper occurrence-date bound (ISO date).
    pub date_to: Option<String>,
    /// Inclusive lower participant-count bound.
    pub participants_min: Option<String>,
    /// Inclusive upper participant-count bound.
    pub participants_max: Option<String>,
}

fn map_page_request_error(err: PageRequestError) -> Error {
    let field = match err {
        PageRequestError::PageOutOfRange { .. } => FieldName::new("page"),
        PageRequestError::LimitOutOfRange { .. } => FieldName::new("limit"),
    };
    field_error(field, ErrorCode::OutOfRange, err.to_string())
}

impl TryFrom<ListActivitiesParams> for ActivityQuery {
    type Error = Error;

    fn try_from(params: ListActivitiesParams) -> Result<Self, Self::Error> {
        let page_number = params
            .page
            .as_deref()
            .map(|raw| parse_u32(raw, FieldName::new("page")))
            .transpose()?
            .unwrap_or(PageRequest::DEFAULT_PAGE);
        let limit = params
            .limit
            .as_deref()
            .map(|raw| parse_u32(raw, FieldName::new("limit")))
            .transpose()?
            .unwrap_or(PageRequest::DEFAULT_LIMIT);
        let page = PageRequest::new(page_number, limit).map_err(map_page_request_error)?;

        let status = parse_optional_enum::<ActivityStatus>(
            params.status.as_deref(),
            FieldName::new("status"),
        )?;
        let category = parse_optional_enum::<ActivityCategory>(
            params.category.as_deref(),
            FieldName::new("category"),
        )?;

        // The keyword parameter wins over the deprecated alias; whichever is
        // chosen becomes the effective term used for filtering and echoing.
        let keyword = params
            .keyword
            .map(|raw| parse_search_term(raw, FieldName::new("keyword"), SEARCH_TERM_MAX_LEN))
            .transpose()?;
        let keyword = match keyword {
            Some(term) => Some(term),
            None => params
                .search
                .map(|raw| parse_search_term(raw, FieldName::new("search"), SEARCH_TERM_MAX_LEN))
                .transpose()?,
        };

        let sort = SortKey {
            field: parse_optional_enum::<SortField>(
                params.sort_by.as_deref(),
                FieldName::new("sortBy"),
            )?
            .unwrap_or_default(),
            direction: parse_optional_enum::<SortDirection>(
                params.sort_order.as_deref(),
                FieldName::new("sortOrder"),
            )?
            .unwrap_or_default(),
        };

        let date_from = params
            .date_from
            .as_deref()
            .map(|raw| parse_iso_timestamp(raw, FieldName::new("dateFrom")))
            .transpose()?;
        let date_to = params
            .date_to
            .as_deref()
            .map(|raw| parse_iso_timestamp(raw, FieldName::new("dateTo")))
            .transpose()?;
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if to < from {
                return Err(field_error(
                    FieldName::new("dateTo"),
                    ErrorCode::OutOfRange,
                    "dateTo must not be earlier than dateFrom",
                ));
            }
        }

        let participants_min = params
            .participants_min
            .as_deref()
            .map(|raw| parse_non_negative_i32(raw, FieldName::new("participantsMin")))
            .transpose()?;
        let participants_max = params
            .participants_max
            .as_deref()
            .map(|raw| parse_non_negative_i32(raw, FieldName::new("participantsMax")))
            .transpose()?;
        if let (Some(min), Some(max)) = (participants_min, participants_max) {
            if max < min {
                return Err(field_error(
                    FieldName::new("participantsMax"),
                    ErrorCode::OutOfRange,
                    "participantsMax must be greater than or equal to participantsMin",
                ));
            }
        }

        Ok(Self {
            page,
            status,
            category,
            keyword,
            sort,
            date_range: DateRange { from: date_from, to: date_to },
            participants_range: CountRange { min: participants_min, max: participants_max },
        })
    }
}

/// Request payload for creating an activity.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequestBody {
    /// Event name, 3-200 characters.
    pub title: String,
    /// Long-form description, 10-2000 characters.
    pub description: String,
    /// Occurrence time (ISO date).
    #[schema(format = "date-time")]
    pub date: String,
    /// Venue or address, 3-300 characters.
    pub location: String,
    /// Expected number of participants, 1-10000.
    pub participants: i32,
    /// Lifecycle status; defaults to `upcoming`.
    pub status: Option<String>,
    /// Category label.
    pub category: String,
    /// Image attachment URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Video attachment URLs.
    #[serde(default)]
    pub videos: Vec<String>,
}

impl TryFrom<CreateActivityRequestBody> for ActivityDraft {
    type Error = Error;

    fn try_from(body: CreateActivityRequestBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: body.title,
            description: body.description,
            date: parse_iso_timestamp(body.date.as_str(), FieldName::new("date"))?,
            location: body.location,
            participants: body.participants,
            status: parse_optional_enum::<ActivityStatus>(
                body.status.as_deref(),
                FieldName::new("status"),
            )?
            .unwrap_or_default(),
            category: parse_enum::<ActivityCategory>(
                body.category.as_str(),
                FieldName::new("category"),
            )?,
            images: body.images,
            videos: body.videos,
        })
    }
}

/// Request payload for partially updating an activity.
///
/// Absent fields are left untouched; present fields obey creation rules.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequestBody {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement occurrence time (ISO date).
    #[schema(format = "date-time")]
    pub date: Option<String>,
    /// Replacement location.
    pub location: Option<String>,
    /// Replacement participant count.
    pub participants: Option<i32>,
    /// Replacement status.
    pub status: Option<String>,
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement image URL list.
    pub images: Option<Vec<String>>,
    /// Replacement video URL list.
    pub videos: Option<Vec<String>>,
}

impl TryFrom<UpdateActivityRequestBody> for ActivityUpdate {
    type Error = Error;

    fn try_from(body: UpdateActivityRequestBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: body.title,
            description: body.description,
            date: body
                .date
                .as_deref()
                .map(|raw| parse_iso_timestamp(raw, FieldName::new("date")))
                .transpose()?,
            location: body.location,
            participants: body.participants,
            status: parse_optional_enum::<ActivityStatus>(
                body.status.as_deref(),
                FieldName::new("status"),
            )?,
            category: parse_optional_enum::<ActivityCategory>(
                body.category.as_deref(),
                FieldName::new("category"),
            )?,
            images: body.images,
            videos: body.videos,
        })
    }
}

/// One activity record as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBody {
    /// Store-assigned identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Event name.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Occurrence time.
    #[schema(format = "date-time")]
    pub date: String,
    /// Venue or address.
    pub location: String,
    /// Expected number of participants.
    pub participants: i32,
    /// Lifecycle status.
    pub status: String,
    /// Category label.
    pub category: String,
    /// Image attachment URLs.
    pub images: Vec<String>,
    /// Video attachment URLs.
    pub videos: Vec<String>,
    /// Record creation stamp.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Last mutation stamp.
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Activity> for ActivityBody {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id().to_string(),
            title: activity.title().to_owned(),
            description: activity.description().to_owned(),
            date: activity.date().to_rfc3339(),
            location: activity.location().to_owned(),
            participants: activity.participants(),
            status: activity.status().to_string(),
            category: activity.category().to_string(),
            images: activity.images().to_vec(),
            videos: activity.videos().to_vec(),
            created_at: activity.created_at().to_rfc3339(),
            updated_at: activity.updated_at().to_rfc3339(),
        }
    }
}

/// Echo of the effective listing filters after defaulting and alias
/// resolution.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFiltersBody {
    /// Effective status filter.
    pub status: Option<String>,
    /// Effective category filter.
    pub category: Option<String>,
    /// Effective free-text term, whichever parameter supplied it.
    pub keyword: Option<String>,
    /// Effective lower occurrence-date bound.
    pub date_from: Option<String>,
    /// Effective upper occurrence-date bound.
    pub date_to: Option<String>,
    /// Effective lower participant-count bound.
    pub participants_min: Option<i32>,
    /// Effective upper participant-count bound.
    pub participants_max: Option<i32>,
    /// Effective sort field.
    pub sort_by: String,
    /// Effective sort direction.
    pub sort_order: String,
}

impl From<&ActivityQuery> for AppliedFiltersBody {
    fn from(query: &ActivityQuery) -> Self {
        Self {
            status: query.status.map(|status| status.to_string()),
            category: query.category.map(|category| category.to_string()),
            keyword: query.keyword.clone(),
            date_from: query.date_range.from.map(|from| from.to_rfc3339()),
            date_to: query.date_range.to.map(|to| to.to_rfc3339()),
            participants_min: query.participants_range.min,
            participants_max: query.participants_range.max,
            sort_by: query.sort.field.to_string(),
            sort_order: query.sort.direction.to_string(),
        }
    }
}

/// Trailing metadata block of the listing response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingMetadataBody {
    /// Total number of matching records.
    pub total_activities: u64,
    /// When the listing was resolved.
    #[schema(format = "date-time")]
    pub query_time: String,
}

/// Response payload of `GET /api/v1/activities`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListResponse {
    /// Records in the requested window, in sort order.
    pub activities: Vec<ActivityBody>,
    /// Pagination metadata for the window.
    #[schema(value_type = Object)]
    pub pagination: PageMeta,
    /// Echo of the effective filters.
    pub filters: AppliedFiltersBody,
    /// Listing metadata.
    pub metadata: ListingMetadataBody,
}

impl From<ActivityListing> for ActivityListResponse {
    fn from(listing: ActivityListing) -> Self {
        let filters = AppliedFiltersBody::from(&listing.query);
        Self {
            activities: listing.activities.into_iter().map(ActivityBody::from).collect(),
            pagination: listing.page,
            filters,
            metadata: ListingMetadataBody {
                total_activities: listing.page.total_items,
                query_time: listing.query_time.to_rfc3339(),
            },
        }
    }
}
