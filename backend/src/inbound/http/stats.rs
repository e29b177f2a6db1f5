//! Aggregate statistics and filter-options discovery endpoints.
//!
//! ```text
//! GET /api/v1/activities/stats
//! GET /api/v1/activities/filters
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{ActivityStats, Facet, FilterFacets};
use crate::domain::{ActivityCategory, ActivityStatus, SortDirection, SortField};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Response payload of the statistics endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatsResponse {
    /// Total number of records.
    pub total: u64,
    /// Sum of `participants` across all records.
    pub total_participants: u64,
    /// Record count per status label.
    pub by_status: BTreeMap<String, u64>,
    /// Record count per category label.
    pub by_category: BTreeMap<String, u64>,
}

impl From<ActivityStats> for ActivityStatsResponse {
    fn from(stats: ActivityStats) -> Self {
        Self {
            total: stats.total,
            total_participants: stats.total_participants,
            by_status: stats
                .by_status
                .into_iter()
                .map(|(status, count)| (status.to_string(), count))
                .collect(),
            by_category: stats
                .by_category
                .into_iter()
                .map(|(category, count)| (category.to_string(), count))
                .collect(),
        }
    }
}

/// Aggregate counters over the whole collection.
#[utoipa::path(
    get,
    path = "/api/v1/activities/stats",
    responses(
        (status = 200, description = "Aggregate statistics", body = ActivityStatsResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "getActivityStats"
)]
#[get("/activities/stats")]
pub async fn get_activity_stats(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let stats = state.activities.stats().await?;
    Ok(HttpResponse::Ok().json(ActivityStatsResponse::from(stats)))
}

/// A selectable option with a display label.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabelledOptionBody {
    /// Wire value to send back in a query.
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

/// A distinct observed value with its record count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacetBody {
    /// Wire value to send back in a query.
    pub value: String,
    /// Human-readable label.
    pub label: String,
    /// Number of records carrying the value.
    pub count: u64,
}

/// Observed occurrence-date range.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeBody {
    /// Earliest observed occurrence date.
    #[schema(format = "date-time")]
    pub min: String,
    /// Latest observed occurrence date.
    #[schema(format = "date-time")]
    pub max: String,
}

/// Observed participant-count range.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantsRangeBody {
    /// Smallest observed participant count.
    pub min: i32,
    /// Largest observed participant count.
    pub max: i32,
}

/// Response payload of the filter-options endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionsResponse {
    /// Distinct categories with counts, most frequent first.
    pub categories: Vec<FacetBody>,
    /// Distinct statuses with counts, most frequent first.
    pub statuses: Vec<FacetBody>,
    /// Observed occurrence-date range, absent for an empty collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRangeBody>,
    /// Observed participant-count range, absent for an empty collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants_range: Option<ParticipantsRangeBody>,
    /// Static catalog of sortable fields.
    pub sort_options: Vec<LabelledOptionBody>,
    /// Static catalog of sort directions.
    pub sort_orders: Vec<LabelledOptionBody>,
}

fn status_label(status: ActivityStatus) -> &'static str {
    match status {
        ActivityStatus::Upcoming => "Upcoming",
        ActivityStatus::Ongoing => "Ongoing",
        ActivityStatus::Completed => "Completed",
    }
}

fn category_label(category: ActivityCategory) -> &'static str {
    match category {
        ActivityCategory::Education => "Education",
        ActivityCategory::Environment => "Environment",
        ActivityCategory::Health => "Health",
        ActivityCategory::Community => "Community",
        ActivityCategory::Other => "Other",
    }
}

fn sort_field_label(field: SortField) -> &'static str {
    match field {
        SortField::Date => "Date",
        SortField::Title => "Title",
        SortField::Participants => "Participants",
        SortField::CreatedAt => "Created at",
        SortField::UpdatedAt => "Updated at",
    }
}

fn sort_options_catalog() -> Vec<LabelledOptionBody> {
    SortField::ALL
        .into_iter()
        .map(|field| LabelledOptionBody {
            value: field.to_string(),
            label: sort_field_label(field).to_owned(),
        })
        .collect()
}

fn sort_orders_catalog() -> Vec<LabelledOptionBody> {
    [SortDirection::Desc, SortDirection::Asc]
        .into_iter()
        .map(|direction| LabelledOptionBody {
            value: direction.to_string(),
            label: match direction {
                SortDirection::Desc => "Descending".to_owned(),
                SortDirection::Asc => "Ascending".to_owned(),
            },
        })
        .collect()
}

fn category_facets(facets: Vec<Facet<ActivityCategory>>) -> Vec<FacetBody> {
    facets
        .into_iter()
        .map(|facet| FacetBody {
            value: facet.value.to_string(),
            label: category_label(facet.value).to_owned(),
            count: facet.count,
        })
        .collect()
}

fn status_facets(facets: Vec<Facet<ActivityStatus>>) -> Vec<FacetBody> {
    facets
        .into_iter()
        .map(|facet| FacetBody {
            value: facet.value.to_string(),
            label: status_label(facet.value).to_owned(),
            count: facet.count,
        })
        .collect()
}

impl From<FilterFacets> for FilterOptionsResponse {
    fn from(facets: FilterFacets) -> Self {
        Self {
            categories: category_facets(facets.categories),
            statuses: status_facets(facets.statuses),
            date_range: facets.date_range.map(|range| DateRangeBody {
                min: range.min.to_rfc3339(),
                max: range.max.to_rfc3339(),
            }),
            participants_range: facets.participants_range.map(|range| ParticipantsRangeBody {
                min: range.min,
                max: range.max,
            }),
            sort_options: sort_options_catalog(),
            sort_orders: sort_orders_catalog(),
        }
    }
}

/// Filter-options discovery for listing UIs.
#[utoipa::path(
    get,
    path = "/api/v1/activities/filters",
    responses(
        (status = 200, description = "Available filter options", body = FilterOptionsResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "getFilterOptions"
)]
#[get("/activities/filters")]
pub async fn get_filter_options(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let facets = state.activities.filter_options().await?;
    Ok(HttpResponse::Ok().json(FilterOptionsResponse::from(facets)))
}
