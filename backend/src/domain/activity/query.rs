//! Listing parameters and the filter predicate built from them.
//!
//! [`ActivityQuery`] is the validated parameter set of the listing endpoint:
//! pagination window, optional equality and range filters, a free-text term,
//! and a sort key. [`ActivityFilter::from_query`] turns it into a pure,
//! conjunctive predicate value composed of named sub-predicates, which store
//! adapters translate into their native query language and the in-memory
//! fixture evaluates directly via [`ActivityFilter::matches`]. Both paths
//! must preserve the same semantics: case-insensitive substring match OR-ed
//! across title, description, and location; closed date and participant
//! intervals with either bound optional.
//!
//! The resolver holds no state: a query plus the store contents fully
//! determine the returned window and its metadata.

use chrono::{DateTime, Utc};
use pagination::PageRequest;

use super::{Activity, ActivityCategory, ActivityStatus};

/// Record field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Occurrence time. The default.
    Date,
    /// Event name.
    Title,
    /// Expected participant count.
    Participants,
    /// Record creation stamp.
    CreatedAt,
    /// Last mutation stamp.
    UpdatedAt,
}

impl SortField {
    /// Every sortable field, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Date,
        Self::Title,
        Self::Participants,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Stable wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Participants => "participants",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl Default for SortField {
    fn default() -> Self {
        Self::Date
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sortBy must be one of: date, title, participants, createdAt, updatedAt")]
pub struct ParseSortFieldError;

impl std::str::FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "title" => Ok(Self::Title),
            "participants" => Ok(Self::Participants),
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            _ => Err(ParseSortFieldError),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first. The default.
    Desc,
}

impl SortDirection {
    /// Stable wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Desc
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sortOrder must be asc or desc")]
pub struct ParseSortDirectionError;

impl std::str::FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseSortDirectionError),
        }
    }
}

/// Field and direction a listing window is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortKey {
    /// Field to order by.
    pub field: SortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

/// Closed timestamp interval with either bound optional.
///
/// An absent bound imposes no constraint on that side; it never synthesises
/// an artificial minimum or maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whether any bound is set.
    #[must_use]
    pub const fn is_constrained(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether `value` lies within the interval.
    #[must_use]
    pub fn contains(&self, value: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| value >= from) && self.to.is_none_or(|to| value <= to)
    }
}

/// Closed integer interval with either bound optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountRange {
    /// Inclusive lower bound.
    pub min: Option<i32>,
    /// Inclusive upper bound.
    pub max: Option<i32>,
}

impl CountRange {
    /// Whether any bound is set.
    #[must_use]
    pub const fn is_constrained(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether `value` lies within the interval.
    #[must_use]
    pub fn contains(&self, value: i32) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Validated listing parameters after defaulting and alias resolution.
///
/// `keyword` already holds the effective search term: the boundary resolves
/// the deprecated `search` alias before constructing this value, and the same
/// term is echoed back in the listing response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityQuery {
    /// Pagination window request.
    pub page: PageRequest,
    /// Equality filter on status, if given.
    pub status: Option<ActivityStatus>,
    /// Equality filter on category, if given.
    pub category: Option<ActivityCategory>,
    /// Effective free-text term, if given.
    pub keyword: Option<String>,
    /// Window ordering.
    pub sort: SortKey,
    /// Occurrence-date interval.
    pub date_range: DateRange,
    /// Participant-count interval.
    pub participants_range: CountRange,
}

impl ActivityQuery {
    /// Build the filter predicate for this query.
    #[must_use]
    pub fn filter(&self) -> ActivityFilter {
        ActivityFilter::from_query(self)
    }
}

/// Conjunctive filter predicate over activity records.
///
/// Each field is an independent named sub-predicate; the overall predicate is
/// their conjunction. The value is pure data: adapters translate it, and
/// [`Self::matches`] is the reference evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    /// Status must equal this value, when set.
    pub status_equals: Option<ActivityStatus>,
    /// Category must equal this value, when set.
    pub category_equals: Option<ActivityCategory>,
    /// Any of title, description, or location must contain this term
    /// case-insensitively, when set.
    pub text_contains_any: Option<String>,
    /// Occurrence date must fall in this interval.
    pub date_in_range: DateRange,
    /// Participant count must fall in this interval.
    pub participants_in_range: CountRange,
}

impl ActivityFilter {
    /// Derive the predicate from validated listing parameters.
    #[must_use]
    pub fn from_query(query: &ActivityQuery) -> Self {
        Self {
            status_equals: query.status,
            category_equals: query.category,
            text_contains_any: query.keyword.clone(),
            date_in_range: query.date_range,
            participants_in_range: query.participants_range,
        }
    }

    /// Whether the predicate constrains anything at all.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.status_equals.is_none()
            && self.category_equals.is_none()
            && self.text_contains_any.is_none()
            && !self.date_in_range.is_constrained()
            && !self.participants_in_range.is_constrained()
    }

    /// Reference evaluation of the predicate against one record.
    #[must_use]
    pub fn matches(&self, activity: &Activity) -> bool {
        if self
            .status_equals
            .is_some_and(|status| activity.status() != status)
        {
            return false;
        }
        if self
            .category_equals
            .is_some_and(|category| activity.category() != category)
        {
            return false;
        }
        if let Some(term) = &self.text_contains_any {
            if !text_contains_any(activity, term) {
                return false;
            }
        }
        if !self.date_in_range.contains(activity.date()) {
            return false;
        }
        self.participants_in_range.contains(activity.participants())
    }
}

/// Case-insensitive substring match against title, description, or location.
fn text_contains_any(activity: &Activity, term: &str) -> bool {
    let needle = term.to_lowercase();
    [activity.title(), activity.description(), activity.location()]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Comparator for the in-memory evaluation of a [`SortKey`].
///
/// Store adapters order inside the engine; the fixture repository sorts with
/// this function so both observe the same ordering semantics.
#[must_use]
pub fn compare_by(sort: SortKey, a: &Activity, b: &Activity) -> std::cmp::Ordering {
    let ordering = match sort.field {
        SortField::Date => a.date().cmp(&b.date()),
        SortField::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
        SortField::Participants => a.participants().cmp(&b.participants()),
        SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        SortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
