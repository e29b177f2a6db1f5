//! PostgreSQL-backed activity repository.
//!
//! Translates the pure filter predicate into engine-side SQL: equality
//! filters map to `=`, the free-text sub-predicate to `ILIKE` OR-ed across
//! title, description, and location, and the range sub-predicates to bound
//! comparisons that are simply omitted when a bound is absent. Window and
//! count reads build the same filtered query twice so they can run on
//! separate pooled connections.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::define_sql_function;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{
    ActivityRepository, ActivityRepositoryError, ActivityStats, FilterFacets, ObservedRange,
    facets_by_count,
};
use crate::domain::{
    Activity, ActivityCategory, ActivityDraft, ActivityFilter, ActivityId, ActivityStatus,
    ActivityUpdate, SortDirection, SortField, SortKey,
};

use super::diesel_helpers::{collect_rows, contains_pattern, map_diesel_error, map_pool_error};
use super::models::{ActivityChangeset, ActivityRow, NewActivityRow, row_to_activity};
use super::pool::DbPool;
use super::schema::activities;

define_sql_function! {
    /// SQL `lower`, used for case-insensitive ordering on text columns.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed implementation of the activity persistence port.
#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Build the filtered base query for one execution.
///
/// Boxed queries are single-use; the page and count reads each build their
/// own copy from the same predicate value.
fn filtered_query(filter: &ActivityFilter) -> activities::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = activities::table.into_boxed();
    if let Some(status) = filter.status_equals {
        query = query.filter(activities::status.eq(status.as_str().to_owned()));
    }
    if let Some(category) = filter.category_equals {
        query = query.filter(activities::category.eq(category.as_str().to_owned()));
    }
    if let Some(term) = &filter.text_contains_any {
        let pattern = contains_pattern(term);
        query = query.filter(
            activities::title
                .ilike(pattern.clone())
                .or(activities::description.ilike(pattern.clone()))
                .or(activities::location.ilike(pattern)),
        );
    }
    if let Some(from) = filter.date_in_range.from {
        query = query.filter(activities::date.ge(from));
    }
    if let Some(to) = filter.date_in_range.to {
        query = query.filter(activities::date.le(to));
    }
    if let Some(lower_bound) = filter.participants_in_range.min {
        query = query.filter(activities::participants.ge(lower_bound));
    }
    if let Some(upper_bound) = filter.participants_in_range.max {
        query = query.filter(activities::participants.le(upper_bound));
    }
    query
}

/// Apply the sort key to a boxed query.
fn ordered(
    query: activities::BoxedQuery<'static, diesel::pg::Pg>,
    sort: SortKey,
) -> activities::BoxedQuery<'static, diesel::pg::Pg> {
    match (sort.field, sort.direction) {
        (SortField::Date, SortDirection::Asc) => query.order(activities::date.asc()),
        (SortField::Date, SortDirection::Desc) => query.order(activities::date.desc()),
        (SortField::Title, SortDirection::Asc) => query.order(lower(activities::title).asc()),
        (SortField::Title, SortDirection::Desc) => query.order(lower(activities::title).desc()),
        (SortField::Participants, SortDirection::Asc) => {
            query.order(activities::participants.asc())
        }
        (SortField::Participants, SortDirection::Desc) => {
            query.order(activities::participants.desc())
        }
        (SortField::CreatedAt, SortDirection::Asc) => query.order(activities::created_at.asc()),
        (SortField::CreatedAt, SortDirection::Desc) => query.order(activities::created_at.desc()),
        (SortField::UpdatedAt, SortDirection::Asc) => query.order(activities::updated_at.asc()),
        (SortField::UpdatedAt, SortDirection::Desc) => query.order(activities::updated_at.desc()),
    }
}

fn parse_label<T>(label: &str, what: &str) -> Result<T, ActivityRepositoryError>
where
    T: FromStr,
{
    T::from_str(label)
        .map_err(|_| ActivityRepositoryError::query(format!("unknown {what} label in store: {label}")))
}

fn counts_to_map<T>(
    counts: Vec<(String, i64)>,
    what: &str,
) -> Result<BTreeMap<T, u64>, ActivityRepositoryError>
where
    T: FromStr + Ord,
{
    counts
        .into_iter()
        .map(|(label, count)| {
            Ok((
                parse_label::<T>(label.as_str(), what)?,
                u64::try_from(count).unwrap_or(0),
            ))
        })
        .collect()
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn find_page(
        &self,
        filter: &ActivityFilter,
        sort: SortKey,
        page: PageRequest,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let skip = i64::try_from(page.skip()).unwrap_or(i64::MAX);
        let rows: Vec<ActivityRow> = ordered(filtered_query(filter), sort)
            .select(ActivityRow::as_select())
            .offset(skip)
            .limit(i64::from(page.limit()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "activity page read"))?;
        collect_rows(
            rows.into_iter().map(row_to_activity),
            ActivityRepositoryError::query,
        )
    }

    async fn count(&self, filter: &ActivityFilter) -> Result<u64, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered_query(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "activity count"))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn find_by_id(
        &self,
        id: ActivityId,
    ) -> Result<Option<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ActivityRow> = activities::table
            .find(id.as_uuid())
            .select(ActivityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "activity read"))?;
        row.map(row_to_activity)
            .transpose()
            .map_err(ActivityRepositoryError::query)
    }

    async fn insert(&self, draft: ActivityDraft) -> Result<Activity, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewActivityRow::from_draft(ActivityId::random(), draft);
        let row: ActivityRow = diesel::insert_into(activities::table)
            .values(&new_row)
            .returning(ActivityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "activity insert"))?;
        row_to_activity(row).map_err(ActivityRepositoryError::query)
    }

    async fn update(
        &self,
        id: ActivityId,
        update: ActivityUpdate,
    ) -> Result<Option<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ActivityChangeset::from_update(update, Utc::now());
        let row: Option<ActivityRow> = diesel::update(activities::table.find(id.as_uuid()))
            .set(&changeset)
            .returning(ActivityRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "activity update"))?;
        row.map(row_to_activity)
            .transpose()
            .map_err(ActivityRepositoryError::query)
    }

    async fn delete(&self, id: ActivityId) -> Result<bool, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(activities::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "activity delete"))?;
        Ok(removed > 0)
    }

    async fn stats(&self) -> Result<ActivityStats, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let status_counts: Vec<(String, i64)> = activities::table
            .group_by(activities::status)
            .select((activities::status, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "status aggregate"))?;
        let category_counts: Vec<(String, i64)> = activities::table
            .group_by(activities::category)
            .select((activities::category, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "category aggregate"))?;
        let total: i64 = activities::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "total count"))?;
        let total_participants: Option<i64> = activities::table
            .select(diesel::dsl::sum(activities::participants))
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "participants sum"))?;

        Ok(ActivityStats {
            total: u64::try_from(total).unwrap_or(0),
            total_participants: total_participants
                .and_then(|value| u64::try_from(value).ok())
                .unwrap_or(0),
            by_status: counts_to_map::<ActivityStatus>(status_counts, "status")?,
            by_category: counts_to_map::<ActivityCategory>(category_counts, "category")?,
        })
    }

    async fn filter_facets(&self) -> Result<FilterFacets, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let status_counts: Vec<(String, i64)> = activities::table
            .group_by(activities::status)
            .select((activities::status, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "status facet"))?;
        let category_counts: Vec<(String, i64)> = activities::table
            .group_by(activities::category)
            .select((activities::category, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "category facet"))?;
        let date_bounds: (Option<DateTime<Utc>>, Option<DateTime<Utc>>) = activities::table
            .select((diesel::dsl::min(activities::date), diesel::dsl::max(activities::date)))
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "date range"))?;
        let participant_bounds: (Option<i32>, Option<i32>) = activities::table
            .select((diesel::dsl::min(activities::participants), diesel::dsl::max(activities::participants)))
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "participants range"))?;

        Ok(FilterFacets {
            categories: facets_by_count(counts_to_map::<ActivityCategory>(
                category_counts,
                "category",
            )?),
            statuses: facets_by_count(counts_to_map::<ActivityStatus>(status_counts, "status")?),
            date_range: match date_bounds {
                (Some(min), Some(max)) => Some(ObservedRange { min, max }),
                _ => None,
            },
            participants_range: match participant_bounds {
                (Some(min), Some(max)) => Some(ObservedRange { min, max }),
                _ => None,
            },
        })
    }
}
