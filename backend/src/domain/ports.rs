//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the document store and the media upload provider). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning `anyhow::Result`. Fixture implementations
//! back the test suites and the no-database server mode.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;
use thiserror::Error;
use uuid::Uuid;

use super::activity::query::{ActivityFilter, SortKey, compare_by};
use super::activity::{
    Activity, ActivityCategory, ActivityDraft, ActivityId, ActivityStatus, ActivityUpdate,
    MediaKind,
};

/// Errors surfaced by [`ActivityRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityRepositoryError {
    /// Store connectivity failures.
    #[error("activity store connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("activity store query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// Store uniqueness violation.
    #[error("activity store rejected a duplicate key: {message}")]
    Duplicate {
        /// Adapter-provided detail.
        message: String,
    },
}

impl ActivityRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for uniqueness violations.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`MediaStore`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaStoreError {
    /// Transport-level failure reaching the provider.
    #[error("media provider transport failed: {message}")]
    Transport {
        /// Adapter-provided detail.
        message: String,
    },
    /// The provider refused the request.
    #[error("media provider rejected the request: {message}")]
    Rejected {
        /// Adapter-provided detail.
        message: String,
    },
}

impl MediaStoreError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for provider refusals.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Aggregate counters over the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityStats {
    /// Total number of records.
    pub total: u64,
    /// Sum of `participants` across all records.
    pub total_participants: u64,
    /// Record count per status.
    pub by_status: BTreeMap<ActivityStatus, u64>,
    /// Record count per category.
    pub by_category: BTreeMap<ActivityCategory, u64>,
}

/// A distinct value with its occurrence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet<T> {
    /// The observed value.
    pub value: T,
    /// How many records carry it.
    pub count: u64,
}

/// An observed closed range over the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedRange<T> {
    /// Smallest observed value.
    pub min: T,
    /// Largest observed value.
    pub max: T,
}

/// Discovery data backing the filter-options endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterFacets {
    /// Distinct categories with counts, most frequent first.
    pub categories: Vec<Facet<ActivityCategory>>,
    /// Distinct statuses with counts, most frequent first.
    pub statuses: Vec<Facet<ActivityStatus>>,
    /// Observed occurrence-date range, absent when the collection is empty.
    pub date_range: Option<ObservedRange<DateTime<Utc>>>,
    /// Observed participant-count range, absent when the collection is empty.
    pub participants_range: Option<ObservedRange<i32>>,
}

/// Persistence port for activity records.
///
/// The page and count reads take the same filter value and are independent:
/// callers may run them concurrently and tolerate minor skew between them
/// under concurrent writes. A window past the end of the matching set yields
/// an empty page, never an error.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Fetch the ordered window `[skip, skip + limit)` of matching records.
    async fn find_page(
        &self,
        filter: &ActivityFilter,
        sort: SortKey,
        page: PageRequest,
    ) -> Result<Vec<Activity>, ActivityRepositoryError>;

    /// Count records matching `filter`, ignoring any window.
    async fn count(&self, filter: &ActivityFilter) -> Result<u64, ActivityRepositoryError>;

    /// Fetch one record by id.
    async fn find_by_id(
        &self,
        id: ActivityId,
    ) -> Result<Option<Activity>, ActivityRepositoryError>;

    /// Persist a new record, assigning id and audit timestamps.
    async fn insert(&self, draft: ActivityDraft) -> Result<Activity, ActivityRepositoryError>;

    /// Apply a partial update, refreshing `updated_at`.
    ///
    /// Returns `None` when no record carries `id`.
    async fn update(
        &self,
        id: ActivityId,
        update: ActivityUpdate,
    ) -> Result<Option<Activity>, ActivityRepositoryError>;

    /// Remove a record by id; returns whether a record was removed.
    async fn delete(&self, id: ActivityId) -> Result<bool, ActivityRepositoryError>;

    /// Aggregate counters over the whole collection.
    async fn stats(&self) -> Result<ActivityStats, ActivityRepositoryError>;

    /// Discovery facets over the whole collection.
    async fn filter_facets(&self) -> Result<FilterFacets, ActivityRepositoryError>;
}

/// One file handed to the media provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    /// Client-supplied file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Media kind implied by the declared MIME type, if supported.
    #[must_use]
    pub fn kind(&self) -> Option<MediaKind> {
        if self.content_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if self.content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// A durably stored media asset, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Durable public URL.
    pub url: String,
    /// Opaque provider-side identifier used for later deletion.
    pub asset_id: String,
    /// Kind the asset was stored as.
    pub kind: MediaKind,
}

/// Upload port for the external image/video hosting provider.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload one file, returning its durable URL and opaque identifier.
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaStoreError>;

    /// Delete one asset by its opaque identifier.
    async fn delete(&self, asset_id: &str, kind: MediaKind) -> Result<(), MediaStoreError>;
}

// ---------------------------------------------------------------------------
// Fixture adapters
// ---------------------------------------------------------------------------

/// In-memory [`ActivityRepository`] used by tests and the no-database mode.
///
/// Applies [`ActivityFilter::matches`] and [`compare_by`] directly, so it is
/// the reference implementation of the listing semantics the SQL adapter
/// expresses in the engine.
#[derive(Debug, Default)]
pub struct FixtureActivityRepository {
    store: Mutex<BTreeMap<ActivityId, Activity>>,
}

impl FixtureActivityRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<ActivityId, Activity>>, ActivityRepositoryError>
    {
        self.store
            .lock()
            .map_err(|_| ActivityRepositoryError::query("fixture store poisoned"))
    }

    fn matching(
        guard: &BTreeMap<ActivityId, Activity>,
        filter: &ActivityFilter,
    ) -> Vec<Activity> {
        guard
            .values()
            .filter(|activity| filter.matches(activity))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ActivityRepository for FixtureActivityRepository {
    async fn find_page(
        &self,
        filter: &ActivityFilter,
        sort: SortKey,
        page: PageRequest,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let guard = self.lock()?;
        let mut matching = Self::matching(&guard, filter);
        drop(guard);
        matching.sort_by(|a, b| compare_by(sort, a, b));
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self, filter: &ActivityFilter) -> Result<u64, ActivityRepositoryError> {
        let guard = self.lock()?;
        Ok(guard.values().filter(|a| filter.matches(a)).count() as u64)
    }

    async fn find_by_id(
        &self,
        id: ActivityId,
    ) -> Result<Option<Activity>, ActivityRepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn insert(&self, draft: ActivityDraft) -> Result<Activity, ActivityRepositoryError> {
        let now = Utc::now();
        let activity = Activity::new(ActivityId::random(), draft, now, now)
            .map_err(|err| ActivityRepositoryError::query(err.to_string()))?;
        let mut guard = self.lock()?;
        if guard.contains_key(&activity.id()) {
            return Err(ActivityRepositoryError::duplicate(activity.id().to_string()));
        }
        guard.insert(activity.id(), activity.clone());
        Ok(activity)
    }

    async fn update(
        &self,
        id: ActivityId,
        update: ActivityUpdate,
    ) -> Result<Option<Activity>, ActivityRepositoryError> {
        let mut guard = self.lock()?;
        let Some(current) = guard.get(&id) else {
            return Ok(None);
        };
        let updated = current
            .apply_update(update, Utc::now())
            .map_err(|err| ActivityRepositoryError::query(err.to_string()))?;
        guard.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: ActivityId) -> Result<bool, ActivityRepositoryError> {
        Ok(self.lock()?.remove(&id).is_some())
    }

    async fn stats(&self) -> Result<ActivityStats, ActivityRepositoryError> {
        let guard = self.lock()?;
        let mut stats = ActivityStats {
            total: guard.len() as u64,
            ..ActivityStats::default()
        };
        for activity in guard.values() {
            stats.total_participants += u64::try_from(activity.participants()).unwrap_or(0);
            *stats.by_status.entry(activity.status()).or_insert(0) += 1;
            *stats.by_category.entry(activity.category()).or_insert(0) += 1;
        }
        Ok(stats)
    }

    async fn filter_facets(&self) -> Result<FilterFacets, ActivityRepositoryError> {
        let guard = self.lock()?;
        let mut by_category: BTreeMap<ActivityCategory, u64> = BTreeMap::new();
        let mut by_status: BTreeMap<ActivityStatus, u64> = BTreeMap::new();
        let mut date_range: Option<ObservedRange<DateTime<Utc>>> = None;
        let mut participants_range: Option<ObservedRange<i32>> = None;
        for activity in guard.values() {
            *by_category.entry(activity.category()).or_insert(0) += 1;
            *by_status.entry(activity.status()).or_insert(0) += 1;
            date_range = Some(match date_range {
                None => ObservedRange { min: activity.date(), max: activity.date() },
                Some(range) => ObservedRange {
                    min: range.min.min(activity.date()),
                    max: range.max.max(activity.date()),
                },
            });
            participants_range = Some(match participants_range {
                None => ObservedRange {
                    min: activity.participants(),
                    max: activity.participants(),
                },
                Some(range) => ObservedRange {
                    min: range.min.min(activity.participants()),
                    max: range.max.max(activity.participants()),
                },
            });
        }
        Ok(FilterFacets {
            categories: facets_by_count(by_category),
            statuses: facets_by_count(by_status),
            date_range,
            participants_range,
        })
    }
}

/// Order facet counts most frequent first, ties by value order.
///
/// Shared by every repository implementation so discovery facets come back
/// in the same order regardless of the backing store.
pub fn facets_by_count<T: Copy + Ord>(counts: BTreeMap<T, u64>) -> Vec<Facet<T>> {
    let mut facets: Vec<Facet<T>> = counts
        .into_iter()
        .map(|(value, count)| Facet { value, count })
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)));
    facets
}

/// In-memory [`MediaStore`] used by tests and the no-provider mode.
///
/// Uploads mint deterministic-looking URLs under a reserved host; deletions
/// record the asset id. `failing_deletes` turns every delete into a transport
/// error so callers can exercise best-effort cleanup.
#[derive(Debug, Default)]
pub struct FixtureMediaStore {
    fail_deletes: bool,
    deleted: Mutex<Vec<String>>,
}

impl FixtureMediaStore {
    /// Fixture that accepts every request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixture whose delete calls always fail.
    #[must_use]
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Asset ids successfully deleted so far.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MediaStore for FixtureMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaStoreError> {
        let kind = upload
            .kind()
            .ok_or_else(|| MediaStoreError::rejected("unsupported content type"))?;
        let extension = match kind {
            MediaKind::Image => "webp",
            MediaKind::Video => "mp4",
        };
        let asset_id = format!("fixture/{}", Uuid::new_v4());
        Ok(StoredMedia {
            url: format!("https://media.invalid/{asset_id}.{extension}"),
            asset_id,
            kind,
        })
    }

    async fn delete(&self, asset_id: &str, _kind: MediaKind) -> Result<(), MediaStoreError> {
        if self.fail_deletes {
            return Err(MediaStoreError::transport("fixture delete failure"));
        }
        if let Ok(mut guard) = self.deleted.lock() {
            guard.push(asset_id.to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::activity::query::{ActivityQuery, SortDirection, SortField};
    use chrono::TimeZone;

    fn draft(title: &str, participants: i32) -> ActivityDraft {
        ActivityDraft {
            title: title.to_owned(),
            description: "A fixture-backed activity record.".to_owned(),
            date: Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).single().expect("valid date"),
            location: "Town hall".to_owned(),
            participants,
            status: ActivityStatus::Upcoming,
            category: ActivityCategory::Community,
            images: vec![],
            videos: vec![],
        }
    }

    #[rstest]
    #[actix_rt::test]
    async fn insert_assigns_id_and_stamps() {
        let repo = FixtureActivityRepository::new();
        let activity = repo.insert(draft("Soup kitchen", 12)).await.expect("insert");
        assert_eq!(activity.title(), "Soup kitchen");
        assert_eq!(activity.created_at(), activity.updated_at());
        let loaded = repo.find_by_id(activity.id()).await.expect("load");
        assert_eq!(loaded, Some(activity));
    }

    #[rstest]
    #[actix_rt::test]
    async fn window_past_the_end_is_empty_not_an_error() {
        let repo = FixtureActivityRepository::new();
        for i in 0..3 {
            repo.insert(draft(&format!("Activity {i}"), 10)).await.expect("insert");
        }
        let page = PageRequest::new(999, 10).expect("valid request");
        let window = repo
            .find_page(&ActivityFilter::default(), SortKey::default(), page)
            .await
            .expect("page");
        assert!(window.is_empty());
    }

    #[rstest]
    #[actix_rt::test]
    async fn page_and_count_agree_on_the_filter() {
        let repo = FixtureActivityRepository::new();
        for i in 0..5 {
            repo.insert(draft(&format!("Food drive {i}"), 10)).await.expect("insert");
        }
        repo.insert(draft("Park restoration", 10)).await.expect("insert");

        let query = ActivityQuery {
            keyword: Some("food".to_owned()),
            ..ActivityQuery::default()
        };
        let filter = query.filter();
        let window = repo
            .find_page(&filter, SortKey::default(), PageRequest::default())
            .await
            .expect("page");
        let total = repo.count(&filter).await.expect("count");
        assert_eq!(window.len(), 5);
        assert_eq!(total, 5);
    }

    #[rstest]
    #[actix_rt::test]
    async fn sorted_window_respects_direction() {
        let repo = FixtureActivityRepository::new();
        repo.insert(draft("B drive", 20)).await.expect("insert");
        repo.insert(draft("A drive", 10)).await.expect("insert");
        let sort = SortKey { field: SortField::Participants, direction: SortDirection::Asc };
        let window = repo
            .find_page(&ActivityFilter::default(), sort, PageRequest::default())
            .await
            .expect("page");
        let participants: Vec<i32> = window.iter().map(Activity::participants).collect();
        assert_eq!(participants, vec![10, 20]);
    }

    #[rstest]
    #[actix_rt::test]
    async fn stats_sum_participants_and_group_counts() {
        let repo = FixtureActivityRepository::new();
        repo.insert(draft("One", 10)).await.expect("insert");
        repo.insert(ActivityDraft {
            status: ActivityStatus::Completed,
            category: ActivityCategory::Health,
            ..draft("Two", 15)
        })
        .await
        .expect("insert");

        let stats = repo.stats().await.expect("stats");
        assert_eq!(stats.total, 2);
        assert_eq!(stats.total_participants, 25);
        assert_eq!(stats.by_status.get(&ActivityStatus::Completed), Some(&1));
        assert_eq!(stats.by_category.get(&ActivityCategory::Community), Some(&1));
    }

    #[rstest]
    #[actix_rt::test]
    async fn facets_order_by_count_and_track_ranges() {
        let repo = FixtureActivityRepository::new();
        repo.insert(draft("One", 5)).await.expect("insert");
        repo.insert(draft("Two", 50)).await.expect("insert");
        repo.insert(ActivityDraft {
            category: ActivityCategory::Health,
            ..draft("Three", 20)
        })
        .await
        .expect("insert");

        let facets = repo.filter_facets().await.expect("facets");
        assert_eq!(facets.categories.first().map(|f| f.value), Some(ActivityCategory::Community));
        assert_eq!(facets.categories.first().map(|f| f.count), Some(2));
        let range = facets.participants_range.expect("observed range");
        assert_eq!((range.min, range.max), (5, 50));
    }

    #[rstest]
    #[actix_rt::test]
    async fn fixture_media_store_round_trip() {
        let store = FixtureMediaStore::new();
        let stored = store
            .upload(MediaUpload {
                file_name: "river.jpg".to_owned(),
                content_type: "image/jpeg".to_owned(),
                bytes: vec![1, 2, 3],
            })
            .await
            .expect("upload");
        assert_eq!(stored.kind, MediaKind::Image);
        store.delete(&stored.asset_id, stored.kind).await.expect("delete");
        assert_eq!(store.deleted(), vec![stored.asset_id]);
    }

    #[rstest]
    #[actix_rt::test]
    async fn failing_fixture_rejects_deletes() {
        let store = FixtureMediaStore::failing_deletes();
        let err = store
            .delete("fixture/abc", MediaKind::Image)
            .await
            .expect_err("delete fails");
        assert!(matches!(err, MediaStoreError::Transport { .. }));
    }
}
