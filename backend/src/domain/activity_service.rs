//! Application service orchestrating activity persistence and media hosting.
//!
//! Handlers depend on this service instead of the ports so transport adapters
//! stay free of orchestration rules: concurrent page/count reads for the
//! listing, best-effort media cleanup on deletion, and the mapping from port
//! errors to the domain [`Error`] taxonomy all live here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use pagination::PageMeta;
use serde_json::json;
use tracing::warn;

use super::activity::query::ActivityQuery;
use super::activity::{
    Activity, ActivityDraft, ActivityId, ActivityUpdate, ActivityValidationError, MediaKind,
};
use super::error::Error;
use super::ports::{
    ActivityRepository, ActivityRepositoryError, ActivityStats, FilterFacets, MediaStore,
    MediaStoreError, MediaUpload, StoredMedia,
};

/// One page of the listing together with its derived metadata.
#[derive(Debug, Clone)]
pub struct ActivityListing {
    /// Records in the requested window, in sort order.
    pub activities: Vec<Activity>,
    /// Pagination metadata for the window.
    pub page: PageMeta,
    /// Effective parameters after defaulting and alias resolution, echoed
    /// back to the client.
    pub query: ActivityQuery,
    /// When the listing was resolved.
    pub query_time: DateTime<Utc>,
}

/// Per-file result of a bulk media upload.
#[derive(Debug, Clone)]
pub struct MediaUploadOutcome {
    /// Client-supplied file name, echoed for correlation.
    pub original_name: String,
    /// The stored asset, or the provider failure for this file.
    pub stored: Result<StoredMedia, MediaStoreError>,
}

/// Use-cases over the activity collection and its attached media.
#[derive(Clone)]
pub struct ActivityService {
    repository: Arc<dyn ActivityRepository>,
    media: Arc<dyn MediaStore>,
}

impl ActivityService {
    /// Assemble the service from its ports.
    pub fn new(repository: Arc<dyn ActivityRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { repository, media }
    }

    /// Resolve one listing page.
    ///
    /// The window read and the total count are independent and issued
    /// concurrently; both observe the same filter, and minor skew between
    /// them under concurrent writes is acceptable.
    ///
    /// # Errors
    ///
    /// Propagates store failures as [`Error::internal`].
    pub async fn list(&self, query: ActivityQuery) -> Result<ActivityListing, Error> {
        let filter = query.filter();
        let (activities, total) = tokio::try_join!(
            self.repository.find_page(&filter, query.sort, query.page),
            self.repository.count(&filter),
        )
        .map_err(map_repository_error)?;

        Ok(ActivityListing {
            activities,
            page: PageMeta::new(query.page, total),
            query,
            query_time: Utc::now(),
        })
    }

    /// Fetch one record by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::not_found`] for unknown ids; store failures map to
    /// [`Error::internal`].
    pub async fn get(&self, id: ActivityId) -> Result<Activity, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("activity not found"))
    }

    /// Validate and persist a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] with field details on validation
    /// failure; store failures map through the usual taxonomy.
    pub async fn create(&self, draft: ActivityDraft) -> Result<Activity, Error> {
        let draft = draft.validated().map_err(map_validation_error)?;
        self.repository
            .insert(draft)
            .await
            .map_err(map_repository_error)
    }

    /// Validate and apply a partial update, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] on validation failure and
    /// [`Error::not_found`] for unknown ids.
    pub async fn update(&self, id: ActivityId, update: ActivityUpdate) -> Result<Activity, Error> {
        let update = update.validated().map_err(map_validation_error)?;
        self.repository
            .update(id, update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("activity not found"))
    }

    /// Remove a record, cleaning up its hosted media on a best-effort basis.
    ///
    /// All media deletions are issued concurrently; individual failures are
    /// logged and discarded, never surfaced to the caller and never retried.
    ///
    /// # Errors
    ///
    /// Returns [`Error::not_found`] for unknown ids; store failures map to
    /// [`Error::internal`].
    pub async fn delete(&self, id: ActivityId) -> Result<(), Error> {
        let activity = self.get(id).await?;

        let assets = activity
            .images()
            .iter()
            .map(|url| (MediaKind::Image, url))
            .chain(activity.videos().iter().map(|url| (MediaKind::Video, url)))
            .filter_map(|(kind, url)| media_asset_id(url).map(|asset_id| (kind, asset_id)));
        let deletions = assets.map(|(kind, asset_id)| {
            let media = Arc::clone(&self.media);
            async move {
                media
                    .delete(&asset_id, kind)
                    .await
                    .map_err(|err| (asset_id, err))
            }
        });
        for (asset_id, err) in join_all(deletions).await.into_iter().filter_map(Result::err) {
            warn!(%asset_id, error = %err, "best-effort media cleanup failed");
        }

        self.repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        Ok(())
    }

    /// Aggregate counters over the whole collection.
    ///
    /// # Errors
    ///
    /// Store failures map to [`Error::internal`].
    pub async fn stats(&self) -> Result<ActivityStats, Error> {
        self.repository.stats().await.map_err(map_repository_error)
    }

    /// Discovery facets over the whole collection.
    ///
    /// # Errors
    ///
    /// Store failures map to [`Error::internal`].
    pub async fn filter_options(&self) -> Result<FilterFacets, Error> {
        self.repository
            .filter_facets()
            .await
            .map_err(map_repository_error)
    }

    /// Upload a batch of files, one provider call per file.
    ///
    /// A failing file yields an error outcome for that file only; the batch
    /// never aborts part-way.
    pub async fn upload_media(&self, files: Vec<MediaUpload>) -> Vec<MediaUploadOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let original_name = file.file_name.clone();
            let stored = self.media.upload(file).await;
            if let Err(err) = &stored {
                warn!(%original_name, error = %err, "media upload failed");
            }
            outcomes.push(MediaUploadOutcome { original_name, stored });
        }
        outcomes
    }

    /// Delete one hosted asset by its opaque identifier.
    ///
    /// # Errors
    ///
    /// Provider failures map to [`Error::internal`].
    pub async fn delete_media(&self, asset_id: &str, kind: MediaKind) -> Result<(), Error> {
        self.media.delete(asset_id, kind).await.map_err(|err| match err {
            MediaStoreError::Transport { message } | MediaStoreError::Rejected { message } => {
                Error::internal(message)
            }
        })
    }
}

/// Derive the provider asset id from a hosted media URL.
///
/// The provider scopes assets as `<folder>/<file>`; the id is the last two
/// path segments with the file extension stripped. Returns `None` when the
/// URL has fewer than two segments.
#[must_use]
pub fn media_asset_id(url: &str) -> Option<String> {
    let mut segments = url.rsplit('/');
    let file = segments.next()?;
    let folder = segments.next()?;
    if file.is_empty() || folder.is_empty() {
        return None;
    }
    let joined = format!("{folder}/{file}");
    let trimmed = joined.split('.').next().unwrap_or(joined.as_str());
    Some(trimmed.to_owned())
}

fn map_repository_error(err: ActivityRepositoryError) -> Error {
    match err {
        ActivityRepositoryError::Duplicate { .. } => {
            Error::conflict("duplicate field value entered")
        }
        ActivityRepositoryError::Connection { message }
        | ActivityRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_validation_error(err: ActivityValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}
