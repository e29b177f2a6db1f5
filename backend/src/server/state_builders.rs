//! Builders for HTTP state over repository- or fixture-backed ports.

use std::sync::Arc;

use tracing::warn;

use backend::domain::ActivityService;
use backend::domain::ports::{
    ActivityRepository, FixtureActivityRepository, FixtureMediaStore, MediaStore,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::media::HttpMediaStore;
use backend::outbound::persistence::DieselActivityRepository;

use super::ServerConfig;

/// Build the handler state from configuration.
///
/// Uses database- and provider-backed adapters when configured, otherwise
/// in-memory fixtures, so the server always starts in development and test
/// environments.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the media provider client cannot be
/// constructed.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let repository: Arc<dyn ActivityRepository> = match &config.db_pool {
        Some(pool) => Arc::new(DieselActivityRepository::new(pool.clone())),
        None => {
            warn!("no database configured; activities live in an in-memory fixture store");
            Arc::new(FixtureActivityRepository::new())
        }
    };

    let media: Arc<dyn MediaStore> = match &config.media {
        Some(provider) => Arc::new(
            HttpMediaStore::new(provider.clone())
                .map_err(|err| std::io::Error::other(format!("media client failed: {err}")))?,
        ),
        None => {
            warn!("no media provider configured; uploads go to the fixture store");
            Arc::new(FixtureMediaStore::new())
        }
    };

    Ok(HttpState::new(ActivityService::new(repository, media))
        .with_upload_limits(config.upload_limits))
}
