//! HTTP server configuration object and helpers.
//!
//! Environment-derived settings become one explicitly constructed value that
//! is passed to whatever component needs it; nothing reads process-wide
//! ambient state after startup.

use std::net::SocketAddr;

use backend::inbound::http::state::UploadLimits;
use backend::outbound::media::MediaProviderConfig;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origin: String,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) media: Option<MediaProviderConfig>,
    pub(crate) upload_limits: UploadLimits,
}

impl ServerConfig {
    /// Construct a server configuration with fixture-backed ports.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, cors_origin: impl Into<String>) -> Self {
        Self {
            bind_addr,
            cors_origin: cors_origin.into(),
            db_pool: None,
            media: None,
            upload_limits: UploadLimits::default(),
        }
    }

    /// Attach a database connection pool for the persistence adapter.
    ///
    /// Without one, the server falls back to the in-memory fixture store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach upload provider settings for the media adapter.
    ///
    /// Without them, the server falls back to the fixture media store.
    #[must_use]
    pub fn with_media(mut self, media: MediaProviderConfig) -> Self {
        self.media = Some(media);
        self
    }

    /// Override the multipart upload limits.
    #[must_use]
    pub const fn with_upload_limits(mut self, limits: UploadLimits) -> Self {
        self.upload_limits = limits;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
