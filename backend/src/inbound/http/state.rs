//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain service and remain testable without I/O.

use crate::domain::ActivityService;

/// Limits applied to multipart upload requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Maximum number of files accepted per batch.
    pub max_files: usize,
    /// Maximum size of a single file in bytes.
    pub max_file_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Activity use-cases over the configured ports.
    pub activities: ActivityService,
    /// Upload limits enforced by the media endpoints.
    pub upload_limits: UploadLimits,
}

impl HttpState {
    /// Construct state around a service with default upload limits.
    #[must_use]
    pub fn new(activities: ActivityService) -> Self {
        Self {
            activities,
            upload_limits: UploadLimits::default(),
        }
    }

    /// Override the upload limits.
    #[must_use]
    pub const fn with_upload_limits(mut self, limits: UploadLimits) -> Self {
        self.upload_limits = limits;
        self
    }
}
