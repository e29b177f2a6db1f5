//! Reqwest-backed media provider adapter.
//!
//! This adapter owns transport details only: multipart request assembly,
//! timeout and HTTP error mapping, and JSON decoding of the provider's
//! responses. The provider exposes per-kind endpoints
//! (`<base>/<kind>/upload`, `<base>/<kind>/destroy`) and returns a durable
//! URL plus an opaque asset id for every stored file.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::MediaKind;
use crate::domain::ports::{MediaStore, MediaStoreError, MediaUpload, StoredMedia};

const DEFAULT_UPLOAD_TIMEOUT_SECONDS: u64 = 120;

/// Connection settings for the upload provider.
///
/// Constructed from server configuration and passed in explicitly; the
/// adapter holds no ambient credentials.
#[derive(Debug, Clone)]
pub struct MediaProviderConfig {
    /// Base endpoint of the provider API.
    pub base_url: Url,
    /// API key sent with every request.
    pub api_key: String,
    /// Folder the provider scopes uploads under.
    pub folder: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl MediaProviderConfig {
    /// Settings with the default upload timeout.
    #[must_use]
    pub fn new(base_url: Url, api_key: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            folder: folder.into(),
            timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECONDS),
        }
    }
}

/// Media provider adapter performing HTTP requests against one endpoint.
pub struct HttpMediaStore {
    client: Client,
    config: MediaProviderConfig,
}

impl HttpMediaStore {
    /// Build an adapter using a reqwest client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: MediaProviderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> Result<Url, MediaStoreError> {
        self.config
            .base_url
            .join(format!("{}/{action}", kind.as_str()).as_str())
            .map_err(|err| MediaStoreError::rejected(format!("invalid provider endpoint: {err}")))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponseDto {
    result: String,
}

fn map_transport_error(err: reqwest::Error) -> MediaStoreError {
    MediaStoreError::transport(err.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MediaStoreError {
    let detail = String::from_utf8_lossy(body);
    let detail = detail.trim();
    if detail.is_empty() {
        MediaStoreError::rejected(format!("provider returned {status}"))
    } else {
        MediaStoreError::rejected(format!("provider returned {status}: {detail}"))
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaStoreError> {
        let kind = upload
            .kind()
            .ok_or_else(|| MediaStoreError::rejected("unsupported content type"))?;
        let endpoint = self.endpoint(kind, "upload")?;

        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(upload.content_type.as_str())
            .map_err(|err| MediaStoreError::rejected(format!("invalid content type: {err}")))?;
        let form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("folder", self.config.folder.clone())
            .part("file", part);

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: UploadResponseDto = serde_json::from_slice(body.as_ref())
            .map_err(|err| MediaStoreError::rejected(format!("invalid provider response: {err}")))?;
        Ok(StoredMedia {
            url: decoded.secure_url,
            asset_id: decoded.public_id,
            kind,
        })
    }

    async fn delete(&self, asset_id: &str, kind: MediaKind) -> Result<(), MediaStoreError> {
        let endpoint = self.endpoint(kind, "destroy")?;
        let response = self
            .client
            .post(endpoint)
            .form(&[
                ("api_key", self.config.api_key.as_str()),
                ("public_id", asset_id),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: DestroyResponseDto = serde_json::from_slice(body.as_ref())
            .map_err(|err| MediaStoreError::rejected(format!("invalid provider response: {err}")))?;
        if decoded.result == "ok" {
            Ok(())
        } else {
            Err(MediaStoreError::rejected(format!(
                "provider refused deletion: {}",
                decoded.result
            )))
        }
    }
}
