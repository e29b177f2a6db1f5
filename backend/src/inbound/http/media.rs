//! Bulk media upload and ad-hoc media deletion endpoints.
//!
//! ```text
//! POST   /api/v1/activities/upload
//! DELETE /api/v1/activities/upload
//! ```
//!
//! Uploads are multipart batches under the `files` field. Requests violating
//! the batch limits (file count, file size, non-media content types) are
//! rejected whole; once a batch is accepted, provider failures are reported
//! per file and never abort the remainder.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, post, web};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::activity_service::MediaUploadOutcome;
use crate::domain::ports::MediaUpload;
use crate::domain::{Error, MediaKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::{HttpState, UploadLimits};
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_enum};

/// Multipart field carrying the uploaded files.
const UPLOAD_FIELD: &str = "files";

/// Per-file entry of the upload response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResultBody {
    /// Client-supplied file name, echoed for correlation.
    pub original_name: String,
    /// Durable public URL, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Opaque provider identifier, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Kind the asset was stored as, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Failure message, present when this file failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<MediaUploadOutcome> for MediaUploadResultBody {
    fn from(outcome: MediaUploadOutcome) -> Self {
        match outcome.stored {
            Ok(stored) => Self {
                original_name: outcome.original_name,
                url: Some(stored.url),
                asset_id: Some(stored.asset_id),
                kind: Some(stored.kind.to_string()),
                error: None,
            },
            // Provider detail stays in the logs; clients get a stable message.
            Err(_) => Self {
                original_name: outcome.original_name,
                url: None,
                asset_id: None,
                kind: None,
                error: Some("upload failed".to_owned()),
            },
        }
    }
}

/// Response payload of the bulk upload endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponse {
    /// One entry per uploaded file, in submission order.
    pub files: Vec<MediaUploadResultBody>,
}

fn malformed_multipart(err: &actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart payload: {err}"))
}

/// Read one multipart file field into memory, enforcing the size limit.
async fn read_field(
    field: &mut actix_multipart::Field,
    limits: UploadLimits,
) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| malformed_multipart(&err))? {
        if bytes.len() + chunk.len() > limits.max_file_bytes {
            return Err(Error::invalid_request(format!(
                "file exceeds the maximum size of {} bytes",
                limits.max_file_bytes
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn collect_files(
    mut payload: Multipart,
    limits: UploadLimits,
) -> Result<Vec<MediaUpload>, Error> {
    let mut files = Vec::new();
    while let Some(mut field) = payload.try_next().await.map_err(|err| malformed_multipart(&err))? {
        if field.name() != Some(UPLOAD_FIELD) {
            return Err(Error::invalid_request(format!(
                "unexpected multipart field; files go under `{UPLOAD_FIELD}`"
            )));
        }
        if files.len() >= limits.max_files {
            return Err(Error::invalid_request(format!(
                "too many files; the limit is {}",
                limits.max_files
            )));
        }

        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .unwrap_or("unnamed")
            .to_owned();
        let content_type = field
            .content_type()
            .map(ToString::to_string)
            .unwrap_or_default();
        if !content_type.starts_with("image/") && !content_type.starts_with("video/") {
            return Err(Error::invalid_request("only image and video files are accepted")
                .with_details(json!({ "file": file_name, "contentType": content_type })));
        }

        let bytes = read_field(&mut field, limits).await?;
        files.push(MediaUpload { file_name, content_type, bytes });
    }
    Ok(files)
}

/// Upload a batch of media files to the hosting provider.
///
/// Provider failures are reported per file; the batch itself only fails on
/// malformed payloads or limit violations.
#[utoipa::path(
    post,
    path = "/api/v1/activities/upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-file upload results", body = MediaUploadResponse),
        (status = 400, description = "Malformed batch", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "uploadMedia"
)]
#[post("/activities/upload")]
pub async fn upload_media(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let files = collect_files(payload, state.upload_limits).await?;
    if files.is_empty() {
        return Err(Error::invalid_request("no files were uploaded"));
    }

    let outcomes = state.activities.upload_media(files).await;
    let response = MediaUploadResponse {
        files: outcomes.into_iter().map(MediaUploadResultBody::from).collect(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Request payload for deleting one hosted asset.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMediaRequestBody {
    /// Opaque provider identifier of the asset.
    pub asset_id: Option<String>,
    /// Asset kind; defaults to `image`.
    pub kind: Option<String>,
}

/// Delete one hosted asset by its opaque identifier.
///
/// Used to discard uploads that were never attached to a record.
#[utoipa::path(
    delete,
    path = "/api/v1/activities/upload",
    request_body = DeleteMediaRequestBody,
    responses(
        (status = 204, description = "Asset deleted"),
        (status = 400, description = "Missing asset identifier", body = ErrorSchema),
        (status = 500, description = "Provider failure", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "deleteMedia"
)]
#[delete("/activities/upload")]
pub async fn delete_media(
    state: web::Data<HttpState>,
    payload: web::Json<DeleteMediaRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let asset_id = body
        .asset_id
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error(FieldName::new("assetId")))?;
    let kind = match body.kind.as_deref() {
        Some(raw) => parse_enum::<MediaKind>(raw, FieldName::new("kind"))?,
        None => MediaKind::Image,
    };
    state.activities.delete_media(asset_id.as_str(), kind).await?;
    Ok(HttpResponse::NoContent().finish())
}
