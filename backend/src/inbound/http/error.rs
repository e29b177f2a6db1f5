//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Internal error detail is redacted in release builds; debug builds
//! return the underlying message to ease local diagnosis.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::middleware::trace::TraceId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) && !cfg!(debug_assertions) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

fn effective_trace_id(error: &Error) -> Option<String> {
    error
        .trace_id()
        .map(ToOwned::to_owned)
        .or_else(|| TraceId::current().map(|id| id.to_string()))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = %self.message(), "request failed with an internal error");
        }

        let mut builder = HttpResponse::build(self.status_code());
        let mut payload = redact_if_internal(self);
        if let Some(id) = effective_trace_id(self) {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
            payload = payload.with_trace_id(id);
        }

        builder.json(payload)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use rstest::rstest;

    use crate::domain::{Error, ErrorCode};

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("duplicate"), StatusCode::CONFLICT)]
    #[case(Error::unavailable("later"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_status(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(error.status_code(), status);
    }

    #[rstest]
    fn internal_detail_is_shown_in_debug_builds() {
        let redacted = super::redact_if_internal(&Error::internal("database exploded"));
        if cfg!(debug_assertions) {
            assert_eq!(redacted.message(), "database exploded");
        } else {
            assert_eq!(redacted.message(), "Internal server error");
        }
        assert_eq!(redacted.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn non_internal_errors_are_never_redacted() {
        let original = Error::invalid_request("title too short");
        assert_eq!(super::redact_if_internal(&original), original);
    }
}
