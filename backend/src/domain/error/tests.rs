//! Regression coverage for the domain error payload.

use rstest::rstest;
use serde_json::json;

use super::{Error, ErrorCode, ErrorValidationError};

#[rstest]
#[case("")]
#[case("   ")]
fn blank_messages_are_rejected(#[case] message: &str) {
    let err = Error::try_new(ErrorCode::InternalError, message).expect_err("blank rejected");
    assert_eq!(err, ErrorValidationError::EmptyMessage);
}

#[rstest]
fn constructors_set_matching_codes() {
    assert_eq!(Error::invalid_request("x").code(), ErrorCode::InvalidRequest);
    assert_eq!(Error::not_found("x").code(), ErrorCode::NotFound);
    assert_eq!(Error::conflict("x").code(), ErrorCode::Conflict);
    assert_eq!(Error::unavailable("x").code(), ErrorCode::ServiceUnavailable);
    assert_eq!(Error::internal("x").code(), ErrorCode::InternalError);
}

#[rstest]
fn serialisation_skips_absent_optionals() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialisable error");
    assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));
}

#[rstest]
fn serialisation_includes_details_and_trace_id() {
    let err = Error::invalid_request("bad field")
        .with_details(json!({ "field": "title" }))
        .with_trace_id("trace-1");
    let value = serde_json::to_value(err).expect("serialisable error");
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], "title");
    assert_eq!(value["traceId"], "trace-1");
}

#[rstest]
fn display_uses_the_message() {
    assert_eq!(Error::conflict("duplicate id").to_string(), "duplicate id");
}
