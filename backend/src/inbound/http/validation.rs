//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces a domain [`Error`] carrying the offending field and
//! a machine-readable code in its `details`, so clients receive field-level
//! messages without the domain layer knowing about HTTP.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{ActivityId, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidValue,
    InvalidTimestamp,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidValue => "invalid_value",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Parse a path identifier, mirroring the store's opaque-id format.
pub(crate) fn parse_activity_id(value: &str) -> Result<ActivityId, Error> {
    value.parse::<ActivityId>().map_err(|_| {
        Error::invalid_request("invalid id format").with_details(json!({
            "field": "id",
            "value": value,
            "code": ErrorCode::InvalidId.as_str(),
        }))
    })
}

/// Parse an enum-like value whose `FromStr` error text names the valid set.
pub(crate) fn parse_enum<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field.as_str(),
            "value": value,
            "code": ErrorCode::InvalidValue.as_str(),
        }))
    })
}

/// Parse an optional enum-like value.
pub(crate) fn parse_optional_enum<T>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map(|raw| parse_enum(raw, field)).transpose()
}

/// Parse a non-negative integer parameter.
pub(crate) fn parse_u32(value: &str, field: FieldName) -> Result<u32, Error> {
    value.parse::<u32>().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            ErrorCode::InvalidValue,
            format!("{name} must be a non-negative integer"),
        )
    })
}

/// Parse a non-negative `i32` parameter (range-filter bounds).
pub(crate) fn parse_non_negative_i32(value: &str, field: FieldName) -> Result<i32, Error> {
    let parsed = value.parse::<i32>().ok().filter(|n| *n >= 0);
    parsed.ok_or_else(|| {
        let name = field.as_str();
        field_error(
            field,
            ErrorCode::InvalidValue,
            format!("{name} must be a non-negative integer"),
        )
    })
}

/// Parse an ISO timestamp: RFC 3339, or a bare `YYYY-MM-DD` date taken as
/// midnight UTC.
pub(crate) fn parse_iso_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    let name = field.as_str();
    Err(Error::invalid_request(format!(
        "{name} must be an ISO date (YYYY-MM-DD or RFC 3339)"
    ))
    .with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidTimestamp.as_str(),
    })))
}

/// Trim a search term and enforce its maximum length.
///
/// Blank terms are rejected rather than silently dropped.
pub(crate) fn parse_search_term(
    value: String,
    field: FieldName,
    max_len: usize,
) -> Result<String, Error> {
    let name = field.as_str();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field_error(
            field,
            ErrorCode::InvalidValue,
            format!("{name} must not be empty"),
        ));
    }
    if trimmed.chars().count() > max_len {
        return Err(field_error(
            field,
            ErrorCode::OutOfRange,
            format!("{name} must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::{
        FieldName, parse_activity_id, parse_iso_timestamp, parse_non_negative_i32,
        parse_search_term, parse_u32,
    };
    use crate::domain::{ActivityStatus, ErrorCode as DomainErrorCode};

    #[rstest]
    fn activity_id_rejects_non_uuid_values() {
        let err = parse_activity_id("not-a-uuid").expect_err("rejected");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(err.message(), "invalid id format");
    }

    #[rstest]
    fn enum_parse_error_names_the_valid_set() {
        let err = super::parse_enum::<ActivityStatus>("archived", FieldName::new("status"))
            .expect_err("rejected");
        assert!(err.message().contains("upcoming, ongoing, completed"));
    }

    #[rstest]
    fn iso_timestamp_accepts_both_forms() {
        let full = parse_iso_timestamp("2026-06-01T08:30:00Z", FieldName::new("dateFrom"))
            .expect("rfc3339 accepted");
        assert_eq!(
            full,
            Utc.with_ymd_and_hms(2026, 6, 1, 8, 30, 0).single().expect("valid")
        );
        let bare = parse_iso_timestamp("2026-06-01", FieldName::new("dateFrom"))
            .expect("bare date accepted");
        assert_eq!(
            bare,
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).single().expect("valid")
        );
    }

    #[rstest]
    fn iso_timestamp_rejects_other_formats() {
        assert!(parse_iso_timestamp("01/06/2026", FieldName::new("dateTo")).is_err());
    }

    #[rstest]
    #[case("0", 0)]
    #[case("42", 42)]
    fn u32_parse_accepts_non_negatives(#[case] raw: &str, #[case] parsed: u32) {
        assert_eq!(parse_u32(raw, FieldName::new("page")).expect("accepted"), parsed);
    }

    #[rstest]
    #[case("-1")]
    #[case("ten")]
    #[case("1.5")]
    fn numeric_parsers_reject_garbage(#[case] raw: &str) {
        assert!(parse_u32(raw, FieldName::new("page")).is_err());
        assert!(parse_non_negative_i32(raw, FieldName::new("participantsMin")).is_err());
    }

    #[rstest]
    fn search_terms_are_trimmed_and_bounded() {
        let term = parse_search_term("  river  ".to_owned(), FieldName::new("keyword"), 100)
            .expect("accepted");
        assert_eq!(term, "river");
        assert!(parse_search_term("   ".to_owned(), FieldName::new("keyword"), 100).is_err());
        assert!(parse_search_term("x".repeat(101), FieldName::new("keyword"), 100).is_err());
    }
}
