//! Domain primitives and aggregates.
//!
//! Purpose: define the strongly typed activity aggregate, the listing query
//! resolver, the ports to driven adapters, and the application service that
//! orchestrates them. Types are immutable and valid by construction;
//! invariants and serialisation contracts live in each type's Rustdoc.

pub mod activity;
pub mod activity_service;
pub mod error;
pub mod ports;


pub use self::activity::query::{
    ActivityFilter, ActivityQuery, CountRange, DateRange, SortDirection, SortField, SortKey,
};
pub use self::activity::{
    Activity, ActivityCategory, ActivityDraft, ActivityId, ActivityStatus, ActivityUpdate,
    ActivityValidationError, MediaKind,
};
pub use self::activity_service::{
    ActivityListing, ActivityService, MediaUploadOutcome, media_asset_id,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};

/// Response header carrying the request correlation identifier.
pub const TRACE_ID_HEADER: &str = "Trace-Id";
