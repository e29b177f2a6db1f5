//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//! When migrations change the schema, regenerate with `diesel print-schema`.

diesel::table! {
    /// Volunteer activity records.
    ///
    /// The `id` column is the primary key (UUID v4). Audit timestamps are
    /// set by column defaults on insert; `updated_at` is refreshed by the
    /// update changeset.
    activities (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Event name (3-200 characters).
        title -> Varchar,
        /// Long-form description (10-2000 characters).
        description -> Text,
        /// Occurrence time of the event.
        date -> Timestamptz,
        /// Venue or address (3-300 characters).
        location -> Varchar,
        /// Expected number of participants (1-10000).
        participants -> Int4,
        /// Lifecycle status label.
        status -> Varchar,
        /// Category label.
        category -> Varchar,
        /// Image attachment URLs.
        images -> Array<Text>,
        /// Video attachment URLs.
        videos -> Array<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
