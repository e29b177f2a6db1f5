//! Diesel row structs for the activities table.
//!
//! Rows are internal to the persistence adapter; conversion back to the
//! domain goes through [`ActivityDraft`] so rehydrated records pass the same
//! validation as client input.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Activity, ActivityCategory, ActivityDraft, ActivityId, ActivityStatus, ActivityUpdate,
};

use super::schema::activities;

/// Queryable row for activity records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub participants: i32,
    pub status: String,
    pub category: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable row for new activity records.
///
/// Audit timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub(crate) struct NewActivityRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub participants: i32,
    pub status: String,
    pub category: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl NewActivityRow {
    /// Build an insertable row from a validated draft.
    pub(crate) fn from_draft(id: ActivityId, draft: ActivityDraft) -> Self {
        Self {
            id: id.as_uuid(),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            participants: draft.participants,
            status: draft.status.to_string(),
            category: draft.category.to_string(),
            images: draft.images,
            videos: draft.videos,
        }
    }
}

/// Changeset for partial updates.
///
/// `None` fields are skipped by Diesel; `updated_at` is always refreshed, so
/// an otherwise-empty update still touches the record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = activities)]
pub(crate) struct ActivityChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub participants: Option<i32>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

impl ActivityChangeset {
    /// Build a changeset from a validated partial update.
    pub(crate) fn from_update(update: ActivityUpdate, updated_at: DateTime<Utc>) -> Self {
        Self {
            title: update.title,
            description: update.description,
            date: update.date,
            location: update.location,
            participants: update.participants,
            status: update.status.map(|status| status.to_string()),
            category: update.category.map(|category| category.to_string()),
            images: update.images,
            videos: update.videos,
            updated_at,
        }
    }
}

/// Convert a stored row back into the domain aggregate.
pub(crate) fn row_to_activity(row: ActivityRow) -> Result<Activity, String> {
    let status = ActivityStatus::from_str(row.status.as_str())
        .map_err(|_| format!("unknown status label in store: {}", row.status))?;
    let category = ActivityCategory::from_str(row.category.as_str())
        .map_err(|_| format!("unknown category label in store: {}", row.category))?;
    Activity::new(
        ActivityId::new(row.id),
        ActivityDraft {
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            participants: row.participants,
            status,
            category,
            images: row.images,
            videos: row.videos,
        },
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| err.to_string())
}
