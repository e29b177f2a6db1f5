//! Volunteer activity aggregate and its validation rules.
//!
//! An [`Activity`] is the sole managed entity: a volunteer event with a
//! title, description, occurrence date, location, expected participant count,
//! lifecycle status, category label, and attached media URLs. Construction
//! goes through [`ActivityDraft`] (create) or [`ActivityUpdate`] (partial
//! update); both normalise text fields and enforce the same invariants, so an
//! `Activity` value is valid by construction.

mod validation;

pub mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use validation::{validate_media_urls, validate_participants, validate_text_field};

pub use validation::is_media_url;

/// Bounds for the `title` field, in characters.
pub const TITLE_LEN: (usize, usize) = (3, 200);
/// Bounds for the `description` field, in characters.
pub const DESCRIPTION_LEN: (usize, usize) = (10, 2000);
/// Bounds for the `location` field, in characters.
pub const LOCATION_LEN: (usize, usize) = (3, 300);
/// Inclusive bounds for the `participants` field.
pub const PARTICIPANTS_RANGE: (i32, i32) = (1, 10_000);

/// Opaque activity identifier, assigned by the store on creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActivityId(Uuid);

impl ActivityId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ActivityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle status of an activity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Scheduled but not yet started. The default for new records.
    Upcoming,
    /// Currently running.
    Ongoing,
    /// Finished.
    Completed,
}

impl ActivityStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Upcoming, Self::Ongoing, Self::Completed];

    /// Stable wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }
}

impl Default for ActivityStatus {
    fn default() -> Self {
        Self::Upcoming
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of: upcoming, ongoing, completed")]
pub struct ParseActivityStatusError;

impl std::str::FromStr for ActivityStatus {
    type Err = ParseActivityStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseActivityStatusError),
        }
    }
}

/// Category label of an activity. The set is closed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    /// Teaching, tutoring, and literacy programmes.
    Education,
    /// Clean-ups, conservation, and recycling drives.
    Environment,
    /// Health screenings, blood drives, and care outreach.
    Health,
    /// Neighbourhood and social support initiatives.
    Community,
    /// Anything that does not fit the other labels.
    Other,
}

impl ActivityCategory {
    /// Every category label.
    pub const ALL: [Self; 5] = [
        Self::Education,
        Self::Environment,
        Self::Health,
        Self::Community,
        Self::Other,
    ];

    /// Stable wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Environment => "environment",
            Self::Health => "health",
            Self::Community => "community",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("category must be one of: education, environment, health, community, other")]
pub struct ParseActivityCategoryError;

impl std::str::FromStr for ActivityCategory {
    type Err = ParseActivityCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "education" => Ok(Self::Education),
            "environment" => Ok(Self::Environment),
            "health" => Ok(Self::Health),
            "community" => Ok(Self::Community),
            "other" => Ok(Self::Other),
            _ => Err(ParseActivityCategoryError),
        }
    }
}

/// Kind of attached media, constraining the accepted URL extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image attachment.
    Image,
    /// Video attachment.
    Video,
}

impl MediaKind {
    /// Accepted file extensions for this kind, lowercase, without the dot.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => &["jpg", "jpeg", "png", "gif", "webp"],
            Self::Video => &["mp4", "avi", "mov", "wmv", "webm"],
        }
    }

    /// Stable wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(ParseMediaKindError),
        }
    }
}

/// Error returned when parsing an unknown media kind label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("media kind must be image or video")]
pub struct ParseMediaKindError;

/// Validation errors raised by [`ActivityDraft`] and [`ActivityUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityValidationError {
    /// A text field is outside its character bounds after trimming.
    #[error("{field} must be between {min} and {max} characters")]
    TextLength {
        /// Offending field name.
        field: &'static str,
        /// Minimum length in characters.
        min: usize,
        /// Maximum length in characters.
        max: usize,
    },
    /// The participant count is outside the accepted range.
    #[error("participants must be between {min} and {max}", min = PARTICIPANTS_RANGE.0, max = PARTICIPANTS_RANGE.1)]
    ParticipantsOutOfRange {
        /// The rejected count.
        value: i32,
    },
    /// A media URL does not match the extension whitelist for its kind.
    #[error("{field}[{index}] must be a valid {kind} URL")]
    InvalidMediaUrl {
        /// Offending list field (`images` or `videos`).
        field: &'static str,
        /// Zero-based index of the offending entry.
        index: usize,
        /// Expected media kind.
        kind: MediaKind,
    },
}

impl ActivityValidationError {
    /// Name of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::TextLength { field, .. } | Self::InvalidMediaUrl { field, .. } => field,
            Self::ParticipantsOutOfRange { .. } => "participants",
        }
    }
}

/// Unvalidated input for creating an activity.
///
/// Client-supplied ids and audit timestamps are rejected upstream; the store
/// assigns both. Call [`Self::validated`] before handing the draft to a
/// repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    /// Event name.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Occurrence time of the event, distinct from audit timestamps.
    pub date: DateTime<Utc>,
    /// Venue or address.
    pub location: String,
    /// Expected number of participants.
    pub participants: i32,
    /// Lifecycle status; defaults to [`ActivityStatus::Upcoming`] upstream.
    pub status: ActivityStatus,
    /// Category label.
    pub category: ActivityCategory,
    /// Image attachment URLs.
    pub images: Vec<String>,
    /// Video attachment URLs.
    pub videos: Vec<String>,
}

impl ActivityDraft {
    /// Normalise text fields and check every invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`ActivityValidationError`] encountered, in field
    /// declaration order.
    pub fn validated(self) -> Result<Self, ActivityValidationError> {
        let Self {
            title,
            description,
            date,
            location,
            participants,
            status,
            category,
            images,
            videos,
        } = self;
        let title = validate_text_field(title, "title", TITLE_LEN)?;
        let description = validate_text_field(description, "description", DESCRIPTION_LEN)?;
        let location = validate_text_field(location, "location", LOCATION_LEN)?;
        let participants = validate_participants(participants)?;
        validate_media_urls(&images, MediaKind::Image, "images")?;
        validate_media_urls(&videos, MediaKind::Video, "videos")?;
        Ok(Self {
            title,
            description,
            date,
            location,
            participants,
            status,
            category,
            images,
            videos,
        })
    }
}

/// Partial update for an activity; absent fields are left untouched.
///
/// Present fields obey the same constraints as on creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityUpdate {
    /// Replacement title, if supplied.
    pub title: Option<String>,
    /// Replacement description, if supplied.
    pub description: Option<String>,
    /// Replacement occurrence time, if supplied.
    pub date: Option<DateTime<Utc>>,
    /// Replacement location, if supplied.
    pub location: Option<String>,
    /// Replacement participant count, if supplied.
    pub participants: Option<i32>,
    /// Replacement status, if supplied.
    pub status: Option<ActivityStatus>,
    /// Replacement category, if supplied.
    pub category: Option<ActivityCategory>,
    /// Replacement image URL list, if supplied.
    pub images: Option<Vec<String>>,
    /// Replacement video URL list, if supplied.
    pub videos: Option<Vec<String>>,
}

impl ActivityUpdate {
    /// Normalise and check every supplied field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ActivityValidationError`] encountered.
    pub fn validated(self) -> Result<Self, ActivityValidationError> {
        let Self {
            title,
            description,
            date,
            location,
            participants,
            status,
            category,
            images,
            videos,
        } = self;
        let title = title
            .map(|value| validate_text_field(value, "title", TITLE_LEN))
            .transpose()?;
        let description = description
            .map(|value| validate_text_field(value, "description", DESCRIPTION_LEN))
            .transpose()?;
        let location = location
            .map(|value| validate_text_field(value, "location", LOCATION_LEN))
            .transpose()?;
        let participants = participants.map(validate_participants).transpose()?;
        if let Some(images) = &images {
            validate_media_urls(images, MediaKind::Image, "images")?;
        }
        if let Some(videos) = &videos {
            validate_media_urls(videos, MediaKind::Video, "videos")?;
        }
        Ok(Self {
            title,
            description,
            date,
            location,
            participants,
            status,
            category,
            images,
            videos,
        })
    }

    /// Whether the update carries no field at all.
    ///
    /// Such an update still refreshes the record's `updated_at` stamp.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.participants.is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.images.is_none()
            && self.videos.is_none()
    }
}

/// A stored volunteer activity record.
///
/// Values are valid by construction: [`Self::new`] runs the same validation
/// as [`ActivityDraft::validated`], so rows rehydrated from a store are
/// checked on the way in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    id: ActivityId,
    title: String,
    description: String,
    date: DateTime<Utc>,
    location: String,
    participants: i32,
    status: ActivityStatus,
    category: ActivityCategory,
    images: Vec<String>,
    videos: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Activity {
    /// Assemble a record from a validated draft and store-assigned metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityValidationError`] when the draft violates an
    /// invariant.
    pub fn new(
        id: ActivityId,
        draft: ActivityDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ActivityValidationError> {
        let draft = draft.validated()?;
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            participants: draft.participants,
            status: draft.status,
            category: draft.category,
            images: draft.images,
            videos: draft.videos,
            created_at,
            updated_at,
        })
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Event name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Long-form description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Occurrence time.
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Venue or address.
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Expected number of participants.
    #[must_use]
    pub const fn participants(&self) -> i32 {
        self.participants
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ActivityStatus {
        self.status
    }

    /// Category label.
    #[must_use]
    pub const fn category(&self) -> ActivityCategory {
        self.category
    }

    /// Image attachment URLs.
    #[must_use]
    pub fn images(&self) -> &[String] {
        self.images.as_slice()
    }

    /// Video attachment URLs.
    #[must_use]
    pub fn videos(&self) -> &[String] {
        self.videos.as_slice()
    }

    /// Record creation stamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation stamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Copy with `update` applied and the mutation stamp refreshed.
    ///
    /// Used by in-memory adapters; SQL adapters apply changesets directly.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityValidationError`] when a supplied field violates an
    /// invariant.
    pub fn apply_update(
        &self,
        update: ActivityUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ActivityValidationError> {
        let update = update.validated()?;
        let mut next = self.clone();
        if let Some(title) = update.title {
            next.title = title;
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(date) = update.date {
            next.date = date;
        }
        if let Some(location) = update.location {
            next.location = location;
        }
        if let Some(participants) = update.participants {
            next.participants = participants;
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(category) = update.category {
            next.category = category;
        }
        if let Some(images) = update.images {
            next.images = images;
        }
        if let Some(videos) = update.videos {
            next.videos = videos;
        }
        next.updated_at = updated_at;
        Ok(next)
    }
}
