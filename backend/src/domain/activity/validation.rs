//! Validation helpers shared by activity drafts and partial updates.

use super::{ActivityValidationError, MediaKind, PARTICIPANTS_RANGE};

/// Trim a text field and enforce its character bounds.
pub(super) fn validate_text_field(
    value: String,
    field: &'static str,
    (min, max): (usize, usize),
) -> Result<String, ActivityValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(ActivityValidationError::TextLength { field, min, max });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Enforce the inclusive participant-count bounds.
pub(super) fn validate_participants(value: i32) -> Result<i32, ActivityValidationError> {
    let (min, max) = PARTICIPANTS_RANGE;
    if value < min || value > max {
        return Err(ActivityValidationError::ParticipantsOutOfRange { value });
    }
    Ok(value)
}

/// Enforce the extension whitelist on every URL in a media list.
pub(super) fn validate_media_urls(
    urls: &[String],
    kind: MediaKind,
    field: &'static str,
) -> Result<(), ActivityValidationError> {
    for (index, url) in urls.iter().enumerate() {
        if !is_media_url(url, kind) {
            return Err(ActivityValidationError::InvalidMediaUrl { field, index, kind });
        }
    }
    Ok(())
}

/// Whether `url` is an http(s) URL ending in an accepted extension for `kind`.
///
/// Matching is case-insensitive and requires a non-empty stem between the
/// scheme and the extension.
#[must_use]
pub fn is_media_url(url: &str, kind: MediaKind) -> bool {
    let lower = url.to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("http://")
        .or_else(|| lower.strip_prefix("https://"))
    else {
        return false;
    };
    match rest.rsplit_once('.') {
        Some((stem, extension)) => {
            !stem.is_empty() && kind.extensions().contains(&extension)
        }
        None => false,
    }
}
