//! Shared helpers for Diesel repository implementations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::ActivityRepositoryError;

use super::pool::PoolError;

/// Map pool errors to domain repository errors.
pub(crate) fn map_pool_error(error: PoolError) -> ActivityRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ActivityRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain repository errors.
///
/// Unique violations become duplicate-key errors; everything else is a
/// generic query failure with the engine detail kept out of client reach.
pub(crate) fn map_diesel_error(error: DieselError, operation: &str) -> ActivityRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        other => {
            debug!(error = %other, %operation, "diesel operation failed");
        }
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            ActivityRepositoryError::duplicate(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ActivityRepositoryError::connection("database connection error")
        }
        _ => ActivityRepositoryError::query(format!("{operation} failed")),
    }
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

/// Escape LIKE metacharacters and wrap the term for substring matching.
///
/// The produced pattern is fed to `ILIKE`, preserving the case-insensitive
/// substring semantics of the filter predicate.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
