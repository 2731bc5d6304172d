//! Shared translation of pool and Diesel failures into port errors.
//!
//! Repositories first ask [`constraint_violation`] whether a failure is a
//! unique or foreign-key violation they have a typed error for, and hand
//! everything else to [`map_diesel_error`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// A constraint the database refused a write on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConstraintViolation {
    Unique(String),
    ForeignKey(String),
}

/// Extract the violated constraint from a Diesel error, if any.
pub(crate) fn constraint_violation(error: &DieselError) -> Option<ConstraintViolation> {
    let DieselError::DatabaseError(kind, info) = error else {
        return None;
    };
    let name = info.constraint_name().unwrap_or_default().to_owned();
    match kind {
        DatabaseErrorKind::UniqueViolation => Some(ConstraintViolation::Unique(name)),
        DatabaseErrorKind::ForeignKeyViolation => Some(ConstraintViolation::ForeignKey(name)),
        _ => None,
    }
}

/// Map pool failures through the repository's connection constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure into query or connection errors. Driver messages
/// are logged at debug level and not forwarded.
pub(crate) fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection lost"),
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            query("database value could not be converted")
        }
        _ => query("database error"),
    }
}
