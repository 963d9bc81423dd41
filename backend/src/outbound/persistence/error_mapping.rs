//! Shared Diesel error classification for the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// How a low-level persistence failure should surface through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The store could not be reached; retryable by the caller.
    Connection,
    /// The query or mutation itself failed.
    Query,
}

/// Classify a Diesel error and log its shape at debug level.
pub fn classify_diesel_error(error: &DieselError) -> (FailureKind, &'static str) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            if matches!(kind, DatabaseErrorKind::ClosedConnection) {
                (FailureKind::Connection, "database connection error")
            } else {
                (FailureKind::Query, "database error")
            }
        }
        DieselError::NotFound => (FailureKind::Query, "record not found"),
        DieselError::QueryBuilderError(_) => (FailureKind::Query, "database query error"),
        other => {
            debug!(error_type = %std::any::type_name_of_val(other), "diesel operation failed");
            (FailureKind::Query, "database error")
        }
    }
}

/// Map a Diesel error through the two constructors of a port error enum.
pub fn map_diesel_error<E, Q, C>(error: &DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match classify_diesel_error(error) {
        (FailureKind::Connection, message) => connection(message),
        (FailureKind::Query, message) => query(message),
    }
}

/// Map a pool checkout failure into a port's connection error constructor.
pub fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    connection(message)
}
