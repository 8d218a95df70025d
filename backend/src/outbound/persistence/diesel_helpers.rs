//! Error mapping shared by the Diesel POI adapter.
//!
//! PostgreSQL reports an undefined table (SQLSTATE `42P01`) as an
//! unclassified database error, so the missing collection is recognised from
//! the message text.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::PoiRepositoryError;

use super::pool::PoolError;

/// Map pool errors to repository connection errors.
pub fn map_pool_error(error: PoolError) -> PoiRepositoryError {
    PoiRepositoryError::connection(error.into_message())
}

/// Whether a database message reports an undefined relation.
pub fn is_missing_relation(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("relation") && lower.contains("does not exist")
}

/// Map Diesel errors to repository errors, tagging the failing operation.
pub fn map_diesel_error(error: DieselError, operation: &str) -> PoiRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            PoiRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) if is_missing_relation(info.message()) => {
            PoiRepositoryError::missing_collection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            PoiRepositoryError::query(format!("{operation}: {}", info.message()))
        }
        other => PoiRepositoryError::query(format!("{operation}: {other}")),
    }
}
