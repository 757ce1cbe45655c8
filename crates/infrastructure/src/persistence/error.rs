//! Shared error mapping for the SQLite persistence layer

use application::error::ApplicationError;
use tokio::task::JoinError;

/// Map a connection pool error to an application-layer error
pub fn map_pool_error(e: r2d2::Error) -> ApplicationError {
    ApplicationError::Persistence(format!("Connection pool error: {e}"))
}

/// Map a SQLite error to an application-layer error
pub fn map_sqlite_error(e: rusqlite::Error) -> ApplicationError {
    match e {
        rusqlite::Error::QueryReturnedNoRows => {
            ApplicationError::NotFound("Database record not found".to_string())
        },
        other => ApplicationError::Persistence(format!("Database error: {other}")),
    }
}

/// Map a JSON (de)serialization error on a stored column
pub fn map_json_error(e: serde_json::Error) -> ApplicationError {
    ApplicationError::Persistence(format!("Stored JSON is invalid: {e}"))
}

/// Map a failed blocking task
pub fn map_join_error(e: JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Database task failed: {e}"))
}

/// Extension trait for optional query results
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
