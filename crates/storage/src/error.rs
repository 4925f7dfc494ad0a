//! Storage errors and their mapping onto sink failures.

use pipeline::SinkError;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    /// Busy or locked database: another writer holds it, a retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Sqlite(e) => matches!(
                e.sqlite_error_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            ),
        }
    }
}

impl From<StorageError> for SinkError {
    fn from(err: StorageError) -> Self {
        if err.is_transient() {
            SinkError::Transient(err.to_string())
        } else {
            SinkError::Fatal(err.to_string())
        }
    }
}
