use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create database directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration v{version} failed: {reason}")]
    Migration { version: u32, reason: String },

    /// SQLite handed back a row id outside the valid record id range.
    #[error("Store assigned an invalid record id: {0}")]
    InvalidRecordId(i64),

    #[error("Database lock poisoned")]
    LockPoisoned,

    /// `close` was called while other handles to the connection were alive.
    #[error("Cannot close the record store: {others} other handle(s) still open")]
    StillShared { others: usize },

    #[error("Closing the record store failed: {0}")]
    Close(#[source] rusqlite::Error),
}
