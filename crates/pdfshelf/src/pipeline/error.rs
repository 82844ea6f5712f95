use thiserror::Error;

use crate::db::DatabaseError;
use crate::error::{ProcessError, StorageError};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported document format for '{0}': only .pdf files are accepted")]
    UnsupportedFormat(String),

    #[error("Storing raw document failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Extraction failed for stored object '{file_id}': {source}")]
    Extraction {
        file_id: String,
        #[source]
        source: ProcessError,
    },

    #[error("Persisting record for stored object '{file_id}' failed: {source}")]
    Persist {
        file_id: String,
        #[source]
        source: DatabaseError,
    },

    #[error("Could not find an unused file id after {0} attempts")]
    FileIdExhausted(usize),
}

impl IngestError {
    /// True when the caller sent something unacceptable, as opposed to a
    /// failure on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, IngestError::UnsupportedFormat(_))
    }

    /// The raw object left behind without a record, if the failure happened
    /// after the payload was stored.
    pub fn orphaned_file_id(&self) -> Option<&str> {
        match self {
            IngestError::Extraction { file_id, .. } | IngestError::Persist { file_id, .. } => {
                Some(file_id)
            }
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Listing or removing raw objects failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Reading record file ids failed: {0}")]
    Database(#[from] DatabaseError),
}
