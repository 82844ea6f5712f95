//! Read side: metadata and text lookups by record id.
//!
//! Unknown ids, malformed ids and an empty store all come back as `Ok(None)`.
//! Only store failures are errors.

use serde::Serialize;

use crate::db::{document_repo, Database, DatabaseError, DocumentStatus};
use crate::ids::RecordId;

/// Metadata view of a record, as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub author: String,
    pub creation_date: String,
    pub modification_date: String,
    pub creator: String,
    pub status: DocumentStatus,
    pub file_id: String,
    /// Where the record's text can be fetched.
    pub link_to_content: String,
}

pub struct RetrievalService {
    db: Database,
    content_base_url: String,
}

impl RetrievalService {
    pub fn new(db: Database, content_base_url: &str) -> Self {
        Self {
            db,
            content_base_url: content_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_empty(&self) -> Result<bool, DatabaseError> {
        document_repo::is_empty(&self.db)
    }

    pub fn count(&self) -> Result<u64, DatabaseError> {
        document_repo::count(&self.db)
    }

    pub fn content_link(&self, id: RecordId) -> String {
        format!("{}/text/{}.txt", self.content_base_url, id)
    }

    pub fn get_metadata(&self, record_id: &str) -> Result<Option<DocumentInfo>, DatabaseError> {
        let Some(id) = self.resolve(record_id)? else {
            return Ok(None);
        };

        let info = document_repo::find_summary(&self.db, id)?.map(|summary| DocumentInfo {
            author: summary.metadata.author,
            creation_date: summary.metadata.creation_date,
            modification_date: summary.metadata.modification_date,
            creator: summary.metadata.creator,
            status: summary.status,
            file_id: summary.file_id,
            link_to_content: self.content_link(summary.id),
        });
        Ok(info)
    }

    pub fn get_text(&self, record_id: &str) -> Result<Option<String>, DatabaseError> {
        let Some(id) = self.resolve(record_id)? else {
            return Ok(None);
        };

        document_repo::find_text(&self.db, id)
    }

    /// Short-circuits on an empty store, then rejects anything that is not a
    /// positive integer. Existence is left to the primary-key lookup.
    fn resolve(&self, record_id: &str) -> Result<Option<RecordId>, DatabaseError> {
        if self.is_empty()? {
            tracing::debug!("Lookup on empty store");
            return Ok(None);
        }
        Ok(RecordId::parse(record_id))
    }
}
