use std::path::PathBuf;

use tracing::{debug, info, info_span, warn};

use crate::db::{document_repo, Database, DocumentStatus, NewDocument};
use crate::ids::{self, RecordId};
use crate::processor::{DocumentExtractor, DocumentFormat, ExtractedDocument, PdfExtractor};
use crate::sanitize;
use crate::storage::FileStorage;

use super::error::IngestError;

/// How many fresh file ids to try before giving up on finding an unused one.
const MAX_FILE_ID_ATTEMPTS: usize = 8;

/// Produces candidate file ids for new raw objects.
pub type FileIdSource = Box<dyn Fn() -> String + Send + Sync>;

/// Ingestion orchestrator: validate, store raw, extract, persist.
pub struct Pipeline {
    storage: FileStorage,
    extractor: Box<dyn DocumentExtractor>,
    next_file_id: FileIdSource,
    db: Database,
}

impl Pipeline {
    /// Production constructor using the PDF extractor.
    pub fn new(storage: FileStorage, db: Database) -> Self {
        Self::with_extractor(storage, Box::new(PdfExtractor::new()), db)
    }

    /// Inject a specific extractor.
    pub fn with_extractor(
        storage: FileStorage,
        extractor: Box<dyn DocumentExtractor>,
        db: Database,
    ) -> Self {
        Self {
            storage,
            extractor,
            next_file_id: Box::new(ids::generate_file_id),
            db,
        }
    }

    /// Replace the random file id generator.
    pub fn with_file_id_source(mut self, source: FileIdSource) -> Self {
        self.next_file_id = source;
        self
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Ingests one uploaded document and returns the id of its new record.
    ///
    /// Nothing is written when the filename is rejected. Once the raw bytes
    /// are stored they stay, even if extraction or the insert fails; the
    /// error then names the orphaned file id.
    pub fn ingest(&self, filename: &str, payload: &[u8]) -> Result<RecordId, IngestError> {
        let filename = sanitize::upload_filename(filename);
        let _pipeline_span = info_span!("ingest",
            filename = %filename,
            bytes = payload.len(),
        )
        .entered();

        // Step 1: Validate format
        let format = {
            let _step = info_span!("validate").entered();
            self.step_validate(&filename)?
        };

        // Step 2+3: Allocate file id and store raw bytes
        let (file_id, stored_path) = {
            let _step = info_span!("store_raw").entered();
            self.step_store_raw(payload)?
        };

        // Step 4: Extract text and metadata
        let extracted = {
            let _step = info_span!("extract", file_id = %file_id).entered();
            self.step_extract(&file_id, &stored_path)?
        };

        // Step 5: Persist record
        let record_id = {
            let _step = info_span!("persist", file_id = %file_id).entered();
            self.step_persist(&file_id, &filename, &extracted)?
        };

        info!(
            record_id = %record_id,
            file_id = %file_id,
            format = format.extension(),
            "Document ingested"
        );

        Ok(record_id)
    }

    fn step_validate(&self, filename: &str) -> Result<DocumentFormat, IngestError> {
        match DocumentFormat::from_filename(filename) {
            Some(format) if self.extractor.supports(format) => Ok(format),
            _ => {
                debug!("Rejected upload with unsupported extension");
                Err(IngestError::UnsupportedFormat(filename.to_string()))
            }
        }
    }

    fn step_store_raw(&self, payload: &[u8]) -> Result<(String, PathBuf), IngestError> {
        let file_id = self.allocate_file_id()?;
        let stored_path = self.storage.save(&file_id, payload)?;

        debug!("Stored raw object {}", sanitize::redact_path(&stored_path));
        Ok((file_id, stored_path))
    }

    /// Draws ids until one names no stored object. Saving over an existing
    /// object would corrupt another record's raw bytes.
    fn allocate_file_id(&self) -> Result<String, IngestError> {
        for _ in 0..MAX_FILE_ID_ATTEMPTS {
            let candidate = (self.next_file_id)();
            if !self.storage.exists(&candidate) {
                return Ok(candidate);
            }
            warn!(file_id = %candidate, "Generated file id already in use, retrying");
        }
        Err(IngestError::FileIdExhausted(MAX_FILE_ID_ATTEMPTS))
    }

    fn step_extract(
        &self,
        file_id: &str,
        stored_path: &std::path::Path,
    ) -> Result<ExtractedDocument, IngestError> {
        self.extractor.extract(stored_path).map_err(|e| {
            warn!(file_id = %file_id, "Extraction failed, raw object left in place: {}", e);
            IngestError::Extraction {
                file_id: file_id.to_string(),
                source: e,
            }
        })
    }

    fn step_persist(
        &self,
        file_id: &str,
        filename: &str,
        extracted: &ExtractedDocument,
    ) -> Result<RecordId, IngestError> {
        let new_document = NewDocument {
            file_id,
            original_filename: filename,
            text: &extracted.text,
            metadata: &extracted.metadata,
            status: DocumentStatus::Success,
        };

        document_repo::insert(&self.db, &new_document).map_err(|e| {
            warn!(file_id = %file_id, "Insert failed, raw object left in place: {}", e);
            IngestError::Persist {
                file_id: file_id.to_string(),
                source: e,
            }
        })
    }
}
