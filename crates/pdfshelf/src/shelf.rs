//! Owned wiring of the store handle, pipeline and retrieval service.

use crate::config::Config;
use crate::db::{document_repo, Database};
use crate::error::Result;
use crate::ids::RecordId;
use crate::pipeline::{reconcile, IngestError, Pipeline, ReconcileError};
use crate::retrieval::{DocumentInfo, RetrievalService};
use crate::storage::FileStorage;

/// One open document shelf. Open at startup, drop or `close` at shutdown.
pub struct Shelf {
    db: Database,
    pipeline: Pipeline,
    retrieval: RetrievalService,
}

impl Shelf {
    /// Opens the database (running migrations) and wires the components
    /// around that single handle.
    pub fn open(config: &Config) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        let storage = FileStorage::new(&config.upload_directory);

        tracing::info!(records = document_repo::count(&db)?, "Shelf opened");

        Ok(Self {
            pipeline: Pipeline::new(storage, db.clone()),
            retrieval: RetrievalService::new(db.clone(), &config.content_base_url),
            db,
        })
    }

    pub fn ingest(
        &self,
        filename: &str,
        payload: &[u8],
    ) -> std::result::Result<RecordId, IngestError> {
        self.pipeline.ingest(filename, payload)
    }

    pub fn get_metadata(&self, record_id: &str) -> Result<Option<DocumentInfo>> {
        Ok(self.retrieval.get_metadata(record_id)?)
    }

    pub fn get_text(&self, record_id: &str) -> Result<Option<String>> {
        Ok(self.retrieval.get_text(record_id)?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.retrieval.is_empty()?)
    }

    pub fn count(&self) -> Result<u64> {
        Ok(self.retrieval.count()?)
    }

    pub fn find_orphans(&self) -> std::result::Result<Vec<String>, ReconcileError> {
        reconcile::find_orphans(&self.db, self.pipeline.storage())
    }

    pub fn remove_orphans(&self) -> std::result::Result<Vec<String>, ReconcileError> {
        reconcile::remove_orphans(&self.db, self.pipeline.storage())
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn retrieval(&self) -> &RetrievalService {
        &self.retrieval
    }

    /// Shuts the shelf down and closes the record store, surfacing any error
    /// SQLite reports on close. Dropping a `Shelf` instead closes silently.
    pub fn close(self) -> Result<()> {
        let Shelf {
            db,
            pipeline,
            retrieval,
        } = self;
        drop(pipeline);
        drop(retrieval);

        db.close()?;
        tracing::info!("Shelf closed");
        Ok(())
    }
}
