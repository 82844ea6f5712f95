//! Cleanup of raw objects that never got a record.
//!
//! Ingestion keeps the stored payload when extraction or the insert fails.
//! These functions find and, on request, delete such orphans. They are never
//! called by the pipeline itself. Run them only while no ingestion is in
//! flight: a payload stored moments ago but not yet committed looks exactly
//! like an orphan.

use tracing::{info, info_span};

use crate::db::{document_repo, Database};
use crate::storage::FileStorage;

use super::error::ReconcileError;

/// File ids present in storage but referenced by no record, sorted.
pub fn find_orphans(db: &Database, storage: &FileStorage) -> Result<Vec<String>, ReconcileError> {
    let referenced = document_repo::file_ids(db)?;
    let orphans = storage
        .list_file_ids()?
        .into_iter()
        .filter(|id| !referenced.contains(id))
        .collect();
    Ok(orphans)
}

/// Deletes every orphan and returns the ids removed.
pub fn remove_orphans(
    db: &Database,
    storage: &FileStorage,
) -> Result<Vec<String>, ReconcileError> {
    let _span = info_span!("reconcile").entered();

    let orphans = find_orphans(db, storage)?;
    for file_id in &orphans {
        storage.remove(file_id)?;
    }

    info!(removed = orphans.len(), "Orphaned raw objects removed");
    Ok(orphans)
}
