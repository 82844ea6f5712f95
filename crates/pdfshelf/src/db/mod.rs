//! Record store backed by a single SQLite file.
//!
//! One connection serves the whole shelf. Every statement runs under its
//! mutex, so record ids are assigned one insert at a time and come out
//! strictly increasing even when several threads ingest at once.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rusqlite::Connection;

pub mod document_repo;
pub mod error;
pub mod migrations;

pub use document_repo::{DocumentRecord, DocumentStatus, DocumentSummary, NewDocument};
pub use error::DatabaseError;

/// How long a statement waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the record store connection.
///
/// The shelf hands clones to its pipeline and retrieval service. `close`
/// succeeds only on the last remaining handle.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens the store at `path`, creating the file and its directory on
    /// first use, and brings the schema up to date.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| DatabaseError::CreateDirectory {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let db = Self::from_connection(conn)?;
        log::info!("Record store opened at {}", path.display());
        Ok(db)
    }

    /// Store that lives only as long as its handles. Used by tests.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with the connection locked.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let guard = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&guard)
    }

    /// Closes the connection and reports any error SQLite raises doing so.
    ///
    /// Fails with `StillShared`, closing nothing, while other clones of this
    /// handle are alive. A poisoned lock does not stop the close: no
    /// statement can be in flight once this is the last handle.
    pub fn close(self) -> Result<(), DatabaseError> {
        let mutex = Arc::try_unwrap(self.conn).map_err(|shared| DatabaseError::StillShared {
            others: Arc::strong_count(&shared) - 1,
        })?;
        let conn = mutex.into_inner().unwrap_or_else(PoisonError::into_inner);

        conn.close().map_err(|(_, e)| DatabaseError::Close(e))?;
        log::debug!("Record store closed");
        Ok(())
    }
}
