//! Document repository: inserts and lookups for the `documents` table.
//!
//! Records are write-once. There is no update or delete path.

use std::collections::HashSet;
use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{Database, DatabaseError};
use crate::ids::RecordId;
use crate::processor::DocumentMetadata;

/// Outcome marker stored with each record. Only successful ingestions are
/// persisted, so there is a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Success,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Success => "success",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for DocumentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DocumentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "success" => Ok(DocumentStatus::Success),
            other => Err(FromSqlError::Other(
                format!("unknown document status '{}'", other).into(),
            )),
        }
    }
}

/// Fields supplied by the caller when committing a new record.
#[derive(Debug, Clone)]
pub struct NewDocument<'a> {
    pub file_id: &'a str,
    pub original_filename: &'a str,
    pub text: &'a str,
    pub metadata: &'a DocumentMetadata,
    pub status: DocumentStatus,
}

/// A full record, text included.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: RecordId,
    pub file_id: String,
    pub original_filename: String,
    pub metadata: DocumentMetadata,
    pub status: DocumentStatus,
    pub text: String,
    pub created_at: String,
}

/// A record without its (possibly large) text.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub id: RecordId,
    pub file_id: String,
    pub original_filename: String,
    pub metadata: DocumentMetadata,
    pub status: DocumentStatus,
    pub created_at: String,
}

const SUMMARY_COLUMNS: &str = "id, file_id, original_filename, author, creator, creation_date,
     modification_date, status, created_at";

fn record_id_from_row(row: &Row<'_>) -> Result<RecordId, rusqlite::Error> {
    let id: i64 = row.get("id")?;
    RecordId::new(id).ok_or(rusqlite::Error::IntegralValueOutOfRange(0, id))
}

fn metadata_from_row(row: &Row<'_>) -> Result<DocumentMetadata, rusqlite::Error> {
    Ok(DocumentMetadata {
        author: row.get("author")?,
        creator: row.get("creator")?,
        creation_date: row.get("creation_date")?,
        modification_date: row.get("modification_date")?,
    })
}

impl DocumentSummary {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: record_id_from_row(row)?,
            file_id: row.get("file_id")?,
            original_filename: row.get("original_filename")?,
            metadata: metadata_from_row(row)?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl DocumentRecord {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: record_id_from_row(row)?,
            file_id: row.get("file_id")?,
            original_filename: row.get("original_filename")?,
            metadata: metadata_from_row(row)?,
            status: row.get("status")?,
            text: row.get("text")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Inserts a new record and returns the id SQLite assigned to it.
///
/// The insert and the row id read happen under one connection lock, so
/// concurrent callers each get their own id.
pub fn insert(db: &Database, doc: &NewDocument<'_>) -> Result<RecordId, DatabaseError> {
    let created_at = chrono::Utc::now().to_rfc3339();
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO documents (file_id, original_filename, author, creator, creation_date,
             modification_date, status, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                doc.file_id,
                doc.original_filename,
                doc.metadata.author,
                doc.metadata.creator,
                doc.metadata.creation_date,
                doc.metadata.modification_date,
                doc.status,
                doc.text,
                created_at,
            ],
        )?;
        let rowid = conn.last_insert_rowid();
        RecordId::new(rowid).ok_or(DatabaseError::InvalidRecordId(rowid))
    })
}

/// Finds a full record by its id.
pub fn find_by_id(db: &Database, id: RecordId) -> Result<Option<DocumentRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let record = conn
            .query_row(
                "SELECT * FROM documents WHERE id = ?1",
                params![id.get()],
                DocumentRecord::from_row,
            )
            .optional()?;
        Ok(record)
    })
}

/// Finds a record's metadata without loading its text.
pub fn find_summary(db: &Database, id: RecordId) -> Result<Option<DocumentSummary>, DatabaseError> {
    db.with_conn(|conn| {
        let summary = conn
            .query_row(
                &format!("SELECT {} FROM documents WHERE id = ?1", SUMMARY_COLUMNS),
                params![id.get()],
                DocumentSummary::from_row,
            )
            .optional()?;
        Ok(summary)
    })
}

/// Finds only the extracted text of a record.
pub fn find_text(db: &Database, id: RecordId) -> Result<Option<String>, DatabaseError> {
    db.with_conn(|conn| {
        let text = conn
            .query_row(
                "SELECT text FROM documents WHERE id = ?1",
                params![id.get()],
                |r| r.get(0),
            )
            .optional()?;
        Ok(text)
    })
}

/// Counts committed records.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
        Ok(count)
    })
}

/// True when no record has ever been committed. Reads the store itself, so
/// the answer holds across process restarts.
pub fn is_empty(db: &Database) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let empty: bool = conn.query_row(
            "SELECT NOT EXISTS(SELECT 1 FROM documents)",
            [],
            |r| r.get(0),
        )?;
        Ok(empty)
    })
}

/// All file ids referenced by records.
pub fn file_ids(db: &Database) -> Result<HashSet<String>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT file_id FROM documents")?;
        let ids = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(ids)
    })
}
