pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod retrieval;
pub mod sanitize;
pub mod shelf;
pub mod storage;

pub use config::{load_config, Config, LogFormat, LoggingConfig};
pub use db::{Database, DatabaseError, DocumentStatus};
pub use error::{ConfigError, ProcessError, Result, ShelfError, StorageError};
pub use ids::{generate_file_id, RecordId};
pub use pipeline::{IngestError, Pipeline, ReconcileError};
pub use processor::{DocumentMetadata, PdfExtractor, PAGE_BREAK};
pub use retrieval::{DocumentInfo, RetrievalService};
pub use shelf::Shelf;
