pub mod error;
pub mod reconcile;
pub mod runner;

pub use error::{IngestError, ReconcileError};
pub use runner::{FileIdSource, Pipeline};
