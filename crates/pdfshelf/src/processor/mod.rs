pub mod pdf;

#[cfg(test)]
#[path = "../../tests/common/builders.rs"]
pub(crate) mod fixtures;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

pub use pdf::{PdfExtractor, PAGE_BREAK};

/// Document formats accepted for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
}

impl DocumentFormat {
    /// Determines the format from an upload filename by its last three
    /// characters, compared case-insensitively. No dot is required.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let suffix = filename.get(filename.len().saturating_sub(3)..)?;
        Self::from_extension(suffix)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("pdf") {
            Some(DocumentFormat::Pdf)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
        }
    }
}

/// Descriptive fields read from a document's information dictionary.
///
/// Absent fields are empty strings. Dates keep the document's native
/// encoding (for PDF, `D:YYYYMMDDHHmmSSOHH'mm'`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Taken from the PDF `Producer` entry.
    pub author: String,
    pub creator: String,
    pub creation_date: String,
    pub modification_date: String,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, ProcessError>;
    fn supports(&self, format: DocumentFormat) -> bool;
}
