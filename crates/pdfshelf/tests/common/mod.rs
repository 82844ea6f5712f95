//! Shared test utilities for pdfshelf integration tests.
//!
//! - `TestHarness` opens a shelf inside a temp directory
//! - `PdfBuilder` produces small PDFs in memory

pub mod builders;
pub mod harness;

pub use builders::PdfBuilder;
pub use harness::TestHarness;
