//! Isolated shelf for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use pdfshelf::{Config, Shelf};

pub struct TestHarness {
    /// Keeps the directory alive for the harness lifetime.
    temp_dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = Config {
            upload_directory: temp_dir.path().join("uploads"),
            database_path: temp_dir.path().join("pdf.db"),
            ..Config::default()
        };
        Self { temp_dir, config }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let mut harness = Self::new();
        harness.config.content_base_url = base_url.to_string();
        harness
    }

    /// Opens a fresh shelf over the harness directories. Calling this again
    /// after dropping the previous shelf simulates a restart.
    pub fn open(&self) -> Shelf {
        Shelf::open(&self.config).expect("Failed to open shelf")
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_directory.clone()
    }

    pub fn stored_objects(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.upload_dir()) {
            Ok(entries) => {
                let mut paths: Vec<PathBuf> =
                    entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
                paths.sort();
                paths
            }
            Err(_) => Vec::new(),
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
