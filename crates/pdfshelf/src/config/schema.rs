use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_upload_directory")]
    pub upload_directory: PathBuf,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Base of the link handed out for text retrieval.
    #[serde(default = "default_content_base_url")]
    pub content_base_url: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            upload_directory: default_upload_directory(),
            database_path: default_database_path(),
            content_base_url: default_content_base_url(),
            logging: LoggingConfig::default(),
        }
    }
}

pub const CONFIG_VERSION: &str = "1.0";

/// Returns `~/.pdfshelf`, or the working directory when no home directory
/// can be determined.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pdfshelf"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_upload_directory() -> PathBuf {
    default_data_dir().join("uploads")
}

fn default_database_path() -> PathBuf {
    default_data_dir().join("pdf.db")
}

fn default_content_base_url() -> String {
    "http://localhost:5000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `pdfshelf=debug,warn`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
