use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::ids;

/// Extension given to every stored raw object.
pub const STORED_EXTENSION: &str = "pdf";

/// Write-once store for uploaded payloads, one file per file id.
///
/// Objects live directly under the upload directory as `{file_id}.pdf`.
/// Nothing is hashed or deduplicated; the file id is the only address.
pub struct FileStorage {
    upload_directory: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(upload_directory: P) -> Self {
        Self {
            upload_directory: upload_directory.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, file_id: &str) -> PathBuf {
        self.upload_directory
            .join(format!("{}.{}", file_id, STORED_EXTENSION))
    }

    /// Persists `payload` under `file_id`, creating the upload directory on
    /// first use. An existing object with the same id is replaced.
    ///
    /// Bytes go to a hidden staging file first and are renamed into place, so
    /// a reader never sees a partially written object.
    pub fn save(&self, file_id: &str, payload: &[u8]) -> Result<PathBuf, StorageError> {
        self.ensure_directory(&self.upload_directory)?;

        let final_path = self.path_for(file_id);
        let staging_path = self
            .upload_directory
            .join(format!(".{}.{}.partial", file_id, STORED_EXTENSION));

        let write_result = std::fs::File::create(&staging_path)
            .and_then(|mut file| {
                file.write_all(payload)?;
                file.sync_all()
            })
            .and_then(|()| std::fs::rename(&staging_path, &final_path));

        if let Err(e) = write_result {
            let _ = std::fs::remove_file(&staging_path);
            return Err(StorageError::WriteFile {
                path: final_path,
                source: e,
            });
        }

        log::debug!("Stored {} bytes at {}", payload.len(), final_path.display());
        Ok(final_path)
    }

    pub fn read(&self, file_id: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(file_id);
        std::fs::read(&path).map_err(|e| StorageError::ReadFile { path, source: e })
    }

    pub fn exists(&self, file_id: &str) -> bool {
        self.path_for(file_id).is_file()
    }

    pub fn remove(&self, file_id: &str) -> Result<(), StorageError> {
        let path = self.path_for(file_id);
        std::fs::remove_file(&path).map_err(|e| StorageError::RemoveFile { path, source: e })
    }

    /// Lists the ids of all stored objects, sorted. Files that do not look
    /// like stored objects (staging files, foreign files) are skipped. A
    /// missing upload directory means nothing has been stored yet.
    pub fn list_file_ids(&self) -> Result<Vec<String>, StorageError> {
        let entries = match std::fs::read_dir(&self.upload_directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ListDirectory {
                    path: self.upload_directory.clone(),
                    source: e,
                })
            }
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::ListDirectory {
                path: self.upload_directory.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(STORED_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if ids::is_file_id(stem) {
                    ids.push(stem.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), StorageError> {
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}
