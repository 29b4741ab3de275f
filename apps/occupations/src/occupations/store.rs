//! Store: one pretty-printed JSON document per classification code in a flat directory.
//!
//! Full-replace strategy: a run clears every `*.json` file first, then writes
//! one document per record. Writes are not atomic.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::occupations::record::OccupationRecord;

const FILE_PREFIX: &str = "output_";
const EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic document path for `code`. Path separators become `_`.
    pub fn path_for(&self, code: &str) -> PathBuf {
        let name: String = code
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.dir.join(format!("{FILE_PREFIX}{name}.{EXTENSION}"))
    }

    /// Creates the directory if needed, then removes every JSON document directly in it.
    /// Other files and subdirectories are left alone. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        let mut removed = 0;
        for path in self.json_documents().await? {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| StoreError::io(&path, e))?;
            removed += 1;
        }

        info!("Cleared {removed} document(s) from {}", self.dir.display());
        Ok(removed)
    }

    /// Writes `record` as the document for `code`, overwriting any previous one.
    pub async fn save(&self, code: &str, record: &OccupationRecord) -> Result<PathBuf, StoreError> {
        let path = self.path_for(code);
        let json = serde_json::to_string_pretty(record).map_err(|e| StoreError::json(&path, e))?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        debug!("Saved {}", path.display());
        Ok(path)
    }

    /// Reads back the document for `code`, if one exists.
    pub async fn load(&self, code: &str) -> Result<Option<OccupationRecord>, StoreError> {
        let path = self.path_for(code);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::json(&path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Every stored record, ordered by file name. A missing directory yields nothing.
    pub async fn load_all(&self) -> Result<Vec<OccupationRecord>, StoreError> {
        if !tokio::fs::try_exists(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            return Ok(Vec::new());
        }

        let mut paths = self.json_documents().await?;
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| StoreError::io(&path, e))?;
            records.push(serde_json::from_slice(&bytes).map_err(|e| StoreError::json(&path, e))?);
        }
        Ok(records)
    }

    async fn json_documents(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(&path, e))?
                .is_file();
            if is_file && path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
