//! Append-only JSON store for memory records.
//!
//! The whole store is a flat list serialized to one file. Writes append one
//! record and rewrite the file; reads return every record. An unreadable
//! file is treated as empty rather than poisoning the session.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::MemoryRecord;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("memory store serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            fs::write(&path, "[]")?;
        }
        Ok(Self { path })
    }

    pub fn append(&self, record: MemoryRecord) -> Result<(), MemoryError> {
        let mut records = self.load_all()?;
        records.push(record);
        let serialized = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    pub fn load_all(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&text) {
            Ok(records) => Ok(records),
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "memory store unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }
}
