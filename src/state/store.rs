//! Transaction record store.
//!
//! One read and one write per command, never an append: a crash between
//! the two leaves the previous file intact.

use crate::models::TxRecord;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Load/save of a transaction record at a fixed path.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<TxRecord> {
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read record {}", self.path.display()))?;
        let record = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse record {}", self.path.display()))?;
        Ok(record)
    }

    pub fn save(&self, record: &TxRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        if self.path.exists() {
            println!(
                "{}",
                format!("file {} already exists, overwriting", self.path.display()).yellow()
            );
        }

        let contents =
            serde_json::to_string_pretty(record).context("Failed to serialize record")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write record {}", self.path.display()))?;
        println!("{}", format!("saved: {}", self.path.display()).green());
        Ok(())
    }

    /// Rename the record file in place (same directory) and return a store
    /// for the new path.
    pub fn rename(self, new_name: &str) -> Result<RecordStore> {
        let new_path = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(new_name),
            _ => PathBuf::from(new_name),
        };
        std::fs::rename(&self.path, &new_path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                self.path.display(),
                new_path.display()
            )
        })?;
        println!(
            "{}",
            format!("renamed: {} -> {}", self.path.display(), new_path.display()).green()
        );
        Ok(RecordStore::new(new_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> TxRecord {
        TxRecord::new(
            "1",
            "https://rpc.example",
            "0xSAFE",
            "5",
            "0xTARGET",
            "CallPause",
            "HELLO",
        )
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("draft-5.json"));

        let mut tx = record();
        tx.upsert_signature("0xA", "0xsig");
        store.save(&tx).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, tx);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("tx").join("draft-5.json"));
        store.save(&record()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("absent.json"));
        assert!(store.load().is_err());
    }

    #[test]
    fn rename_moves_within_the_directory() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("draft-5.json"));
        store.save(&record()).unwrap();

        let renamed = store.rename("ready-5.json").unwrap();
        assert!(renamed.path().exists());
        assert!(!dir.path().join("draft-5.json").exists());
        assert!(renamed.load().is_ok());
    }
}
