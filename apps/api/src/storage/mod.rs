//! Candidate store: a flat JSON array on disk.
//!
//! Every write reads the whole file, modifies it in memory and writes it back.
//! Writes from this process are serialized by a mutex; nothing guards against
//! other processes and the write is not atomic.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::candidate::CandidateRecord;
use crate::screening::parse::normalize_record;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of an attempt to persist a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    Duplicate { existing_name: String },
    Invalid { reason: String },
}

#[derive(Clone)]
pub struct CandidateStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CandidateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` unless its name is blank or already stored
    /// (case-insensitive). Stamps `analyzed_at` only when the record is written.
    ///
    /// Entries already in the file are written back as they were read.
    pub async fn save(&self, record: &mut CandidateRecord) -> Result<SaveOutcome, StoreError> {
        if record.name.trim().is_empty() {
            warn!("Refusing to store a candidate without a name");
            return Ok(SaveOutcome::Invalid {
                reason: "candidate name is empty".to_string(),
            });
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;

        let key = record.identity_key();
        if let Some(existing_name) = entries.iter().find_map(|e| stored_name(e, &key)) {
            warn!("Résumé of '{}' was already registered", record.name);
            return Ok(SaveOutcome::Duplicate { existing_name });
        }

        record.analyzed_at = Some(Local::now().format(TIMESTAMP_FORMAT).to_string());
        entries.push(serde_json::to_value(&*record)?);
        self.write_entries(&entries).await?;

        info!("Stored résumé of '{}' ({} total)", record.name, entries.len());
        Ok(SaveOutcome::Saved)
    }

    /// All stored records in file order. Missing or unreadable files load as empty.
    pub async fn load(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        self.read_records().await
    }

    /// Case-insensitive lookup by candidate name.
    pub async fn find(&self, name: &str) -> Result<Option<CandidateRecord>, StoreError> {
        let key = name.trim().to_lowercase();
        Ok(self
            .read_records()
            .await?
            .into_iter()
            .find(|r| r.identity_key() == key))
    }

    /// Deletes every stored record. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let removed = self.read_entries().await?.len();
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        info!("Deleted {removed} stored résumés");
        Ok(removed)
    }

    /// Raw file contents for download, if the file exists.
    pub async fn raw_json(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Normalized view of the stored entries. Entries that are not objects are skipped.
    async fn read_records(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        Ok(self
            .read_entries()
            .await?
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(map) => Some(normalize_record(map)),
                _ => None,
            })
            .collect())
    }

    /// The stored entries exactly as found in the file.
    async fn read_entries(&self) -> Result<Vec<Value>, StoreError> {
        let Some(bytes) = self.raw_json().await? else {
            return Ok(Vec::new());
        };

        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "Candidates file {} is corrupt ({e}); treating it as empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
        };

        let entries = match value {
            Value::Array(items) => items,
            Value::Object(map) => vec![Value::Object(map)],
            _ => {
                warn!(
                    "Candidates file {} does not hold a list; treating it as empty",
                    self.path.display()
                );
                Vec::new()
            }
        };
        Ok(entries)
    }

    async fn write_entries(&self, entries: &[Value]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, json).await.map_err(io_err)
    }
}

/// The stored name of `entry` if it matches the identity `key`.
fn stored_name(entry: &Value, key: &str) -> Option<String> {
    let name = entry.get("name")?.as_str()?;
    (name.trim().to_lowercase() == key).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, score: f64) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            summary: format!("{name} summary"),
            score,
            ..Default::default()
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> CandidateStore {
        CandidateStore::new(dir.path().join("candidates.json"))
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for (i, name) in ["Ana", "Bruno", "Carla", "Davi"].iter().enumerate() {
            let outcome = store.save(&mut candidate(name, i as f64)).await.unwrap();
            assert_eq!(outcome, SaveOutcome::Saved);
        }

        let names: Vec<_> = store.load().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla", "Davi"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&mut candidate("Ana Souza", 7.0)).await.unwrap();
        let before = tokio::fs::read(store.path()).await.unwrap();

        let mut again = candidate("  ANA SOUZA ", 9.0);
        let outcome = store.save(&mut again).await.unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Duplicate {
                existing_name: "Ana Souza".to_string()
            }
        );
        assert!(again.analyzed_at.is_none());
        assert_eq!(tokio::fs::read(store.path()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_blank_name_is_invalid_and_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let outcome = store.save(&mut candidate("   ", 5.0)).await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Invalid { .. }));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_save_stamps_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut record = candidate("Ana", 7.0);
        store.save(&mut record).await.unwrap();

        let stamped = record.analyzed_at.expect("timestamp set");
        assert!(chrono::NaiveDateTime::parse_from_str(&stamped, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(store.load().await.unwrap()[0].analyzed_at, Some(stamped));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        tokio::fs::write(store.path(), b"[{\"name\": \"Ana\"").await.unwrap();

        assert!(store.load().await.unwrap().is_empty());

        store.save(&mut candidate("Bruno", 6.0)).await.unwrap();
        let records = store.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Bruno");
    }

    #[tokio::test]
    async fn test_single_object_file_is_a_one_element_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        tokio::fs::write(store.path(), br#"{"name": "Ana", "score": 8}"#)
            .await
            .unwrap();

        let outcome = store.save(&mut candidate("ana", 1.0)).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Duplicate { .. }));

        store.save(&mut candidate("Bruno", 1.0)).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_file_keeps_non_ascii_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&mut candidate("João Conceição", 8.0)).await.unwrap();

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert!(raw.contains("João Conceição"));
    }

    #[tokio::test]
    async fn test_find_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&mut candidate("Ana", 7.0)).await.unwrap();
        store.save(&mut candidate("Bruno", 4.0)).await.unwrap();

        assert_eq!(store.find("BRUNO").await.unwrap().unwrap().score, 4.0);
        assert!(store.find("Carla").await.unwrap().is_none());

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.save(&mut candidate(&format!("C{i}"), 5.0)).await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), SaveOutcome::Saved);
        }

        assert_eq!(store.load().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_save_leaves_existing_entries_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let existing = serde_json::json!([
            {"name": "", "score": "7.5"},
            "legacy-note",
            {"name": "Ana", "score": 5}
        ]);
        tokio::fs::write(store.path(), serde_json::to_vec(&existing).unwrap())
            .await
            .unwrap();

        let outcome = store.save(&mut candidate("Bruno", 6.0)).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Saved);

        let raw: Value =
            serde_json::from_slice(&tokio::fs::read(store.path()).await.unwrap()).unwrap();
        let entries = raw.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[..3], existing.as_array().unwrap()[..]);
        assert_eq!(entries[3]["name"], "Bruno");

        // The display view still normalizes and skips the non-object entry.
        let names: Vec<_> = store.load().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Unidentified candidate", "Ana", "Bruno"]);
    }

    #[tokio::test]
    async fn test_duplicate_check_reads_raw_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        tokio::fs::write(store.path(), br#"[{"name": " Ana Souza ", "score": "8"}]"#)
            .await
            .unwrap();

        let outcome = store.save(&mut candidate("ana souza", 9.0)).await.unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Duplicate {
                existing_name: " Ana Souza ".to_string()
            }
        );
    }
}
