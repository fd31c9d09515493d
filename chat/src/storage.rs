//! Client-local persistence for the transcript.
//!
//! A store holds exactly one snapshot under one key. Sessions read it once when
//! they open and overwrite it after every change.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{debug, warn};
use thiserror::Error;

use crate::message::Transcript;

/// Error type for transcript store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write transcript to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize transcript: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Trait defining the interface for transcript stores
pub trait TranscriptStore: Send + Sync + Debug {
    /// Reads the stored snapshot. Absent or unreadable data yields an empty transcript.
    fn load(&self) -> Transcript;

    /// Replaces the stored snapshot with `transcript`
    fn save(&self, transcript: &Transcript) -> Result<(), StoreError>;
}

/// Stores the transcript as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    path: PathBuf,
}

impl FileTranscriptStore {
    pub fn new(dir: &Path, key: &str) -> Self {
        // Sanitize key for filename
        let sanitized = key.replace(
            |c: char| !c.is_alphanumeric() && c != '-' && c != '_',
            "_",
        );
        Self {
            path: dir.join(format!("{}.json", sanitized)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptStore for FileTranscriptStore {
    fn load(&self) -> Transcript {
        let json_str = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No transcript at {}, starting empty", self.path.display());
                return Transcript::new();
            }
            Err(e) => {
                warn!("Failed to read transcript {}: {}", self.path.display(), e);
                return Transcript::new();
            }
        };

        match serde_json::from_str::<Transcript>(&json_str) {
            Ok(transcript) => {
                debug!(
                    "Loaded {} messages from {}",
                    transcript.len(),
                    self.path.display()
                );
                transcript
            }
            Err(e) => {
                warn!(
                    "Ignoring malformed transcript {}: {}",
                    self.path.display(),
                    e
                );
                Transcript::new()
            }
        }
    }

    fn save(&self, transcript: &Transcript) -> Result<(), StoreError> {
        let json_str = serde_json::to_string(transcript)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // The target is only ever replaced whole, via rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json_str).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved {} messages to {}", transcript.len(), self.path.display());
        Ok(())
    }
}

/// In-memory implementation of TranscriptStore holding the serialized snapshot
#[derive(Debug, Clone, Default)]
pub struct MemoryTranscriptStore {
    snapshot: Arc<RwLock<Option<String>>>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw snapshot, which need not be valid
    pub fn with_snapshot(raw: impl Into<String>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(raw.into()))),
        }
    }

    /// The raw stored snapshot, if any
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.read().ok().and_then(|s| s.clone())
    }
}

impl TranscriptStore for MemoryTranscriptStore {
    fn load(&self) -> Transcript {
        self.snapshot()
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(transcript) => Some(transcript),
                Err(e) => {
                    warn!("Ignoring malformed transcript snapshot: {}", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    fn save(&self, transcript: &Transcript) -> Result<(), StoreError> {
        let raw = serde_json::to_string(transcript)?;
        let mut snapshot = self.snapshot.write().map_err(|e| {
            StoreError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;
        *snapshot = Some(raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn sample(n: usize) -> Transcript {
        let mut transcript = Transcript::new();
        for i in 0..n {
            if i % 2 == 0 {
                transcript.push(Message::user(format!("question {}", i)));
            } else {
                transcript.push(Message::assistant(format!("answer {}", i)));
            }
        }
        transcript
    }

    #[test]
    fn file_store_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTranscriptStore::new(dir.path(), "chatMessages");
        let transcript = sample(7);

        store.save(&transcript).unwrap();
        let loaded = FileTranscriptStore::new(dir.path(), "chatMessages").load();
        assert_eq!(loaded, transcript);
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTranscriptStore::new(dir.path(), "chatMessages");
        assert!(store.load().is_empty());
    }

    #[test]
    fn file_store_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTranscriptStore::new(dir.path(), "chatMessages");
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), r#"[{"text":"x","sender":"robot","timestamp":"1"}]"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn file_store_creates_directory_and_sanitizes_key() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileTranscriptStore::new(&nested, "../chat messages");
        assert_eq!(store.path(), nested.join("___chat_messages.json"));

        store.save(&sample(2)).unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTranscriptStore::new(dir.path(), "chatMessages");
        store.save(&sample(4)).unwrap();
        store.save(&sample(1)).unwrap();
        assert_eq!(store.load(), sample(1));
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTranscriptStore::new(dir.path(), "chatMessages");
        store.save(&sample(2)).unwrap();

        assert!(store.path().exists());
        assert!(!dir.path().join("chatMessages.json.tmp").exists());
        assert_eq!(store.load(), sample(2));
    }

    #[test]
    fn stale_temp_file_does_not_affect_load_or_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTranscriptStore::new(dir.path(), "chatMessages");
        store.save(&sample(3)).unwrap();

        // Leftover from an interrupted write
        fs::write(dir.path().join("chatMessages.json.tmp"), "[{\"text\":").unwrap();
        assert_eq!(store.load(), sample(3));

        store.save(&sample(5)).unwrap();
        assert_eq!(store.load(), sample(5));
        assert!(!dir.path().join("chatMessages.json.tmp").exists());
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryTranscriptStore::new();
        assert!(store.load().is_empty());
        let transcript = sample(3);
        store.save(&transcript).unwrap();
        assert_eq!(store.load(), transcript);
    }

    #[test]
    fn memory_store_ignores_garbage() {
        let store = MemoryTranscriptStore::with_snapshot("not json at all");
        assert!(store.load().is_empty());
    }
}
