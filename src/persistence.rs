//! Persistence collaborators for the note store.
//!
//! The store only ever calls `load` once and `save` after each mutation. Both
//! calls are infallible from the store's point of view: implementations log
//! their own failures and carry on.
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use log::{debug, error, info, trace};
use tempfile::NamedTempFile;

use crate::{NotesError, Result, StoredState};

/// Device-local storage for the whole `{notes, folders}` document.
pub trait Persistence {
    /// Returns the previously saved state, or `None` on first run or when the
    /// stored data cannot be read.
    fn load(&self) -> Option<StoredState>;

    /// Best-effort write of the full state.
    fn save(&self, state: &StoredState);
}

/// Stores the state as a single JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the data file. A missing file is `Ok(None)`.
    pub fn read_state(&self) -> Result<Option<StoredState>> {
        debug!("Loading state from file: {}", self.path.display());
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No data file at {}, starting fresh", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(NotesError::Io(e)),
        };

        let state: StoredState = serde_json::from_str(&content)?;
        trace!(
            "Parsed {} notes and {} folders",
            state.notes.len(),
            state.folders.len()
        );
        Ok(Some(state))
    }

    /// Writes the state through a temporary file in the same directory so a
    /// crash never leaves a half-written data file behind.
    pub fn write_state(&self, state: &StoredState) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if !dir.exists() {
            debug!("Creating data directory: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create directory {}: {}", dir.display(), e);
                NotesError::DirectoryError {
                    path: dir.to_path_buf(),
                }
            })?;
        }

        let mut temp_file = NamedTempFile::new_in(dir)?;

        trace!("Serializing state to JSON");
        let json = serde_json::to_string_pretty(state)?;

        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;

        debug!("Performing atomic move of temporary file to {}", self.path.display());
        temp_file.persist(&self.path).map_err(|e| NotesError::Io(e.error))?;

        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> Option<StoredState> {
        match self.read_state() {
            Ok(state) => state,
            Err(e) => {
                error!("Failed to load from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, state: &StoredState) {
        match self.write_state(state) {
            Ok(()) => debug!(
                "Saved {} notes and {} folders to {}",
                state.notes.len(),
                state.folders.len(),
                self.path.display()
            ),
            Err(e) => error!("Failed to save to {}: {}", self.path.display(), e),
        }
    }
}

#[derive(Debug, Default)]
struct MemorySlot {
    state: Option<StoredState>,
    saves: usize,
}

/// Keeps the state in memory. Clones share the same slot, so a caller can keep
/// a handle to inspect what the store saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `state` already stored, as if saved by an earlier run.
    pub fn with_state(state: StoredState) -> Self {
        let persistence = Self::default();
        if let Ok(mut slot) = persistence.slot.lock() {
            slot.state = Some(state);
        }
        persistence
    }

    /// The most recently saved state.
    pub fn stored(&self) -> Option<StoredState> {
        self.slot.lock().ok().and_then(|slot| slot.state.clone())
    }

    /// Number of `save` calls received so far.
    pub fn save_count(&self) -> usize {
        self.slot.lock().map(|slot| slot.saves).unwrap_or(0)
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Option<StoredState> {
        self.stored()
    }

    fn save(&self, state: &StoredState) {
        match self.slot.lock() {
            Ok(mut slot) => {
                slot.state = Some(state.clone());
                slot.saves += 1;
            }
            Err(e) => error!("Failed to acquire lock on memory store: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_folders, Note};
    use chrono::Utc;
    use tempfile::tempdir;

    fn sample_state() -> StoredState {
        let mut note = Note::new("notes", Utc::now());
        note.set_content("Hello\nworld".to_string());
        StoredState {
            notes: vec![note],
            folders: default_folders(),
        }
    }

    #[test]
    fn missing_file_loads_as_absent() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("notes.json"));
        assert!(store.read_state().unwrap().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn saved_state_loads_back() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("notes.json"));
        let state = sample_state();

        store.save(&state);

        assert_eq!(store.load(), Some(state));
    }

    #[test]
    fn corrupt_file_loads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.read_state(),
            Err(NotesError::Serialization(_))
        ));
        assert!(store.load().is_none());
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{}").unwrap();

        let state = JsonFileStore::new(&path).load().unwrap();
        assert!(state.notes.is_empty());
        assert!(state.folders.is_empty());
    }

    #[test]
    fn memory_clones_share_state() {
        let persistence = MemoryPersistence::new();
        let handle = persistence.clone();
        assert!(persistence.load().is_none());

        persistence.save(&sample_state());

        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.stored().map(|s| s.notes.len()), Some(1));
    }
}
