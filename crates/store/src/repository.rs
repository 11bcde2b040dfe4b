use crate::document::SessionDocument;
use crate::error::StoreError;
use core_types::SessionState;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Where a session is loaded from and saved to.
///
/// Implementations are synchronous; the engine calls them from its single owning task.
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted session. Any failure yields an empty session.
    fn load(&self) -> SessionState;

    /// Persists the session, overwriting whatever was stored before.
    fn save(&self, state: &SessionState) -> Result<(), StoreError>;
}

/// Stores the session as a pretty-printed JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writes `state` to an arbitrary location using the same document format.
    pub fn export(state: &SessionState, path: &Path) -> Result<(), StoreError> {
        write_document(&SessionDocument::from_state(state), path)
    }
}

impl SessionRepository for JsonFileRepository {
    fn load(&self) -> SessionState {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no session file yet, starting empty");
                return SessionState::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable session file, starting empty");
                return SessionState::default();
            }
        };

        match serde_json::from_str::<SessionDocument>(&data) {
            Ok(document) => {
                let state = document.into_state();
                tracing::info!(
                    path = %self.path.display(),
                    points = state.len(),
                    "session loaded"
                );
                state
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt session file, starting empty");
                SessionState::default()
            }
        }
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        write_document(&SessionDocument::from_state(state), &self.path)?;
        tracing::debug!(path = %self.path.display(), points = state.len(), "session saved");
        Ok(())
    }
}

/// Writes the document next to its destination first, then renames it into place.
///
/// On failure the temporary file is removed and the destination is left untouched.
fn write_document(document: &SessionDocument, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(document)?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let written = write_and_sync(&temp_path, json.as_bytes())
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(source) = written {
        // The temp file may not exist if creating it was what failed.
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Keeps the session in memory only. Useful for tests and for running without a disk.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<Option<SessionState>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository that already holds `state`, as if it had been saved earlier.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    /// The last saved session, if any.
    pub fn saved(&self) -> Option<SessionState> {
        self.state.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SessionRepository for InMemoryRepository {
    fn load(&self) -> SessionState {
        self.saved().unwrap_or_default()
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let mut guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Outcome;
    use tempfile::tempdir;

    fn sample_state() -> SessionState {
        let mut state = SessionState::default();
        for value in [2.0, 1.5, 3.0, 0.42] {
            state.record(Outcome::new(value).unwrap(), 10.0);
        }
        state
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("crash_data.json"));
        assert_eq!(repo.load(), SessionState::default());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crash_data.json");
        fs::write(&path, "{ not json").unwrap();

        let repo = JsonFileRepository::new(&path);
        let state = repo.load();
        assert!(state.is_empty());
        assert_eq!(state.profit, 0.0);
    }

    #[test]
    fn test_invalid_outcome_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crash_data.json");
        fs::write(&path, r#"{"history": [2.0, -1.0], "profit": 3.0}"#).unwrap();

        assert_eq!(JsonFileRepository::new(&path).load(), SessionState::default());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("crash_data.json"));
        let state = sample_state();

        repo.save(&state).unwrap();
        let loaded = repo.load();

        assert_eq!(loaded.values(), state.values());
        assert_eq!(loaded.profit, state.profit);
        // The temp file is renamed away.
        assert!(!dir.path().join("crash_data.json.tmp").exists());
    }

    #[test]
    fn test_save_reports_failure() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("missing").join("crash_data.json"));
        let err = repo.save(&sample_state()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        // A directory where the document should go makes the final rename fail.
        let path = dir.path().join("crash_data.json");
        fs::create_dir(&path).unwrap();

        let err = JsonFileRepository::new(&path).save(&sample_state()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!dir.path().join("crash_data.json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_export_writes_document() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("export.json");
        JsonFileRepository::export(&sample_state(), &target).unwrap();

        let reloaded = JsonFileRepository::new(&target).load();
        assert_eq!(reloaded.len(), 4);
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryRepository::new();
        assert!(repo.load().is_empty());
        assert!(repo.saved().is_none());

        repo.save(&sample_state()).unwrap();
        assert_eq!(repo.load().len(), 4);
    }

    #[test]
    fn test_in_memory_save_reports_poisoned_lock() {
        let repo = std::sync::Arc::new(InMemoryRepository::new());
        let poisoner = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("poison the session lock");
        })
        .join();

        assert!(matches!(
            repo.save(&sample_state()),
            Err(StoreError::Poisoned)
        ));
    }
}
