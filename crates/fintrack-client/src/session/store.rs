//! Key-value persistence backing the session context.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{SessionError, SessionResult};

/// Minimal string store with local-storage semantics: no expiry, values
/// live until removed.
pub trait KeyValueStore {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> SessionResult<()>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the removal cannot be persisted.
    fn remove(&mut self, key: &str) -> SessionResult<()>;

    /// Apply several writes together; `None` removes the key.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the changes cannot be persisted.
    fn apply(&mut self, changes: &[(&str, Option<&str>)]) -> SessionResult<()> {
        for (key, value) in changes {
            match value {
                Some(value) => self.set(key, value)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// Process-local store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> SessionResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SessionResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
///
/// The file is read once on open and rewritten (temp file + rename) after
/// every mutation. The in-memory map only changes once the write succeeded.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] when the file exists but cannot be read
    /// and [`SessionError::Corrupt`] when it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> SessionResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(SessionError::Io {
                    operation: "read_session",
                    path,
                    source,
                });
            }
        };
        Ok(Self { path, entries })
    }

    /// Open the store at `path`, starting over with an empty file when the
    /// existing one is corrupt.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] when the file cannot be read or replaced.
    pub fn open_or_reset(path: impl Into<PathBuf>) -> SessionResult<Self> {
        let path = path.into();
        match Self::open(&path) {
            Err(SessionError::Corrupt { source, .. }) => {
                tracing::warn!(
                    error = %source,
                    path = %path.display(),
                    "discarding corrupt session store"
                );
                let entries = BTreeMap::new();
                persist(&path, &entries)?;
                Ok(Self { path, entries })
            }
            other => other,
        }
    }

    fn commit(&mut self, entries: BTreeMap<String, String>) -> SessionResult<()> {
        persist(&self.path, &entries)?;
        self.entries = entries;
        Ok(())
    }
}

fn persist(path: &Path, entries: &BTreeMap<String, String>) -> SessionResult<()> {
    let io_error = |operation: &'static str, path: &Path| {
        let path = path.to_path_buf();
        move |source| SessionError::Io {
            operation,
            path,
            source,
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error("create_session_dir", parent))?;
    }
    let encoded = serde_json::to_vec_pretty(entries).map_err(|source| SessionError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    let staging = path.with_extension("tmp");
    fs::write(&staging, encoded).map_err(io_error("write_session", &staging))?;
    fs::rename(&staging, path).map_err(io_error("replace_session", path))?;
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> SessionResult<()> {
        self.apply(&[(key, Some(value))])
    }

    fn remove(&mut self, key: &str) -> SessionResult<()> {
        self.apply(&[(key, None)])
    }

    fn apply(&mut self, changes: &[(&str, Option<&str>)]) -> SessionResult<()> {
        let mut next = self.entries.clone();
        for (key, value) in changes {
            match value {
                Some(value) => {
                    next.insert((*key).to_string(), (*value).to_string());
                }
                None => {
                    next.remove(*key);
                }
            }
        }
        if next == self.entries {
            return Ok(());
        }
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_roundtrips() -> SessionResult<()> {
        let mut store = MemoryStore::new();
        store.set("k", "v")?;
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k")?;
        assert_eq!(store.get("k"), None);
        Ok(())
    }

    #[test]
    fn file_store_survives_reopen() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("session.json");

        let mut store = FileStore::open(&path)?;
        assert_eq!(store.get("fintrack.user_id"), None);
        store.set("fintrack.user_id", "7")?;

        let reopened = FileStore::open(&path)?;
        assert_eq!(reopened.get("fintrack.user_id").as_deref(), Some("7"));
        assert!(!path.with_extension("tmp").exists());
        Ok(())
    }

    #[test]
    fn file_store_rejects_corrupt_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "[1, 2, 3]")?;

        let err = FileStore::open(&path).expect_err("corrupt session");
        assert!(matches!(err, SessionError::Corrupt { .. }));
        Ok(())
    }

    #[test]
    fn reset_replaces_corrupt_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"fintrack.user_id": 7}"#)?;

        let store = FileStore::open_or_reset(&path)?;
        assert_eq!(store.get("fintrack.user_id"), None);
        assert!(FileStore::open(&path)?.get("fintrack.user_id").is_none());
        Ok(())
    }

    #[test]
    fn failed_write_keeps_previous_entries() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        let mut store = FileStore::open(&path)?;
        store.set("fintrack.user_id", "7")?;

        fs::create_dir(path.with_extension("tmp"))?;
        let err = store
            .apply(&[("fintrack.user_id", Some("8")), ("fintrack.user_name", Some("Bo"))])
            .expect_err("staging path is a directory");
        assert!(matches!(err, SessionError::Io { operation: "write_session", .. }));
        assert_eq!(store.get("fintrack.user_id").as_deref(), Some("7"));
        assert_eq!(store.get("fintrack.user_name"), None);
        assert_eq!(
            FileStore::open(&path)?.get("fintrack.user_id").as_deref(),
            Some("7")
        );
        Ok(())
    }
}
