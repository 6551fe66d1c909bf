//! Durable storage behind the session store.
//!
//! Storage behaves like browser local storage: operations never surface
//! errors to callers. A failed write is logged and the in-memory session
//! keeps working for the rest of the process.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The raw durable form of a session: a credential string under one key and
/// a role string under another. Both are cleared together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Raw credential string, possibly a sentinel written by older builds.
    #[serde(default)]
    pub token: Option<String>,
    /// Raw role string.
    #[serde(default)]
    pub role: Option<String>,
}

impl StoredSession {
    /// Whether there is nothing to persist.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.token.is_none() && self.role.is_none()
    }
}

/// Durable key-value storage for the session.
pub trait SessionBackend: Send + Sync + 'static {
    /// Load the stored session, or an empty one if nothing is stored.
    fn load(&self) -> StoredSession;

    /// Persist the stored session.
    fn save(&self, stored: &StoredSession);

    /// Remove any stored session.
    fn clear(&self);
}

/// File-backed session storage.
///
/// The session is one small JSON document; corruption or I/O failure
/// degrades to an empty session rather than an error.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend persisting to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionBackend for FileBackend {
    fn load(&self) -> StoredSession {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoredSession::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read session file");
                return StoredSession::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session file is corrupt, starting signed out");
                StoredSession::default()
            }
        }
    }

    fn save(&self, stored: &StoredSession) {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(path = %parent.display(), error = %e, "could not create session directory");
            return;
        }

        let text = match serde_json::to_string_pretty(stored) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "could not serialize session");
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, text) {
            warn!(path = %self.path.display(), error = %e, "could not write session file");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not remove session file");
            }
        }
    }
}

/// In-memory session storage for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Mutex<StoredSession>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> StoredSession {
        self.stored.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn save(&self, stored: &StoredSession) {
        if let Ok(mut slot) = self.stored.lock() {
            *slot = stored.clone();
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.stored.lock() {
            *slot = StoredSession::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mercado-session-test-{name}-{}", std::process::id()))
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let path = temp_path("roundtrip");
        let backend = FileBackend::new(&path);
        let stored = StoredSession {
            token: Some("abc".to_string()),
            role: Some("admin".to_string()),
        };

        backend.save(&stored);
        assert_eq!(backend.load(), stored);

        backend.clear();
        assert_eq!(backend.load(), StoredSession::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let backend = FileBackend::new(temp_path("missing"));
        assert_eq!(backend.load(), StoredSession::default());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").expect("write");
        let backend = FileBackend::new(&path);
        assert_eq!(backend.load(), StoredSession::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        let stored = StoredSession {
            token: Some("t".to_string()),
            role: None,
        };
        backend.save(&stored);
        assert_eq!(backend.load(), stored);
        backend.clear();
        assert!(backend.load().is_empty());
    }
}
