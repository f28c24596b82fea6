//! Local store - JSON file holding the selected branch and last user
//!
//! Any I/O failure switches the store to in-memory mode for the rest of the
//! process, with a warning. Nothing here is fatal.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use shared::models::User;

use crate::{ClientError, ClientResult};

/// Persisted session fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    #[serde(default)]
    pub selected_branch: Option<String>,
    #[serde(default)]
    pub last_user: Option<User>,
}

#[derive(Debug)]
struct Inner {
    path: Option<PathBuf>,
    data: StoredSession,
    degraded: bool,
}

/// Session store backed by a JSON file, or memory only
#[derive(Debug)]
pub struct LocalStore {
    inner: Mutex<Inner>,
}

impl LocalStore {
    /// Memory-only store
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner {
                path: None,
                data: StoredSession::default(),
                degraded: false,
            }),
        }
    }

    /// Open a file-backed store, loading what is already there
    ///
    /// A missing file starts empty. An unreadable or corrupt file degrades to
    /// memory mode.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (data, degraded) = match Self::read(&path) {
            Ok(data) => (data, false),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Local store unavailable, using memory: {e}");
                (StoredSession::default(), true)
            }
        };
        Self {
            inner: Mutex::new(Inner {
                path: (!degraded).then_some(path),
                data,
                degraded,
            }),
        }
    }

    /// File-backed when a path is configured, memory otherwise
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::open(path),
            None => Self::in_memory(),
        }
    }

    fn read(path: &Path) -> ClientResult<StoredSession> {
        if !path.exists() {
            return Ok(StoredSession::default());
        }
        let json = fs::read_to_string(path)
            .map_err(|e| ClientError::Storage(format!("Failed to read {}: {e}", path.display())))?;
        if json.trim().is_empty() {
            return Ok(StoredSession::default());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn write(path: &Path, data: &StoredSession) -> ClientResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(format!("Failed to create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json)
            .map_err(|e| ClientError::Storage(format!("Failed to write {}: {e}", path.display())))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `change` and persist; a failed write degrades to memory mode
    fn update(&self, change: impl FnOnce(&mut StoredSession)) {
        let mut inner = self.lock();
        change(&mut inner.data);

        if let Some(path) = inner.path.clone()
            && let Err(e) = Self::write(&path, &inner.data)
        {
            tracing::warn!(path = %path.display(), "Local store write failed, switching to memory: {e}");
            inner.path = None;
            inner.degraded = true;
        }
    }

    /// Snapshot of the stored fields
    pub fn load(&self) -> StoredSession {
        self.lock().data.clone()
    }

    pub fn selected_branch(&self) -> Option<String> {
        self.lock().data.selected_branch.clone()
    }

    pub fn set_selected_branch(&self, branch_id: Option<String>) {
        self.update(|data| data.selected_branch = branch_id);
    }

    pub fn last_user(&self) -> Option<User> {
        self.lock().data.last_user.clone()
    }

    pub fn set_last_user(&self, user: Option<User>) {
        self.update(|data| data.last_user = user);
    }

    /// Forget everything
    pub fn clear(&self) {
        self.update(|data| *data = StoredSession::default());
    }

    /// Whether writes reach the file
    pub fn is_persistent(&self) -> bool {
        self.lock().path.is_some()
    }

    /// Whether a storage failure forced memory mode
    pub fn is_degraded(&self) -> bool {
        self.lock().degraded
    }
}
