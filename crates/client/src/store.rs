//! Persisted client-side key/value store.
//!
//! [`LocalStore`] plays the role browser local storage plays for the web
//! client: session tokens and a few convenience values (guest practice
//! session, display name) survive a restart so a guest flow can resume.
//! Values are kept in memory and written through to a JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Well-known keys.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "auth.access_token";
    pub const REFRESH_TOKEN: &str = "auth.refresh_token";
    pub const GUEST_SESSION_ID: &str = "practice.guest_session_id";
    pub const GUEST_SESSION_TOKEN: &str = "practice.guest_session_token";
    pub const DISPLAY_NAME: &str = "practice.display_name";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write store file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A guest practice session resumed across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestSession {
    pub session_id: String,
    pub session_token: String,
    pub display_name: Option<String>,
}

pub struct LocalStore {
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file
    /// is logged and replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Corrupt local store, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable local store, starting empty");
                BTreeMap::new()
            }
        };

        tracing::debug!(path = %path.display(), entries = values.len(), "Local store opened");

        Self {
            path: Some(path),
            values: RwLock::new(values),
        }
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.into());
        self.persist(&values).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&values).await
    }

    // ---- guest practice session ----

    /// Read the guest session saved by a previous join, if complete.
    pub async fn guest_session(&self) -> Option<GuestSession> {
        let values = self.values.read().await;
        Some(GuestSession {
            session_id: values.get(keys::GUEST_SESSION_ID)?.clone(),
            session_token: values.get(keys::GUEST_SESSION_TOKEN)?.clone(),
            display_name: values.get(keys::DISPLAY_NAME).cloned(),
        })
    }

    pub async fn save_guest_session(&self, session: &GuestSession) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.insert(keys::GUEST_SESSION_ID.to_string(), session.session_id.clone());
        values.insert(
            keys::GUEST_SESSION_TOKEN.to_string(),
            session.session_token.clone(),
        );
        match &session.display_name {
            Some(name) => values.insert(keys::DISPLAY_NAME.to_string(), name.clone()),
            None => values.remove(keys::DISPLAY_NAME),
        };
        self.persist(&values).await
    }

    /// Forget the guest session but keep the display name for next time.
    pub async fn clear_guest_session(&self) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.remove(keys::GUEST_SESSION_ID);
        values.remove(keys::GUEST_SESSION_TOKEN);
        self.persist(&values).await
    }

    // ---- private helpers ----

    /// Write the full map atomically (temp file + rename).
    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(values)?;
        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(write_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
