//! Session-scoped key-value storage and the typed slots kept in it.
//!
//! This module owns:
//!   - the storage backend (process memory, or one JSON file per key in a session directory)
//!   - the `lastStudy` slot: `{data, params}` written together after a valid generation
//!   - the `draftStudyParams` slot: unsubmitted form values
//!
//! Writes are fire-and-forget: failures are logged, never returned. A slot that no longer
//! parses or validates is dropped on read and reported as empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::domain::{DraftParams, LastStudy};
use crate::protocol::is_usable_study;

pub const LAST_STUDY_KEY: &str = "lastStudy";
pub const DRAFT_KEY: &str = "draftStudyParams";

/// Session ids name a single directory under the session root.
fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<RwLock<HashMap<String, String>>>),
    Directory(PathBuf),
}

#[derive(Clone)]
pub struct SessionStore {
    backend: Backend,
    pub session_id: String,
}

impl SessionStore {
    /// Storage that lives as long as this process (a browser tab, in effect).
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(RwLock::new(HashMap::new()))),
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Storage under `<root>/<session_id>/`, surviving restarts that reuse the id.
    pub fn directory(root: &Path, session_id: &str) -> std::io::Result<Self> {
        if !is_valid_session_id(session_id) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("session id {:?} must be letters, digits, '-' or '_'", session_id),
            ));
        }
        let dir = root.join(session_id);
        std::fs::create_dir_all(&dir)?;
        Ok(Self { backend: Backend::Directory(dir), session_id: session_id.to_string() })
    }

    /// Build from config. A session directory that can't be created falls back to memory.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: &ClientConfig) -> Self {
        let Some(root) = &cfg.session_dir else {
            info!(target: "session_store", "No session dir configured; session storage is in-memory.");
            return Self::in_memory();
        };
        let session_id = match cfg.session_id.as_deref() {
            Some(id) if is_valid_session_id(id) => id.to_string(),
            Some(id) => {
                warn!(target: "session_store", session_id = %id, "Session id is not a plain name; starting a fresh session.");
                Uuid::new_v4().to_string()
            }
            None => Uuid::new_v4().to_string(),
        };
        match Self::directory(root, &session_id) {
            Ok(store) => {
                info!(target: "session_store", root = %root.display(), %session_id, "Using directory-backed session storage.");
                store
            }
            Err(e) => {
                warn!(target: "session_store", root = %root.display(), error = %e, "Cannot open session dir; using in-memory storage.");
                Self::in_memory()
            }
        }
    }

    fn file_for(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{}.json", key))
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Memory(map) => map.read().unwrap_or_else(|p| p.into_inner()).get(key).cloned(),
            Backend::Directory(dir) => std::fs::read_to_string(Self::file_for(dir, key)).ok(),
        }
    }

    pub fn set_raw(&self, key: &str, value: String) {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().unwrap_or_else(|p| p.into_inner()).insert(key.to_string(), value);
            }
            Backend::Directory(dir) => {
                if let Err(e) = std::fs::write(Self::file_for(dir, key), value) {
                    warn!(target: "session_store", %key, error = %e, "Session write failed; ignoring.");
                }
            }
        }
    }

    pub fn remove(&self, key: &str) {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().unwrap_or_else(|p| p.into_inner()).remove(key);
            }
            Backend::Directory(dir) => {
                let path = Self::file_for(dir, key);
                if path.exists() {
                    if let Err(e) = std::fs::remove_file(&path) {
                        warn!(target: "session_store", %key, error = %e, "Session remove failed; ignoring.");
                    }
                }
            }
        }
    }

    /// End of session: forget both slots.
    pub fn clear(&self) {
        self.remove(LAST_STUDY_KEY);
        self.remove(DRAFT_KEY);
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(s) => self.set_raw(key, s),
            Err(e) => warn!(target: "session_store", %key, error = %e, "Session value not serializable; ignoring."),
        }
    }

    /// Read and decode a slot; undecodable content is dropped.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str::<T>(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(target: "session_store", %key, error = %e, "Discarding unreadable session slot.");
                self.remove(key);
                None
            }
        }
    }

    pub fn load_last_study(&self) -> Option<LastStudy> {
        let record: LastStudy = self.load_json(LAST_STUDY_KEY)?;
        if !is_usable_study(&record.data) || record.params.topic.trim().is_empty() {
            debug!(target: "session_store", "Discarding lastStudy slot that fails validation.");
            self.remove(LAST_STUDY_KEY);
            return None;
        }
        Some(record)
    }

    pub fn save_last_study(&self, record: &LastStudy) {
        self.save_json(LAST_STUDY_KEY, record);
    }

    pub fn load_draft(&self) -> Option<DraftParams> {
        self.load_json(DRAFT_KEY)
    }

    pub fn save_draft(&self, draft: &DraftParams) {
        self.save_json(DRAFT_KEY, draft);
    }
}
