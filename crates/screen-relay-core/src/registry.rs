//! In-memory session registry.

use std::{
    collections::HashMap,
    sync::RwLock,
    time::{SystemTime, UNIX_EPOCH},
};

use serde_json::Value;
use thiserror::Error;

use crate::session::{SessionId, SessionRecord};

/// Registry error.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid session id: {0:?}")]
    InvalidId(String),
    #[error("registry error: {0}")]
    Internal(String),
}

/// Concurrent in-memory session map.
///
/// Constructed once at startup and shared behind an `Arc`; handlers never
/// touch records directly. Records are never deleted - sessions persist for
/// the process lifetime.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create or update a session from an explicit registration.
    ///
    /// `meta` is replaced wholesale - keys from earlier registrations are not
    /// retained. The frame file name is fixed at creation and preserved on
    /// update.
    ///
    /// # Errors
    /// Returns [`RegistryError::Internal`] if the registry lock is poisoned.
    pub fn register(
        &self,
        id: &SessionId,
        meta: HashMap<String, Value>,
    ) -> Result<SessionRecord, RegistryError> {
        let timestamp = now_ms();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| RegistryError::Internal(e.to_string()))?;

        match sessions.get_mut(id) {
            Some(record) => {
                record.last_seen = timestamp;
                record.meta = meta;
                Ok(record.clone())
            }
            None => {
                let record = SessionRecord {
                    session_id: id.clone(),
                    last_seen: timestamp,
                    frame_file: id.frame_file(),
                    meta,
                };
                sessions.insert(id.clone(), record.clone());
                Ok(record)
            }
        }
    }

    /// Mark a session as alive from the upload path.
    ///
    /// Auto-creates the session with empty `meta` if it has never been seen;
    /// otherwise only bumps `last_seen`.
    ///
    /// # Errors
    /// Returns [`RegistryError::Internal`] if the registry lock is poisoned.
    pub fn touch(&self, id: &SessionId) -> Result<SessionRecord, RegistryError> {
        let timestamp = now_ms();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| RegistryError::Internal(e.to_string()))?;

        match sessions.get_mut(id) {
            Some(record) => {
                record.last_seen = timestamp;
                Ok(record.clone())
            }
            None => {
                let record = SessionRecord {
                    session_id: id.clone(),
                    last_seen: timestamp,
                    frame_file: id.frame_file(),
                    meta: HashMap::new(),
                };
                sessions.insert(id.clone(), record.clone());
                Ok(record)
            }
        }
    }

    /// Look up a session by id.
    ///
    /// # Errors
    /// Returns [`RegistryError::Internal`] if the registry lock is poisoned.
    pub fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, RegistryError> {
        Ok(self
            .sessions
            .read()
            .map_err(|e| RegistryError::Internal(e.to_string()))?
            .get(id)
            .cloned())
    }

    /// Point-in-time copy of every record, sorted by session id.
    ///
    /// # Errors
    /// Returns [`RegistryError::Internal`] if the registry lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<SessionRecord>, RegistryError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| RegistryError::Internal(e.to_string()))?;

        let mut records: Vec<SessionRecord> = sessions.values().cloned().collect();
        records.sort_by(|a, b| a.session_id.as_str().cmp(b.session_id.as_str()));
        Ok(records)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
