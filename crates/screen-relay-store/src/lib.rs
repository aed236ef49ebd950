//! Latest-frame blob storage.
//!
//! Each session owns exactly one blob file under the store's root directory.
//! A successful write atomically replaces the previous blob, so concurrent
//! readers never observe a partially written frame. A session that has not
//! uploaded yet simply has no file - readers treat that as a normal state.

use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use tempfile::NamedTempFile;
use thiserror::Error;

use screen_relay_core::SessionId;

/// Store error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no frame stored for session {0}")]
    NotFound(String),
    #[error("frame of {got} bytes exceeds the {cap} byte cap")]
    TooLarge { got: usize, cap: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("blocking write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Disk-backed store holding the latest frame per session.
///
/// Writes for different sessions target different files and never contend.
pub struct FrameStore {
    root: PathBuf,
    max_blob_bytes: usize,
}

impl FrameStore {
    /// Create a store rooted at `root`.
    ///
    /// `max_blob_bytes` caps a single blob. Callers are expected to reject
    /// oversized payloads before calling [`FrameStore::write`]; the cap here
    /// is re-checked anyway.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, max_blob_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_blob_bytes,
        }
    }

    /// Create the root directory if it does not exist.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the blob file for `id`.
    #[must_use]
    pub fn file_for(&self, id: &SessionId) -> PathBuf {
        self.root.join(id.frame_file())
    }

    /// Atomically replace the blob for `id` with `bytes`.
    ///
    /// The payload is written to a temporary file in the same directory and
    /// renamed over the destination, so readers see either the old blob or
    /// the new one, never a partial write.
    ///
    /// # Errors
    /// Returns [`StoreError::TooLarge`] if the payload exceeds the cap, or
    /// [`StoreError::Io`] on any filesystem failure.
    pub async fn write(&self, id: &SessionId, bytes: Bytes) -> Result<(), StoreError> {
        if bytes.len() > self.max_blob_bytes {
            return Err(StoreError::TooLarge {
                got: bytes.len(),
                cap: self.max_blob_bytes,
            });
        }

        let dir = self.root.clone();
        let dest = self.file_for(id);

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.flush()?;
            tmp.persist(&dest).map_err(|e| StoreError::Io(e.error))?;
            Ok(())
        })
        .await?
    }

    /// Whether a blob currently exists for `id`.
    #[must_use]
    pub fn exists(&self, id: &SessionId) -> bool {
        self.file_for(id).is_file()
    }

    /// Read the current blob for `id` in full.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no upload has happened yet, or
    /// [`StoreError::Io`] on any other filesystem failure.
    pub async fn read(&self, id: &SessionId) -> Result<Bytes, StoreError> {
        match tokio::fs::read(self.file_for(id)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn id(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    fn store(dir: &TempDir) -> FrameStore {
        FrameStore::new(dir.path(), 1024)
    }

    #[tokio::test]
    async fn write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let sid = id("sess_a1");

        store.write(&sid, Bytes::from_static(b"jpegbytes")).await.unwrap();

        let data = store.read(&sid).await.unwrap();
        assert_eq!(&data[..], b"jpegbytes");
    }

    #[tokio::test]
    async fn read_before_any_write_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let sid = id("sess_a1");

        assert!(!store.exists(&sid));
        assert!(matches!(
            store.read(&sid).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn overwrite_keeps_only_latest_blob() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let sid = id("sess_a1");

        store.write(&sid, Bytes::from_static(b"first")).await.unwrap();
        store.write(&sid, Bytes::from_static(b"second")).await.unwrap();

        let data = store.read(&sid).await.unwrap();
        assert_eq!(&data[..], b"second");

        // Exactly one file for the session, no temp leftovers.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn oversized_blob_is_rejected_without_touching_disk() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(dir.path(), 4);
        let sid = id("sess_a1");

        let err = store.write(&sid, Bytes::from_static(b"too big")).await;
        assert!(matches!(err, Err(StoreError::TooLarge { got: 7, cap: 4 })));
        assert!(!store.exists(&sid));
    }

    #[tokio::test]
    async fn concurrent_writes_for_distinct_sessions() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store(&dir));
        let (a, b) = (id("sess-a"), id("sess-b"));

        let (ra, rb) = tokio::join!(
            store.write(&a, Bytes::from_static(b"frame-a")),
            store.write(&b, Bytes::from_static(b"frame-b")),
        );
        ra.unwrap();
        rb.unwrap();

        assert_eq!(&store.read(&a).await.unwrap()[..], b"frame-a");
        assert_eq!(&store.read(&b).await.unwrap()[..], b"frame-b");
    }

    #[tokio::test]
    async fn ensure_dir_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("screens");
        let store = FrameStore::new(&nested, 1024);

        store.ensure_dir().unwrap();
        assert!(nested.is_dir());

        store.write(&id("sess_a1"), Bytes::from_static(b"x")).await.unwrap();
        assert!(store.exists(&id("sess_a1")));
    }
}
