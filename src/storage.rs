//! Output write-back: the put-object-by-name seam.
//!
//! The pipeline's only persistence is one named object overwritten on every
//! run. [`BlobStore`] abstracts that capability so the orchestrator never
//! knows whether it is talking to a cloud container, a test double, or a
//! directory on disk. [`DirStore`] is the bundled implementation the CLI
//! uses: it treats a local directory as the container and writes atomically
//! (temp file + rename) so a crash mid-write never leaves a torn summary.

use crate::error::DocsumError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// A put-object-by-name capability with overwrite semantics.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `name`, replacing any existing object.
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), DocsumError>;
}

/// A directory-backed store: each object is a file in the container dir.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path an object name maps to.
    pub fn object_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

#[async_trait]
impl BlobStore for DirStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), DocsumError> {
        let path = self.object_path(name);
        let upload_err = |e: std::io::Error| DocsumError::Upload {
            name: name.to_string(),
            detail: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(upload_err)?;

        // Atomic write: a uniquely named temp file in the same directory,
        // then rename. The name must be unique per put — concurrently
        // dispatched runs share the container, and a fixed scratch name
        // would let one run rename another's half-written bytes (or destroy
        // an unrelated object that happens to carry that name).
        let tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(upload_err)?;
        tokio::fs::write(tmp.path(), bytes).await.map_err(upload_err)?;
        tmp.persist(&path).map_err(|e| upload_err(e.error))?;

        info!("Summary uploaded successfully to {name} in {}", self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn put_writes_object_bytes() {
        let dir = TempDir::new().unwrap();
        let store = DirStore::new(dir.path());
        store.put("summary_report.json", b"{}").await.unwrap();
        let on_disk = std::fs::read(dir.path().join("summary_report.json")).unwrap();
        assert_eq!(on_disk, b"{}");
    }

    #[tokio::test]
    async fn put_overwrites_existing_object() {
        let dir = TempDir::new().unwrap();
        let store = DirStore::new(dir.path());
        store.put("summary_report.txt", b"first").await.unwrap();
        store.put("summary_report.txt", b"second").await.unwrap();
        let on_disk = std::fs::read(dir.path().join("summary_report.txt")).unwrap();
        assert_eq!(on_disk, b"second");
    }

    #[tokio::test]
    async fn put_creates_missing_container_dir() {
        let dir = TempDir::new().unwrap();
        let store = DirStore::new(dir.path().join("container"));
        store.put("summary_report.json", b"[]").await.unwrap();
        assert!(dir.path().join("container/summary_report.json").exists());
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = DirStore::new(dir.path());
        store.put("summary_report.json", b"{}").await.unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["summary_report.json"]);
    }

    #[tokio::test]
    async fn put_leaves_unrelated_objects_alone() {
        let dir = TempDir::new().unwrap();
        // An existing object whose name looks like a scratch file must
        // survive a put of a sibling object untouched.
        std::fs::write(dir.path().join("summary_report.tmp"), b"keep").unwrap();

        let store = DirStore::new(dir.path());
        store.put("summary_report.json", b"{}").await.unwrap();

        let kept = std::fs::read(dir.path().join("summary_report.tmp")).unwrap();
        assert_eq!(kept, b"keep");
        let put = std::fs::read(dir.path().join("summary_report.json")).unwrap();
        assert_eq!(put, b"{}");
    }

    #[tokio::test]
    async fn concurrent_puts_with_shared_stem_do_not_interfere() {
        let dir = TempDir::new().unwrap();
        let store = DirStore::new(dir.path());
        let (a, b) = tokio::join!(
            store.put("summary_report.json", b"{}"),
            store.put("summary_report.txt", b"1. Point"),
        );
        a.unwrap();
        b.unwrap();
        let json = std::fs::read(dir.path().join("summary_report.json")).unwrap();
        assert_eq!(json, b"{}");
        let txt = std::fs::read(dir.path().join("summary_report.txt")).unwrap();
        assert_eq!(txt, b"1. Point");
    }
}
