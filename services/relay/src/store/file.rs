//! File-backed content store.
//!
//! The whole mapping lives in one JSON document. Every write is a full
//! read-modify-write of that document, so:
//! - Writes go to a sibling temp file which is then renamed over the store
//! - Initialization, recovery and `put` are serialized behind one mutex
//! - Reads take no lock; an atomic rename never exposes a half-written file
//!
//! A document that cannot be parsed is copied to a timestamped backup next
//! to the store and replaced with an empty one.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_id::{ContentId, Locator};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use super::ContentStore;
use crate::error::{StorageFailure, StoreError};
use crate::record::{ContentRecord, DecodeError, StoreDocument, StoredRecord, STORE_VERSION};

/// What a lock-free read of the store file found.
enum Snapshot {
    Missing,
    Present(StoreDocument),
    Unparsable(serde_json::Error),
}

/// JSON file content store.
pub struct FileContentStore {
    /// Path to the store file.
    path: PathBuf,
    /// Serializes every operation that writes the store file.
    write_lock: Mutex<()>,
}

impl FileContentStore {
    /// Create a store backed by `path`.
    ///
    /// Nothing is touched on disk until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Eagerly run first-touch initialization.
    ///
    /// Creates the file if absent and quarantines it if unparsable.
    /// Returns the number of records found.
    pub async fn initialize(&self) -> Result<usize, StorageFailure> {
        let guard = self.write_lock.lock().await;
        let doc = self.load_or_init(&guard).await?;
        Ok(doc.records.len())
    }

    async fn read_snapshot(&self) -> Result<Snapshot, StorageFailure> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Snapshot::Missing),
            Err(source) => {
                return Err(StorageFailure::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match StoreDocument::decode(&bytes) {
            Ok(doc) => Ok(Snapshot::Present(doc)),
            Err(DecodeError::Malformed(e)) => Ok(Snapshot::Unparsable(e)),
            Err(DecodeError::UnsupportedVersion(found)) => {
                Err(StorageFailure::UnsupportedVersion {
                    path: self.path.clone(),
                    found,
                    supported: STORE_VERSION,
                })
            }
        }
    }

    /// Load the document, creating or resetting the file as needed.
    ///
    /// Callers prove they hold the write lock by passing its guard.
    async fn load_or_init(
        &self,
        _guard: &MutexGuard<'_, ()>,
    ) -> Result<StoreDocument, StorageFailure> {
        match self.read_snapshot().await? {
            Snapshot::Present(doc) => Ok(doc),
            Snapshot::Missing => {
                let doc = StoreDocument::default();
                self.write_atomic(&doc).await?;
                info!(path = %self.path.display(), "Created new content store");
                Ok(doc)
            }
            Snapshot::Unparsable(parse_error) => {
                let backup = self.quarantine(Utc::now()).await?;
                error!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %parse_error,
                    "Corrupted content store, backed up and reset"
                );
                let doc = StoreDocument::default();
                self.write_atomic(&doc).await?;
                Ok(doc)
            }
        }
    }

    /// Copy the current file aside. The original is never deleted here.
    async fn quarantine(&self, now: DateTime<Utc>) -> Result<PathBuf, StorageFailure> {
        let backup = backup_path(&self.path, now);
        fs::copy(&self.path, &backup)
            .await
            .map_err(|source| StorageFailure::Quarantine {
                path: self.path.clone(),
                backup: backup.clone(),
                source,
            })?;
        Ok(backup)
    }

    /// Save the document atomically (write temp, fsync, rename).
    async fn write_atomic(&self, doc: &StoreDocument) -> Result<(), StorageFailure> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(write_failure(parent))?;
        }

        let tmp_path = sibling_with_suffix(&self.path, ".tmp");
        let content = serde_json::to_vec_pretty(doc)?;

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(write_failure(&tmp_path))?;
        file.write_all(&content).await.map_err(write_failure(&tmp_path))?;
        file.sync_all().await.map_err(write_failure(&tmp_path))?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_failure(&self.path))?;

        debug!(
            path = %self.path.display(),
            record_count = doc.records.len(),
            "Saved content store"
        );
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn put(&self, id: &ContentId, locator: Locator) -> Result<(), StorageFailure> {
        let guard = self.write_lock.lock().await;
        let mut doc = self.load_or_init(&guard).await?;

        let record = StoredRecord::new(locator, Utc::now());
        if doc.records.insert(id.clone(), record).is_some() {
            warn!(content_id = %id, "Overwrote existing content record");
        }
        doc.version = STORE_VERSION;

        self.write_atomic(&doc).await
    }

    async fn get(&self, id: &ContentId) -> Result<ContentRecord, StoreError> {
        let doc = match self.read_snapshot().await? {
            Snapshot::Present(doc) => doc,
            Snapshot::Missing | Snapshot::Unparsable(_) => {
                let guard = self.write_lock.lock().await;
                self.load_or_init(&guard).await?
            }
        };

        doc.record(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn count(&self) -> Result<usize, StorageFailure> {
        match self.read_snapshot().await? {
            Snapshot::Present(doc) => Ok(doc.records.len()),
            Snapshot::Missing | Snapshot::Unparsable(_) => self.initialize().await,
        }
    }
}

fn write_failure(path: &Path) -> impl FnOnce(io::Error) -> StorageFailure {
    let path = path.to_path_buf();
    move |source| StorageFailure::Write { path, source }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn backup_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let suffix = format!(".backup.{}", now.format("%Y%m%dT%H%M%S%.6fZ"));
    sibling_with_suffix(path, &suffix)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use relay_id::{ItemRef, SourceId};
    use tempfile::TempDir;

    use super::*;

    fn locator(source: i64, item: i64) -> Locator {
        Locator::new(SourceId::new(source), ItemRef::new(item))
    }

    fn backups_in(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".backup."))
            .collect()
    }

    #[test]
    fn test_backup_path_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 5).unwrap();
        let backup = backup_path(Path::new("/data/content_store.json"), now);
        assert_eq!(
            backup,
            PathBuf::from("/data/content_store.json.backup.20261018T093005.000000Z")
        );
    }

    #[tokio::test]
    async fn test_first_touch_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileContentStore::new(&path);
        assert!(!path.exists());

        assert_eq!(store.initialize().await.unwrap(), 0);

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["version"], STORE_VERSION);
        assert!(on_disk["records"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");
        let store = FileContentStore::new(&path);

        let id = ContentId::generate();
        store.put(&id, locator(1, 2)).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_put_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileContentStore::new(&path);

        store.put(&ContentId::generate(), locator(1, 2)).await.unwrap();

        assert!(!sibling_with_suffix(&path, ".tmp").exists());
        let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupted_file_quarantined_and_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{ not json at all").unwrap();

        let store = FileContentStore::new(&path);
        let id = ContentId::generate();
        store.put(&id, locator(1001, 42)).await.unwrap();

        let backups = backups_in(dir.path());
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read(&backups[0]).unwrap(), b"{ not json at all");

        let record = store.get(&id).await.unwrap();
        assert_eq!(record.locator, locator(1001, 42));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_on_corrupted_file_resets_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"\x00\x01garbage").unwrap();

        let store = FileContentStore::new(&path);
        let id = ContentId::parse("AAAAAAAAAAAA").unwrap();
        assert!(matches!(store.get(&id).await, Err(StoreError::NotFound(_))));

        assert_eq!(backups_in(dir.path()).len(), 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_legacy_store_rewritten_on_put() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            br#"{"LegacyId_01": {"chat_id": -100, "message_id": 5, "created_at": "2024-01-02T03:04:05.678901"}}"#,
        )
        .unwrap();

        let store = FileContentStore::new(&path);
        let legacy_id = ContentId::parse("LegacyId_01").unwrap();
        let legacy = store.get(&legacy_id).await.unwrap();
        assert_eq!(legacy.locator, locator(-100, 5));

        store.put(&ContentId::generate(), locator(1, 1)).await.unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["version"], STORE_VERSION);
        assert_eq!(on_disk["records"]["LegacyId_01"]["source_id"], -100);
        assert_eq!(on_disk["records"]["LegacyId_01"]["item_ref"], 5);
        assert!(backups_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_newer_version_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let future = br#"{"version": 7, "records": {}, "shards": []}"#;
        std::fs::write(&path, future).unwrap();

        let store = FileContentStore::new(&path);
        let result = store.put(&ContentId::generate(), locator(1, 1)).await;
        assert!(matches!(
            result,
            Err(StorageFailure::UnsupportedVersion { found: 7, .. })
        ));

        let id = ContentId::parse("AAAAAAAAAAAA").unwrap();
        assert!(matches!(
            store.get(&id).await,
            Err(StoreError::Storage(StorageFailure::UnsupportedVersion { .. }))
        ));

        assert_eq!(std::fs::read(&path).unwrap(), future);
        assert!(backups_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_medium_is_storage_failure() {
        let dir = TempDir::new().unwrap();
        // A directory where the store file should be cannot be read as a file.
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();

        let store = FileContentStore::new(&path);
        let id = ContentId::parse("AAAAAAAAAAAA").unwrap();
        assert!(matches!(
            store.get(&id).await,
            Err(StoreError::Storage(StorageFailure::Read { .. }))
        ));
        assert!(store.put(&id, locator(1, 1)).await.is_err());
    }
}
