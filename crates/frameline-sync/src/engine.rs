use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use frameline_hash::ContentHasher;
use frameline_types::{is_photo_path, ContentHash, PhotoRecord};

use crate::backoff::Backoff;
use crate::error::{SyncError, SyncResult};
use crate::report::{ItemAction, ItemFailure, SyncReport};
use crate::transport::RemoteInventory;

/// Configuration for a [`SyncEngine`]. Passed in explicitly; there is no
/// process-wide default directory.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Local replica directory to reconcile.
    pub photo_dir: PathBuf,
    /// Initial retry delay after a connection failure.
    pub backoff_base: Duration,
    /// Ceiling for the doubling retry delay.
    pub backoff_max: Duration,
}

impl SyncConfig {
    pub fn new(photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            photo_dir: photo_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            photo_dir: PathBuf::from("."),
            backoff_base: Duration::from_secs(60),
            backoff_max: Duration::from_secs(3600),
        }
    }
}

/// Drives a local photo directory toward matching the remote inventory.
///
/// A cycle fetches the remote record list, rebuilds the local hash inventory
/// from scratch (correctness over speed: nothing is cached across cycles),
/// deletes local photos absent remotely, then downloads remote photos absent
/// locally. At most one cycle runs at a time; concurrent callers get
/// [`SyncError::AlreadyInProgress`] instead of queueing.
pub struct SyncEngine {
    config: SyncConfig,
    transport: Arc<dyn RemoteInventory>,
    backoff: StdMutex<Backoff>,
    in_flight: Mutex<()>,
    on_complete: Option<Box<dyn Fn() + Send + Sync>>,
}

impl SyncEngine {
    pub fn new(config: SyncConfig, transport: Arc<dyn RemoteInventory>) -> Self {
        let backoff = Backoff::new(config.backoff_base, config.backoff_max);
        Self {
            config,
            transport,
            backoff: StdMutex::new(backoff),
            in_flight: Mutex::new(()),
            on_complete: None,
        }
    }

    /// Register a callback invoked after any cycle that changed the local
    /// directory. Cycles that applied nothing do not fire it, so dependent
    /// state is not reloaded redundantly.
    pub fn with_completion(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// The delay the scheduling driver should wait before the next attempt.
    pub fn retry_delay(&self) -> Duration {
        self.backoff.lock().expect("lock poisoned").delay()
    }

    /// The most recent connection error, if the last cycle failed.
    pub fn last_error(&self) -> Option<String> {
        self.backoff
            .lock()
            .expect("lock poisoned")
            .last_error()
            .map(str::to_string)
    }

    /// Run one reconciliation cycle.
    pub async fn sync(&self) -> SyncResult<SyncReport> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| SyncError::AlreadyInProgress)?;

        info!("sync cycle started");

        let remote = match self.transport.fetch_inventory().await {
            Ok(records) => {
                self.backoff.lock().expect("lock poisoned").on_success();
                records
            }
            Err(err @ SyncError::Connection(_)) => {
                let delay = self
                    .backoff
                    .lock()
                    .expect("lock poisoned")
                    .on_failure(err.to_string());
                warn!(error = %err, retry_in_secs = delay.as_secs(), "remote unreachable");
                return Err(err);
            }
            Err(err) => {
                // Decode and other failures abort this cycle but leave the
                // backoff untouched; the next cycle retries at the current
                // interval.
                warn!(error = %err, "sync cycle aborted");
                return Err(err);
            }
        };
        debug!(remote = remote.len(), "fetched remote inventory");

        let local = self.scan_local()?;
        debug!(local = local.len(), "hashed local inventory");

        let remote_hashes: HashSet<ContentHash> = remote.iter().map(|r| r.hash).collect();
        let mut report = SyncReport::default();

        // Deletions are fully applied before any download begins.
        for hash in &local {
            if remote_hashes.contains(hash) {
                continue;
            }
            match self.delete_local(hash) {
                Ok(()) => {
                    debug!(hash = %hash.short_hex(), "deleted local photo");
                    report.deleted += 1;
                }
                Err(err) => {
                    warn!(hash = %hash.short_hex(), error = %err, "failed to delete local photo");
                    report.failures.push(ItemFailure {
                        hash: *hash,
                        action: ItemAction::Delete,
                        reason: err.to_string(),
                    });
                }
            }
        }

        for record in &remote {
            if local.contains(&record.hash) {
                continue;
            }
            match self.download(record).await {
                Ok(()) => {
                    debug!(
                        hash = %record.hash.short_hex(),
                        filename = %record.filename,
                        "downloaded photo"
                    );
                    report.downloaded += 1;
                }
                Err(err) => {
                    warn!(hash = %record.hash.short_hex(), error = %err, "failed to download photo");
                    report.failures.push(ItemFailure {
                        hash: record.hash,
                        action: ItemAction::Download,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if report.changed() {
            if let Some(callback) = &self.on_complete {
                callback();
            }
        }

        info!(
            deleted = report.deleted,
            downloaded = report.downloaded,
            failures = report.failures.len(),
            "sync cycle completed"
        );
        Ok(report)
    }

    /// Rebuild the local inventory by hashing every eligible file. Unreadable
    /// files are skipped (they will be retried next cycle); a failure to read
    /// the directory itself aborts the cycle.
    fn scan_local(&self) -> SyncResult<HashSet<ContentHash>> {
        let mut hashes = HashSet::new();
        for entry in std::fs::read_dir(&self.config.photo_dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_photo_path(&path) {
                continue;
            }
            match ContentHasher::hash_file(&path) {
                Ok(hash) => {
                    hashes.insert(hash);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                }
            }
        }
        Ok(hashes)
    }

    /// Remove the local file whose content matches `hash`. Only the hash is
    /// known, so directory entries are re-hashed to locate the path. A file
    /// that is already gone counts as removed.
    fn delete_local(&self, hash: &ContentHash) -> io::Result<()> {
        for entry in std::fs::read_dir(&self.config.photo_dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_photo_path(&path) {
                continue;
            }
            if let Ok(found) = ContentHasher::hash_file(&path) {
                if found == *hash {
                    return std::fs::remove_file(&path);
                }
            }
        }
        Ok(())
    }

    /// Fetch one remote photo and write it under its advertised filename.
    async fn download(&self, record: &PhotoRecord) -> SyncResult<()> {
        let bytes = self.transport.fetch_photo(&record.hash).await?;
        let name = Path::new(&record.filename)
            .file_name()
            .ok_or_else(|| SyncError::Remote(format!("unusable filename {:?}", record.filename)))?;
        let path = self.config.photo_dir.join(name);
        tokio::fs::write(&path, &bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::io::Write as _;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const UNIT: Duration = Duration::from_secs(1);

    fn record_for(content: &[u8], filename: &str) -> PhotoRecord {
        PhotoRecord::new(ContentHasher::hash_bytes(content), filename, Utc::now())
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) {
        std::fs::File::create(dir.join(name))
            .unwrap()
            .write_all(content)
            .unwrap();
    }

    fn test_config(dir: &Path) -> SyncConfig {
        SyncConfig {
            photo_dir: dir.to_path_buf(),
            backoff_base: UNIT,
            backoff_max: 64 * UNIT,
        }
    }

    /// In-memory transport: serves a fixed inventory and content map, and
    /// counts fetches.
    struct MockTransport {
        records: Vec<PhotoRecord>,
        photos: HashMap<ContentHash, Vec<u8>>,
        photo_fetches: AtomicUsize,
    }

    impl MockTransport {
        fn new(items: Vec<(&'static str, &'static [u8])>) -> Self {
            let mut records = Vec::new();
            let mut photos = HashMap::new();
            for (filename, content) in items {
                let record = record_for(content, filename);
                photos.insert(record.hash, content.to_vec());
                records.push(record);
            }
            Self {
                records,
                photos,
                photo_fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RemoteInventory for MockTransport {
        async fn fetch_inventory(&self) -> SyncResult<Vec<PhotoRecord>> {
            Ok(self.records.clone())
        }

        async fn fetch_photo(&self, hash: &ContentHash) -> SyncResult<Vec<u8>> {
            self.photo_fetches.fetch_add(1, Ordering::SeqCst);
            self.photos
                .get(hash)
                .cloned()
                .ok_or_else(|| SyncError::Remote("unknown hash".into()))
        }
    }

    /// Transport whose inventory fetch fails while `fail` is set.
    struct FlakyTransport {
        fail: AtomicBool,
    }

    #[async_trait]
    impl RemoteInventory for FlakyTransport {
        async fn fetch_inventory(&self) -> SyncResult<Vec<PhotoRecord>> {
            if self.fail.load(Ordering::SeqCst) {
                Err(SyncError::Connection("connection refused".into()))
            } else {
                Ok(Vec::new())
            }
        }

        async fn fetch_photo(&self, _hash: &ContentHash) -> SyncResult<Vec<u8>> {
            Err(SyncError::Remote("unexpected".into()))
        }
    }

    /// Transport that parks the inventory fetch until released.
    struct BlockingTransport {
        release: Notify,
    }

    #[async_trait]
    impl RemoteInventory for BlockingTransport {
        async fn fetch_inventory(&self) -> SyncResult<Vec<PhotoRecord>> {
            self.release.notified().await;
            Ok(Vec::new())
        }

        async fn fetch_photo(&self, _hash: &ContentHash) -> SyncResult<Vec<u8>> {
            Err(SyncError::Remote("unexpected".into()))
        }
    }

    /// Transport that fails in a selectable way: 0 = connection failure,
    /// 1 = decode failure, 2 = empty inventory.
    struct ModalTransport {
        mode: AtomicUsize,
    }

    #[async_trait]
    impl RemoteInventory for ModalTransport {
        async fn fetch_inventory(&self) -> SyncResult<Vec<PhotoRecord>> {
            match self.mode.load(Ordering::SeqCst) {
                0 => Err(SyncError::Connection("connection refused".into())),
                1 => Err(SyncError::Decode("expected value at line 1".into())),
                _ => Ok(Vec::new()),
            }
        }

        async fn fetch_photo(&self, _hash: &ContentHash) -> SyncResult<Vec<u8>> {
            Err(SyncError::Remote("unexpected".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn deletes_local_photo_absent_from_remote() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.jpeg", b"content a");
        write_file(dir.path(), "b.jpeg", b"content b");

        // Remote advertises only b.
        let transport = Arc::new(MockTransport::new(vec![("b.jpeg", b"content b")]));
        let engine = SyncEngine::new(test_config(dir.path()), transport.clone());

        let report = engine.sync().await.unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(report.downloaded, 0);
        assert!(!dir.path().join("a.jpeg").exists());
        assert!(dir.path().join("b.jpeg").exists());
        // Nothing was missing locally, so no download was attempted.
        assert_eq!(transport.photo_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn downloads_missing_and_deletes_stale_leaving_common_untouched() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "h1.jpeg", b"content 1");
        write_file(dir.path(), "h2.jpeg", b"content 2");

        // Remote has h1 and h3; local has h1 and h2.
        let transport = Arc::new(MockTransport::new(vec![
            ("h1.jpeg", b"content 1"),
            ("h3.jpeg", b"content 3"),
        ]));
        let engine = SyncEngine::new(test_config(dir.path()), transport);

        let report = engine.sync().await.unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(report.downloaded, 1);
        assert!(report.failures.is_empty());

        assert!(dir.path().join("h1.jpeg").exists());
        assert!(!dir.path().join("h2.jpeg").exists());
        assert_eq!(
            std::fs::read(dir.path().join("h3.jpeg")).unwrap(),
            b"content 3"
        );
    }

    #[tokio::test]
    async fn in_sync_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.jpeg", b"content a");

        let transport = Arc::new(MockTransport::new(vec![("a.jpeg", b"content a")]));
        let engine = SyncEngine::new(test_config(dir.path()), transport);

        let report = engine.sync().await.unwrap();
        assert!(!report.changed());
    }

    #[tokio::test]
    async fn failed_download_does_not_abort_remaining_items() {
        let dir = tempfile::tempdir().unwrap();

        // One of the two advertised photos has no content behind it.
        let mut transport = MockTransport::new(vec![("ok.jpeg", b"fine")]);
        transport.records.push(record_for(b"missing", "broken.jpeg"));
        let engine = SyncEngine::new(test_config(dir.path()), Arc::new(transport));

        let report = engine.sync().await.unwrap();
        assert_eq!(report.downloaded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].action, ItemAction::Download);
        assert!(dir.path().join("ok.jpeg").exists());
    }

    // -----------------------------------------------------------------------
    // Single-flight
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn concurrent_sync_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.jpeg", b"content a");

        let transport = Arc::new(BlockingTransport {
            release: Notify::new(),
        });
        let engine = Arc::new(SyncEngine::new(test_config(dir.path()), transport.clone()));

        let first = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.sync().await })
        };
        // Let the first cycle reach the parked inventory fetch.
        tokio::task::yield_now().await;

        let second = engine.sync().await;
        assert!(matches!(second, Err(SyncError::AlreadyInProgress)));
        // The rejected call touched nothing.
        assert!(dir.path().join("a.jpeg").exists());

        transport.release.notify_one();
        // Remote is empty, so the first cycle deletes the local photo.
        let report = first.await.unwrap().unwrap();
        assert_eq!(report.deleted, 1);
    }

    // -----------------------------------------------------------------------
    // Backoff interaction
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn connection_failures_double_backoff_until_success() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FlakyTransport {
            fail: AtomicBool::new(true),
        });
        let engine = SyncEngine::new(test_config(dir.path()), transport.clone());

        for expected in [2u32, 4, 8] {
            let err = engine.sync().await.unwrap_err();
            assert!(matches!(err, SyncError::Connection(_)));
            assert_eq!(engine.retry_delay(), expected * UNIT);
        }
        assert!(engine.last_error().is_some());

        transport.fail.store(false, Ordering::SeqCst);
        engine.sync().await.unwrap();
        assert_eq!(engine.retry_delay(), UNIT);
        assert!(engine.last_error().is_none());
    }

    #[tokio::test]
    async fn decode_failure_leaves_backoff_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(ModalTransport {
            mode: AtomicUsize::new(0),
        });
        let engine = SyncEngine::new(test_config(dir.path()), transport.clone());

        // Grow the backoff once with a connection failure.
        engine.sync().await.unwrap_err();
        assert_eq!(engine.retry_delay(), 2 * UNIT);

        // A decode failure aborts the cycle at the same interval:
        // neither grown nor reset.
        transport.mode.store(1, Ordering::SeqCst);
        let err = engine.sync().await.unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
        assert_eq!(engine.retry_delay(), 2 * UNIT);

        // The next successful fetch resets it.
        transport.mode.store(2, Ordering::SeqCst);
        engine.sync().await.unwrap();
        assert_eq!(engine.retry_delay(), UNIT);
    }

    // -----------------------------------------------------------------------
    // Completion callback
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn callback_fires_only_when_something_changed() {
        let dir = tempfile::tempdir().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let transport = Arc::new(MockTransport::new(vec![("a.jpeg", b"content a")]));
        let counter = Arc::clone(&fired);
        let engine = SyncEngine::new(test_config(dir.path()), transport)
            .with_completion(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        // First cycle downloads a.jpeg: callback fires.
        engine.sync().await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Second cycle applies nothing: no redundant reload.
        engine.sync().await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
