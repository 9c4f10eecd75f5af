use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};
use walkdir::WalkDir;

use frameline_hash::ContentHasher;
use frameline_types::{is_photo_path, ContentHash, PhotoRecord, TMP_PREFIX};

use crate::error::{StoreError, StoreResult};

/// Copy buffer for streaming uploads to disk while hashing.
const COPY_BUF_SIZE: usize = 64 * 1024;

/// Durable, content-addressed photo store.
///
/// Owns a base directory of photo files and an in-memory index mapping
/// content hash to [`PhotoRecord`]. The index is rebuilt by a full scan in
/// [`ContentStore::open`] and maintained incrementally by
/// [`ContentStore::add`] / [`ContentStore::delete`].
#[derive(Debug)]
pub struct ContentStore {
    base_dir: PathBuf,
    index: RwLock<HashMap<ContentHash, PhotoRecord>>,
}

impl ContentStore {
    /// Open (or create) a store at the given directory and rebuild the
    /// index from a full scan.
    ///
    /// Fails with [`StoreError::Init`] if the directory cannot be created
    /// or any eligible file cannot be read and hashed; no partial index.
    pub fn open(base_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir).map_err(|source| StoreError::Init {
            path: base_dir.clone(),
            source,
        })?;

        let init_err = |source: io::Error| StoreError::Init {
            path: base_dir.clone(),
            source,
        };

        let mut index = HashMap::new();
        for entry in WalkDir::new(&base_dir).follow_links(true) {
            let entry = entry.map_err(|e| init_err(io::Error::other(e)))?;
            if !entry.file_type().is_file() || !is_photo_path(entry.path()) {
                continue;
            }
            let hash = ContentHasher::hash_file(entry.path()).map_err(init_err)?;
            let updated_at = modified_time(entry.path()).map_err(init_err)?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            index.insert(hash, PhotoRecord::new(hash, filename, updated_at));
        }

        info!(
            photos = index.len(),
            dir = %base_dir.display(),
            "content store opened"
        );

        Ok(Self {
            base_dir,
            index: RwLock::new(index),
        })
    }

    /// The directory backing this store.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Number of indexed photos.
    pub fn len(&self) -> usize {
        self.index.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no photos.
    pub fn is_empty(&self) -> bool {
        self.index.read().expect("lock poisoned").is_empty()
    }

    /// Snapshot of all current records, in unspecified order.
    ///
    /// Returns copies; callers never see the internal map.
    pub fn list(&self) -> Vec<PhotoRecord> {
        self.index
            .read()
            .expect("lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Path of the file backing the given hash.
    ///
    /// Trusts the index between rescans: the file is not re-checked on
    /// every call. A dangling entry is an invariant violation, not a normal
    /// error path.
    pub fn get(&self, hash: &ContentHash) -> StoreResult<PathBuf> {
        let index = self.index.read().expect("lock poisoned");
        let record = index.get(hash).ok_or(StoreError::NotFound(*hash))?;
        Ok(self.base_dir.join(&record.filename))
    }

    /// Store an uploaded photo, streaming it to disk while hashing.
    ///
    /// The stream is written to a `tmp-<filename>` sibling and renamed
    /// atomically on completion, so a partially-written file is never
    /// visible under its final name. The temp file is removed on every
    /// failure path. Filenames are not deduplicated: identical content
    /// uploaded under two names lands as two files, and the index slot for
    /// the hash follows the last writer.
    pub async fn add<R>(&self, filename: &str, mut reader: R) -> StoreResult<PhotoRecord>
    where
        R: AsyncRead + Unpin,
    {
        let name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty() && !n.starts_with(TMP_PREFIX))
            .ok_or_else(|| StoreError::InvalidFilename(filename.to_string()))?
            .to_string();

        let write_err = |source: io::Error| StoreError::Write {
            filename: name.clone(),
            source,
        };

        let temp_path = self.base_dir.join(format!("{TMP_PREFIX}{name}"));
        let mut guard = TempFileGuard::new(temp_path.clone());

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(write_err)?;
        let mut hasher = ContentHasher::new();
        let mut buf = vec![0u8; COPY_BUF_SIZE];
        loop {
            let n = reader.read(&mut buf).await.map_err(write_err)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            file.write_all(&buf[..n]).await.map_err(write_err)?;
        }
        file.flush().await.map_err(write_err)?;
        drop(file);

        let final_path = self.base_dir.join(&name);
        tokio::fs::rename(&temp_path, &final_path)
            .await
            .map_err(write_err)?;
        guard.disarm();

        let hash = hasher.finalize();
        let updated_at = modified_time(&final_path).map_err(write_err)?;
        let record = PhotoRecord::new(hash, name, updated_at);

        self.index
            .write()
            .expect("lock poisoned")
            .insert(hash, record.clone());

        debug!(hash = %hash.short_hex(), filename = %record.filename, "photo stored");
        Ok(record)
    }

    /// Remove the photo with the given hash: backing file and index entry
    /// as one logical operation.
    ///
    /// Fails with [`StoreError::NotFound`] if the hash is absent. If the
    /// file cannot be removed (including when it is already gone), the
    /// index entry is NOT removed and [`StoreError::Delete`] is returned;
    /// the startup rescan is what reconverges index and filesystem.
    pub fn delete(&self, hash: &ContentHash) -> StoreResult<()> {
        let mut index = self.index.write().expect("lock poisoned");
        let record = index.get(hash).ok_or(StoreError::NotFound(*hash))?;
        let path = self.base_dir.join(&record.filename);
        std::fs::remove_file(&path).map_err(|source| StoreError::Delete {
            hash: *hash,
            source,
        })?;
        index.remove(hash);
        debug!(hash = %hash.short_hex(), "photo deleted");
        Ok(())
    }
}

/// Removes the temp file on drop unless disarmed after a successful rename.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

fn modified_time(path: &Path) -> io::Result<DateTime<Utc>> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(modified.into())
}
