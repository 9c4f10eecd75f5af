use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use image::RgbaImage;
use tracing::debug;

/// One loaded photo: its backing path and the decoded, display-ready image.
#[derive(Clone)]
pub struct PhotoEntry {
    pub path: PathBuf,
    pub image: Arc<RgbaImage>,
}

struct WorkingSet {
    photos: Vec<PhotoEntry>,
    cursor: usize,
}

/// Path-keyed working set of decoded photos with a current-position cursor.
///
/// Exclusively owns its entries; consumers read snapshots under the shared
/// lock ([`Gallery::current`]) and never see the internal sequence. No two
/// entries share a path. Mutations take the exclusive lock only for the
/// sequence update; decoding always happens before [`Gallery::insert`] is
/// called.
pub struct Gallery {
    set: RwLock<WorkingSet>,
}

impl Gallery {
    pub fn new() -> Self {
        Self {
            set: RwLock::new(WorkingSet {
                photos: Vec::new(),
                cursor: 0,
            }),
        }
    }

    /// Number of photos in the working set.
    pub fn len(&self) -> usize {
        self.set.read().expect("lock poisoned").photos.len()
    }

    /// Returns `true` if the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.set.read().expect("lock poisoned").photos.is_empty()
    }

    /// Append a loaded photo. Idempotent by path: if an entry for `path`
    /// already exists the call is a no-op and the first-loaded content is
    /// retained. Returns `true` if the entry was inserted.
    pub fn insert(&self, path: PathBuf, image: RgbaImage) -> bool {
        let mut set = self.set.write().expect("lock poisoned");
        if set.photos.iter().any(|p| p.path == path) {
            debug!(path = %path.display(), "photo already present, keeping first");
            return false;
        }
        debug!(path = %path.display(), "photo added");
        set.photos.push(PhotoEntry {
            path,
            image: Arc::new(image),
        });
        true
    }

    /// Remove the entry for `path` if present. A missing path is a logged
    /// no-op. If the removed entry was at the cursor, the cursor resets to
    /// the first entry; removals before the cursor shift it so the current
    /// photo is unchanged. Returns `true` if an entry was removed.
    pub fn remove(&self, path: &Path) -> bool {
        let mut set = self.set.write().expect("lock poisoned");
        let Some(idx) = set.photos.iter().position(|p| p.path == path) else {
            debug!(path = %path.display(), "photo not present, nothing to remove");
            return false;
        };
        set.photos.remove(idx);
        debug!(path = %path.display(), "photo removed");
        if set.photos.is_empty() || idx == set.cursor {
            set.cursor = 0;
        } else if idx < set.cursor {
            set.cursor -= 1;
        }
        true
    }

    /// Snapshot of the photo at the cursor, or `None` if the set is empty.
    pub fn current(&self) -> Option<PhotoEntry> {
        let set = self.set.read().expect("lock poisoned");
        set.photos.get(set.cursor).cloned()
    }

    /// Move the cursor to the next photo, wrapping at the end.
    pub fn advance(&self) {
        let mut set = self.set.write().expect("lock poisoned");
        if !set.photos.is_empty() {
            set.cursor = (set.cursor + 1) % set.photos.len();
        }
    }

    /// Move the cursor to the previous photo, wrapping at the start.
    pub fn rewind(&self) {
        let mut set = self.set.write().expect("lock poisoned");
        if !set.photos.is_empty() {
            set.cursor = set
                .cursor
                .checked_sub(1)
                .unwrap_or(set.photos.len() - 1);
        }
    }

    /// Drop every entry and reset the cursor. Used before a full reload.
    pub fn clear(&self) {
        let mut set = self.set.write().expect("lock poisoned");
        set.photos.clear();
        set.cursor = 0;
    }

    /// Snapshot of all entry paths, in working-set order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.set
            .read()
            .expect("lock poisoned")
            .photos
            .iter()
            .map(|p| p.path.clone())
            .collect()
    }
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}
