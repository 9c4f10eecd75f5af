use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use frameline_types::ContentHash;

/// Read buffer for streaming file hashes. Large enough to keep the hasher
/// fed from spinning disks without holding whole photos in memory.
const HASH_BUF_SIZE: usize = 64 * 1024;

/// Incremental BLAKE3 content hasher.
///
/// Use [`ContentHasher::hash_bytes`] or [`ContentHasher::hash_file`] for the
/// common one-shot cases. The incremental `new`/`update`/`finalize` form
/// exists for tee-style writers that hash a stream while copying it
/// somewhere else (the store's upload path).
pub struct ContentHasher {
    inner: blake3::Hasher,
}

impl ContentHasher {
    /// Create an empty incremental hasher.
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Feed a chunk of content into the digest.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Consume the hasher and produce the content hash.
    pub fn finalize(self) -> ContentHash {
        ContentHash::from_digest(*self.inner.finalize().as_bytes())
    }

    /// Hash a complete byte slice.
    pub fn hash_bytes(data: &[u8]) -> ContentHash {
        ContentHash::from_digest(*blake3::hash(data).as_bytes())
    }

    /// Hash a file by streaming its contents.
    ///
    /// Never loads the whole file; reads in fixed-size chunks.
    pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
        let mut file = File::open(path)?;
        let mut hasher = Self::new();
        let mut buf = [0u8; HASH_BUF_SIZE];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(hasher.finalize())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
