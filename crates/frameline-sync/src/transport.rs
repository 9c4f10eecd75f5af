use async_trait::async_trait;

use frameline_types::{ContentHash, PhotoRecord};

use crate::error::SyncResult;

/// Transport interface to a remote authoritative photo store.
///
/// The sync engine depends only on this trait, never on a concrete wire
/// protocol. Implementations must map network-level failures to
/// [`SyncError::Connection`](crate::SyncError::Connection) (which drives the
/// retry backoff) and malformed payloads to
/// [`SyncError::Decode`](crate::SyncError::Decode), and must enforce a
/// bounded request timeout so one unresponsive remote cannot stall a cycle.
#[async_trait]
pub trait RemoteInventory: Send + Sync {
    /// Fetch the complete remote inventory.
    async fn fetch_inventory(&self) -> SyncResult<Vec<PhotoRecord>>;

    /// Fetch the content of one photo by hash.
    async fn fetch_photo(&self, hash: &ContentHash) -> SyncResult<Vec<u8>>;
}
