use frameline_types::ContentHash;

/// Outcome of one sync cycle: counts of applied changes plus every per-item
/// failure. One failed item never short-circuits the batch; it lands here
/// instead.
#[derive(Clone, Debug, Default)]
pub struct SyncReport {
    pub deleted: usize,
    pub downloaded: usize,
    pub failures: Vec<ItemFailure>,
}

impl SyncReport {
    /// Returns `true` if the cycle changed the local directory.
    pub fn changed(&self) -> bool {
        self.deleted + self.downloaded > 0
    }
}

/// A single item that failed during a cycle.
#[derive(Clone, Debug)]
pub struct ItemFailure {
    pub hash: ContentHash,
    pub action: ItemAction,
    pub reason: String,
}

/// Which half of reconciliation an item failure occurred in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemAction {
    Delete,
    Download,
}
