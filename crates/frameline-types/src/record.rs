use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::ContentHash;

/// One inventory entry: a photo known to a store or replica.
///
/// The hash is the primary key; within a single store it uniquely determines
/// file content. The filename is a display name only; it may collide across
/// different hashes and is never used for identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub hash: ContentHash,
    pub filename: String,
    pub updated_at: DateTime<Utc>,
}

impl PhotoRecord {
    pub fn new(hash: ContentHash, filename: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            hash,
            filename: filename.into(),
            updated_at,
        }
    }
}
