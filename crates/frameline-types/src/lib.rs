//! Foundation types for Frameline.
//!
//! This crate provides the core identity and record types shared by every
//! other Frameline crate: the content-addressed photo digest, the inventory
//! record exchanged between store and replicas, and the rules for which
//! files count as photos at all.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Content-addressed photo identifier (BLAKE3 hash)
//! - [`PhotoRecord`] — Inventory entry: hash, display filename, last update
//! - [`is_photo_path`] — Eligibility check applied by every directory scan

pub mod error;
pub mod hash;
pub mod photo;
pub mod record;

pub use error::TypeError;
pub use hash::ContentHash;
pub use photo::{is_photo_path, PHOTO_EXTENSIONS, TMP_PREFIX};
pub use record::PhotoRecord;
