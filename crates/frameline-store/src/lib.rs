//! Content-addressed photo storage for Frameline.
//!
//! This crate implements the authoritative, durable side of the system: a
//! directory of photo files fronted by an in-memory index keyed by content
//! hash. Files are stored under their original upload filenames; identity is
//! always the BLAKE3 content hash.
//!
//! # Design Rules
//!
//! 1. The index reflects exactly the eligible files in the base directory.
//!    It is derived state: rebuilt by a full scan at startup, incrementally
//!    maintained afterwards, never persisted separately.
//! 2. Uploads stream to a `tmp-<filename>` sibling while being hashed, then
//!    rename atomically into place. A partially-written file is never
//!    visible under its final name, and the temp file is removed on every
//!    failure path.
//! 3. Reads take a shared lock; mutations take the exclusive lock only for
//!    the map update. File I/O (hashing, streaming writes) happens outside
//!    the exclusive critical section.
//! 4. On delete, if the backing file cannot be removed the index entry is
//!    retained so the index never claims less than the filesystem holds.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::ContentStore;
