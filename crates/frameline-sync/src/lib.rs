//! Replica synchronization for Frameline.
//!
//! Drives a local photo directory toward matching a remote authoritative
//! inventory. Each cycle fetches the remote record list, re-hashes the local
//! directory from scratch, deletes local photos no longer advertised, then
//! downloads photos missing locally, in that order, with at most one cycle
//! in flight at a time. Connection failures grow an exponential retry
//! backoff; per-item failures are collected and never abort the batch.

pub mod backoff;
pub mod engine;
pub mod error;
pub mod http;
pub mod report;
pub mod transport;

pub use backoff::Backoff;
pub use engine::{SyncConfig, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use http::HttpInventory;
pub use report::{ItemAction, ItemFailure, SyncReport};
pub use transport::RemoteInventory;
