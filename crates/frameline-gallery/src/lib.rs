//! In-memory photo working set for Frameline replicas.
//!
//! Mirrors a local directory's eligible image files as a path-keyed,
//! cursor-addressed sequence of decoded photos, safe for concurrent reads
//! from a presentation consumer while background loaders and watchers mutate
//! it. Two feeding modes:
//!
//! - **Batch**: [`bulk_load`] decodes a whole directory through a
//!   bounded-concurrency pool, typically triggered by a sync cycle's
//!   completion callback.
//! - **Streaming**: [`GalleryWatcher`] subscribes to filesystem change
//!   notifications and applies incremental inserts/removals as files appear
//!   and disappear.

pub mod config;
pub mod error;
pub mod gallery;
pub mod loader;
pub mod watcher;

pub use config::GalleryConfig;
pub use error::{GalleryError, GalleryResult};
pub use gallery::{Gallery, PhotoEntry};
pub use loader::{bulk_load, load_photo};
pub use watcher::GalleryWatcher;
