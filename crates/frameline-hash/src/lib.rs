//! Content hashing for Frameline.
//!
//! A single shared primitive: [`ContentHasher`] computes the stable BLAKE3
//! digest that identifies a photo independently of its filename. The store
//! hashes uploads as they stream to disk, replicas hash their local
//! directories to build inventories, and both sides must agree byte-for-byte,
//! so all of them go through this crate.

pub mod hasher;

pub use hasher::ContentHasher;
