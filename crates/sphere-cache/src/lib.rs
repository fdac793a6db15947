//! Response caching for the Wallsphere cache worker.
//!
//! This crate provides:
//! - `CacheBackend` - Storage trait for named buckets of responses
//! - `MemoryBackend` / `DiskBackend` - In-process and on-disk storage
//! - `CacheStore` - Bucket-aware handle injected into the worker
//! - `CacheStatus` - How a response was produced, with explain headers
//!
//! # Example
//!
//! ```ignore
//! use sphere_cache::{BucketKind, CacheStore};
//! use sphere_core::{BucketNames, FetchResponse};
//!
//! let store = CacheStore::in_memory(BucketNames::default());
//! store.store(BucketKind::Api, "https://example.com/api/assets", &FetchResponse::ok("[]")).await?;
//! let cached = store.lookup(BucketKind::Api, "https://example.com/api/assets").await?;
//! ```

mod backend;
mod disk;
mod entry;
mod error;
mod headers;
mod store;

pub use backend::*;
pub use disk::*;
pub use entry::*;
pub use error::*;
pub use headers::*;
pub use store::*;
