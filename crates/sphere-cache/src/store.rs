//! Bucket-aware cache handle.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sphere_core::{BucketNames, FetchResponse};

use crate::backend::{CacheBackend, MemoryBackend};
use crate::entry::CachedResponse;
use crate::error::CacheResult;

/// The three buckets a worker uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
    /// Precached static assets.
    Static,
    /// Images.
    Image,
    /// API responses.
    Api,
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Image => write!(f, "image"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// Cache storage handle injected into a worker.
///
/// Cloning is cheap and clones share the same backend.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    names: BucketNames,
}

impl CacheStore {
    /// Create a store over a backend.
    pub fn new(backend: Arc<dyn CacheBackend>, names: BucketNames) -> Self {
        Self { backend, names }
    }

    /// Create a store backed by memory.
    pub fn in_memory(names: BucketNames) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), names)
    }

    /// Name of the bucket for a kind.
    pub fn bucket_name(&self, kind: BucketKind) -> &str {
        match kind {
            BucketKind::Static => &self.names.static_assets,
            BucketKind::Image => &self.names.images,
            BucketKind::Api => &self.names.api,
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Look up a cached response by request URL.
    pub async fn lookup(&self, kind: BucketKind, key: &str) -> CacheResult<Option<FetchResponse>> {
        match self.backend.get(self.bucket_name(kind), key).await? {
            Some(entry) => Ok(Some(entry.to_response()?)),
            None => Ok(None),
        }
    }

    /// Store a response under a request URL.
    pub async fn store(&self, kind: BucketKind, key: &str, response: &FetchResponse) -> CacheResult<()> {
        let entry = CachedResponse::from_response(response);
        self.backend.put(self.bucket_name(kind), key, entry).await
    }

    /// Keys held in a bucket.
    pub async fn keys(&self, kind: BucketKind) -> CacheResult<Vec<String>> {
        self.backend.keys(self.bucket_name(kind)).await
    }

    /// Drop every bucket in storage, including retired ones.
    ///
    /// Returns the number of buckets removed.
    pub async fn clear(&self) -> CacheResult<usize> {
        let mut removed = 0;
        for bucket in self.backend.buckets().await? {
            if self.backend.drop_bucket(&bucket).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}
