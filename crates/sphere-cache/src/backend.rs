//! Cache storage backends.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::entry::CachedResponse;
use crate::error::{CacheError, CacheResult};

/// Storage for named buckets of cached responses keyed by request URL.
///
/// Writes to the same key are last-writer-wins.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Look up an entry.
    async fn get(&self, bucket: &str, key: &str) -> CacheResult<Option<CachedResponse>>;

    /// Store an entry, replacing any previous one. Creates the bucket on demand.
    async fn put(&self, bucket: &str, key: &str, entry: CachedResponse) -> CacheResult<()>;

    /// Delete an entry. Returns whether it existed.
    async fn delete(&self, bucket: &str, key: &str) -> CacheResult<bool>;

    /// Keys held in a bucket, sorted.
    async fn keys(&self, bucket: &str) -> CacheResult<Vec<String>>;

    /// Names of existing buckets, sorted.
    async fn buckets(&self) -> CacheResult<Vec<String>>;

    /// Remove a bucket and all its entries. Returns whether it existed.
    async fn drop_bucket(&self, bucket: &str) -> CacheResult<bool>;
}

type Buckets = HashMap<String, HashMap<String, CachedResponse>>;

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    buckets: RwLock<Buckets>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CacheResult<std::sync::RwLockReadGuard<'_, Buckets>> {
        self.buckets
            .read()
            .map_err(|_| CacheError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> CacheResult<std::sync::RwLockWriteGuard<'_, Buckets>> {
        self.buckets
            .write()
            .map_err(|_| CacheError::Storage("lock poisoned".to_string()))
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, bucket: &str, key: &str) -> CacheResult<Option<CachedResponse>> {
        let buckets = self.read()?;
        Ok(buckets.get(bucket).and_then(|b| b.get(key)).cloned())
    }

    async fn put(&self, bucket: &str, key: &str, entry: CachedResponse) -> CacheResult<()> {
        let mut buckets = self.write()?;
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> CacheResult<bool> {
        let mut buckets = self.write()?;
        Ok(buckets
            .get_mut(bucket)
            .map(|b| b.remove(key).is_some())
            .unwrap_or(false))
    }

    async fn keys(&self, bucket: &str) -> CacheResult<Vec<String>> {
        let buckets = self.read()?;
        let mut keys: Vec<String> = buckets
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }

    async fn buckets(&self) -> CacheResult<Vec<String>> {
        let buckets = self.read()?;
        let mut names: Vec<String> = buckets.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn drop_bucket(&self, bucket: &str) -> CacheResult<bool> {
        let mut buckets = self.write()?;
        Ok(buckets.remove(bucket).is_some())
    }
}
