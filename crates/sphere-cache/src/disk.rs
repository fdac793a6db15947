//! On-disk backend, one JSON file per bucket.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backend::CacheBackend;
use crate::entry::CachedResponse;
use crate::error::{CacheError, CacheResult};

type BucketFile = BTreeMap<String, CachedResponse>;

/// Persistent backend storing each bucket as `<dir>/<bucket>.json`.
///
/// Survives process restarts so repeated CLI runs see earlier entries.
#[derive(Debug)]
pub struct DiskBackend {
    root: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl DiskBackend {
    /// Open (and create if missing) a cache directory.
    pub async fn open(root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    /// The cache directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> CacheResult<PathBuf> {
        if !is_bucket_name(bucket) {
            return Err(CacheError::InvalidBucket(bucket.to_string()));
        }

        Ok(self.root.join(format!("{}.json", bucket)))
    }

    async fn load(&self, bucket: &str) -> CacheResult<BucketFile> {
        let path = self.bucket_path(bucket)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BucketFile::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, bucket: &str, entries: &BucketFile) -> CacheResult<()> {
        let path = self.bucket_path(bucket)?;
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(entries)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for DiskBackend {
    async fn get(&self, bucket: &str, key: &str) -> CacheResult<Option<CachedResponse>> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(bucket).await?;
        Ok(entries.remove(key))
    }

    async fn put(&self, bucket: &str, key: &str, entry: CachedResponse) -> CacheResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(bucket).await?;
        entries.insert(key.to_string(), entry);
        self.save(bucket, &entries).await
    }

    async fn delete(&self, bucket: &str, key: &str) -> CacheResult<bool> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(bucket).await?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.save(bucket, &entries).await?;
        }
        Ok(existed)
    }

    async fn keys(&self, bucket: &str) -> CacheResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        let entries = self.load(bucket).await?;
        Ok(entries.into_keys().collect())
    }

    async fn buckets(&self) -> CacheResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(item) = dir.next_entry().await? {
            let name = item.file_name();
            // Other files in the directory are not ours to list or drop.
            if let Some(bucket) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                if is_bucket_name(bucket) {
                    names.push(bucket.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn drop_bucket(&self, bucket: &str) -> CacheResult<bool> {
        let _guard = self.lock.lock().await;
        let path = self.bucket_path(bucket)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_bucket_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
