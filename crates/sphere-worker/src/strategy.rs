//! Cache-first and network-first strategies.

use std::sync::Arc;

use sphere_cache::{BucketKind, CacheStatus, CacheStore};
use sphere_core::{FetchRequest, FetchResponse, RevalidatePolicy};
use sphere_fetch::Fetcher;
use tokio::task::JoinHandle;

use crate::error::WorkerError;
use crate::event::ServedResponse;

/// Serve from `kind`'s bucket when present, otherwise from the network.
///
/// A network `200` is stored for next time. A network failure with nothing
/// cached is returned as an error; there is no fallback content. On a hit with
/// `RevalidatePolicy::Background`, the response is marked `Stale` and a refresh
/// runs in a spawned task attached to it.
pub async fn cache_first(
    store: &CacheStore,
    fetcher: &Arc<dyn Fetcher>,
    kind: BucketKind,
    request: &FetchRequest,
    revalidate: RevalidatePolicy,
) -> Result<ServedResponse, WorkerError> {
    let key = request.url();

    if let Some(response) = store.lookup(kind, &key).await? {
        tracing::debug!(request_id = %request.request_id, url = %key, bucket = %kind, "cache hit");

        if revalidate == RevalidatePolicy::Never {
            return Ok(ServedResponse::new(response, CacheStatus::Hit, kind));
        }

        let mut served = ServedResponse::new(response, CacheStatus::Stale, kind);
        served.refresh = Some(spawn_refresh(
            store.clone(),
            Arc::clone(fetcher),
            kind,
            request.clone(),
        ));
        return Ok(served);
    }

    tracing::debug!(request_id = %request.request_id, url = %key, bucket = %kind, "cache miss");

    let response = fetcher.fetch(request).await?;
    if response.is_ok() {
        write_through(store, kind, &key, &response).await;
    }

    Ok(ServedResponse::new(response, CacheStatus::Miss, kind))
}

/// Serve from the network, storing `200`s in the API bucket.
///
/// On network failure the API bucket is consulted; `None` means there is
/// nothing to serve.
pub async fn network_first(
    store: &CacheStore,
    fetcher: &Arc<dyn Fetcher>,
    request: &FetchRequest,
) -> Result<Option<ServedResponse>, WorkerError> {
    let key = request.url();

    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_ok() {
                write_through(store, BucketKind::Api, &key, &response).await;
            }
            Ok(Some(ServedResponse::new(
                response,
                CacheStatus::Network,
                BucketKind::Api,
            )))
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request.request_id,
                url = %key,
                error = %err,
                "network failed, falling back to cache"
            );

            let cached = store.lookup(BucketKind::Api, &key).await?;
            Ok(cached.map(|response| {
                ServedResponse::new(response, CacheStatus::Fallback, BucketKind::Api)
            }))
        }
    }
}

fn spawn_refresh(
    store: CacheStore,
    fetcher: Arc<dyn Fetcher>,
    kind: BucketKind,
    request: FetchRequest,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let key = request.url();
        match fetcher.fetch(&request).await {
            Ok(response) if response.is_ok() => {
                write_through(&store, kind, &key, &response).await;
                tracing::debug!(url = %key, bucket = %kind, "refreshed cached entry");
            }
            Ok(response) => {
                tracing::debug!(url = %key, status = %response.status, "refresh skipped");
            }
            Err(err) => {
                tracing::debug!(url = %key, error = %err, "refresh failed");
            }
        }
    })
}

// Write failures never fail the response being served.
async fn write_through(store: &CacheStore, kind: BucketKind, key: &str, response: &FetchResponse) {
    if let Err(err) = store.store(kind, key, response).await {
        tracing::warn!(url = %key, bucket = %kind, error = %err, "failed to write cache entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sphere_cache::{CacheBackend, CacheError, CacheResult, CachedResponse, MemoryBackend};
    use sphere_core::BucketNames;
    use sphere_fetch::MockFetcher;

    /// Backend that can be read but never written.
    struct ReadOnlyBackend(MemoryBackend);

    #[async_trait]
    impl CacheBackend for ReadOnlyBackend {
        async fn get(&self, bucket: &str, key: &str) -> CacheResult<Option<CachedResponse>> {
            self.0.get(bucket, key).await
        }

        async fn put(&self, _bucket: &str, _key: &str, _entry: CachedResponse) -> CacheResult<()> {
            Err(CacheError::Storage("read-only".to_string()))
        }

        async fn delete(&self, bucket: &str, key: &str) -> CacheResult<bool> {
            self.0.delete(bucket, key).await
        }

        async fn keys(&self, bucket: &str) -> CacheResult<Vec<String>> {
            self.0.keys(bucket).await
        }

        async fn buckets(&self) -> CacheResult<Vec<String>> {
            self.0.buckets().await
        }

        async fn drop_bucket(&self, bucket: &str) -> CacheResult<bool> {
            self.0.drop_bucket(bucket).await
        }
    }

    const FEED: &str = "https://wallsphere.example/api/assets/wallpapers";

    #[tokio::test]
    async fn test_write_failure_still_serves_network_response() {
        let store = CacheStore::new(
            Arc::new(ReadOnlyBackend(MemoryBackend::new())),
            BucketNames::default(),
        );
        let mock = Arc::new(MockFetcher::new());
        mock.respond(FEED, FetchResponse::ok("[]"));
        let fetcher: Arc<dyn Fetcher> = mock;

        let request = FetchRequest::get(FEED).unwrap();
        let served = network_first(&store, &fetcher, &request).await.unwrap().unwrap();

        assert_eq!(served.status, CacheStatus::Network);
        assert_eq!(served.response.text(), "[]");
    }

    #[tokio::test]
    async fn test_cache_first_miss_then_hit() {
        let store = CacheStore::in_memory(BucketNames::default());
        let mock = Arc::new(MockFetcher::new());
        mock.respond(FEED, FetchResponse::ok("v1"));
        let fetcher: Arc<dyn Fetcher> = mock.clone();
        let request = FetchRequest::get(FEED).unwrap();

        let miss = cache_first(&store, &fetcher, BucketKind::Image, &request, RevalidatePolicy::Never)
            .await
            .unwrap();
        assert_eq!(miss.status, CacheStatus::Miss);

        mock.go_offline();
        let hit = cache_first(&store, &fetcher, BucketKind::Image, &request, RevalidatePolicy::Never)
            .await
            .unwrap();
        assert_eq!(hit.status, CacheStatus::Hit);
        assert_eq!(hit.response.text(), "v1");
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_background_revalidation_marks_hit_stale() {
        let store = CacheStore::in_memory(BucketNames::default());
        store
            .store(BucketKind::Static, FEED, &FetchResponse::ok("v1"))
            .await
            .unwrap();
        let mock = Arc::new(MockFetcher::new());
        mock.respond(FEED, FetchResponse::ok("v2"));
        let fetcher: Arc<dyn Fetcher> = mock;
        let request = FetchRequest::get(FEED).unwrap();

        let mut served =
            cache_first(&store, &fetcher, BucketKind::Static, &request, RevalidatePolicy::Background)
                .await
                .unwrap();
        assert_eq!(served.status, CacheStatus::Stale);
        assert!(served.has_pending_refresh());
        assert_eq!(served.response.text(), "v1");

        served.settle().await;
        let stored = store.lookup(BucketKind::Static, FEED).await.unwrap().unwrap();
        assert_eq!(stored.text(), "v2");
    }

    #[tokio::test]
    async fn test_network_first_prefers_fresh_response() {
        let store = CacheStore::in_memory(BucketNames::default());
        store
            .store(BucketKind::Api, FEED, &FetchResponse::ok("old"))
            .await
            .unwrap();

        let mock = Arc::new(MockFetcher::new());
        mock.respond(FEED, FetchResponse::ok("new"));
        let fetcher: Arc<dyn Fetcher> = mock;

        let request = FetchRequest::get(FEED).unwrap();
        let served = network_first(&store, &fetcher, &request).await.unwrap().unwrap();
        assert_eq!(served.response.text(), "new");

        let stored = store.lookup(BucketKind::Api, FEED).await.unwrap().unwrap();
        assert_eq!(stored.text(), "new");
    }
}
