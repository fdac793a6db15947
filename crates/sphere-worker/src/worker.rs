//! Worker lifecycle and event dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use http::Method;
use sphere_cache::{annotate, BucketKind, CacheBackend, CacheStore};
use sphere_core::{FetchRequest, WorkerConfig, WorkerState};
use sphere_fetch::Fetcher;

use crate::error::WorkerError;
use crate::event::{EventKind, EventOutcome, FailedAsset, FetchOutcome, InstallReport, WorkerEvent};
use crate::router::{classify, Route};
use crate::strategy::{cache_first, network_first};

/// Cache manager driven by install, activate and fetch events.
pub struct ServiceWorker {
    config: WorkerConfig,
    store: CacheStore,
    fetcher: Arc<dyn Fetcher>,
    state: Mutex<WorkerState>,
    claimed: AtomicBool,
}

impl ServiceWorker {
    /// Create a worker in the `Installing` state.
    pub fn new(
        config: WorkerConfig,
        backend: Arc<dyn CacheBackend>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, WorkerError> {
        config.validate()?;
        let store = CacheStore::new(backend, config.buckets.clone());

        Ok(Self {
            config,
            store,
            fetcher,
            state: Mutex::new(WorkerState::Installing),
            claimed: AtomicBool::new(false),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state.lock().map(|s| *s).unwrap_or_default()
    }

    /// Whether the worker controls open clients.
    pub fn claims_clients(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// The worker's configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// The cache store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Handle an event from the host.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<EventOutcome, WorkerError> {
        tracing::trace!(event = %event.kind(), state = %self.state(), "dispatch");

        match event {
            WorkerEvent::Install => self.install().await.map(EventOutcome::Installed),
            WorkerEvent::Activate => self.activate().map(|()| EventOutcome::Activated),
            WorkerEvent::Fetch(request) => self.fetch(&request).await.map(EventOutcome::Fetch),
        }
    }

    /// Precache every static asset.
    ///
    /// Individual failures are logged and reported but do not fail the install.
    pub async fn install(&self) -> Result<InstallReport, WorkerError> {
        self.expect_state(EventKind::Install, WorkerState::Installing)?;

        let urls = self
            .config
            .static_assets
            .iter()
            .map(|path| self.config.asset_url(path))
            .collect::<Result<Vec<_>, _>>()?;

        let results = join_all(urls.into_iter().map(|uri| async move {
            let request = FetchRequest::new(Method::GET, uri);
            let url = request.url();
            (url, self.precache(&request).await)
        }))
        .await;

        let mut report = InstallReport::default();
        for (url, result) in results {
            match result {
                Ok(()) => report.cached.push(url),
                Err(reason) => {
                    tracing::warn!(%url, %reason, "failed to precache asset");
                    report.failed.push(FailedAsset { url, reason });
                }
            }
        }

        self.advance();
        tracing::info!(
            cached = report.cached.len(),
            failed = report.failed.len(),
            "worker installed"
        );

        Ok(report)
    }

    /// Take control of clients immediately.
    pub fn activate(&self) -> Result<(), WorkerError> {
        self.expect_state(EventKind::Activate, WorkerState::Installed)?;
        self.advance();
        self.claimed.store(true, Ordering::Release);
        tracing::info!("worker activated, clients claimed");
        Ok(())
    }

    /// Route a request to its strategy.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, WorkerError> {
        if !self.state().intercepts_fetches() {
            tracing::debug!(url = %request.url(), state = %self.state(), "not active, passing through");
            return Ok(FetchOutcome::Passthrough);
        }

        let served = match classify(&self.config, request) {
            Route::Passthrough => return Ok(FetchOutcome::Passthrough),
            Route::CacheFirst(kind) => Some(
                cache_first(&self.store, &self.fetcher, kind, request, self.config.revalidate)
                    .await?,
            ),
            Route::NetworkFirst => network_first(&self.store, &self.fetcher, request).await?,
        };

        let Some(mut served) = served else {
            tracing::debug!(url = %request.url(), "no network and nothing cached");
            return Ok(FetchOutcome::Empty);
        };

        if self.config.explain_headers {
            let bucket = self.store.bucket_name(served.bucket).to_string();
            annotate(&mut served.response, served.status, &bucket);
        }

        Ok(FetchOutcome::Served(served))
    }

    async fn precache(&self, request: &FetchRequest) -> Result<(), String> {
        let response = self
            .fetcher
            .fetch(request)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("HTTP {}", response.status));
        }

        self.store
            .store(BucketKind::Static, &request.url(), &response)
            .await
            .map_err(|e| e.to_string())
    }

    fn expect_state(&self, event: EventKind, expected: WorkerState) -> Result<(), WorkerError> {
        let state = self.state();
        if state != expected {
            return Err(WorkerError::InvalidTransition { event, state });
        }
        Ok(())
    }

    fn advance(&self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(next) = state.next() {
                *state = next;
            }
        }
    }
}

impl std::fmt::Debug for ServiceWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceWorker")
            .field("state", &self.state())
            .field("claimed", &self.claims_clients())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_cache::MemoryBackend;
    use sphere_core::FetchResponse;
    use sphere_fetch::MockFetcher;

    const ORIGIN: &str = "https://wallsphere.example";

    fn worker(mock: Arc<MockFetcher>) -> ServiceWorker {
        let config = WorkerConfig::new(ORIGIN).with_static_assets(["/", "/static/style.css"]);
        ServiceWorker::new(config, Arc::new(MemoryBackend::new()), mock).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = WorkerConfig::new("not a url");
        let result = ServiceWorker::new(
            config,
            Arc::new(MemoryBackend::new()),
            Arc::new(MockFetcher::new()),
        );
        assert!(matches!(result, Err(WorkerError::Config(_))));
    }

    #[tokio::test]
    async fn test_lifecycle_order() {
        let mock = Arc::new(MockFetcher::new());
        let worker = worker(mock);
        assert_eq!(worker.state(), WorkerState::Installing);

        let err = worker.activate().unwrap_err();
        assert!(matches!(
            err,
            WorkerError::InvalidTransition {
                event: EventKind::Activate,
                state: WorkerState::Installing
            }
        ));

        worker.install().await.unwrap();
        assert_eq!(worker.state(), WorkerState::Installed);
        assert!(!worker.claims_clients());

        worker.activate().unwrap();
        assert_eq!(worker.state(), WorkerState::Activated);
        assert!(worker.claims_clients());

        assert!(worker.install().await.is_err());
    }

    #[tokio::test]
    async fn test_install_tolerates_failures() {
        let mock = Arc::new(MockFetcher::new());
        mock.respond(&format!("{}/", ORIGIN), FetchResponse::ok("<html>"));
        // /static/style.css has no route and fails

        let worker = worker(mock);
        let report = worker.install().await.unwrap();

        assert_eq!(report.cached, vec![format!("{}/", ORIGIN)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].url, format!("{}/static/style.css", ORIGIN));
        assert!(!report.is_complete());
        assert_eq!(worker.state(), WorkerState::Installed);
    }

    #[tokio::test]
    async fn test_install_skips_error_statuses() {
        let mock = Arc::new(MockFetcher::new());
        mock.respond(&format!("{}/", ORIGIN), FetchResponse::ok("<html>"));
        mock.respond(
            &format!("{}/static/style.css", ORIGIN),
            FetchResponse::new(http::StatusCode::NOT_FOUND),
        );

        let worker = worker(mock);
        let report = worker.install().await.unwrap();

        assert_eq!(report.failed[0].reason, "HTTP 404 Not Found");
        let keys = worker.store().keys(BucketKind::Static).await.unwrap();
        assert_eq!(keys, vec![format!("{}/", ORIGIN)]);
    }

    #[tokio::test]
    async fn test_fetch_before_activation_passes_through() {
        let mock = Arc::new(MockFetcher::new());
        let worker = worker(mock.clone());

        let request = FetchRequest::get(&format!("{}/api/assets/wallpapers", ORIGIN)).unwrap();
        let outcome = worker.fetch(&request).await.unwrap();

        assert!(outcome.is_passthrough());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_kind() {
        let mock = Arc::new(MockFetcher::new());
        mock.respond(&format!("{}/", ORIGIN), FetchResponse::ok("<html>"));
        mock.respond(&format!("{}/static/style.css", ORIGIN), FetchResponse::ok("body{}"));
        let worker = worker(mock);

        let outcome = worker.dispatch(WorkerEvent::Install).await.unwrap();
        assert!(matches!(outcome, EventOutcome::Installed(ref r) if r.is_complete()));

        let outcome = worker.dispatch(WorkerEvent::Activate).await.unwrap();
        assert!(matches!(outcome, EventOutcome::Activated));

        let request = FetchRequest::get(&format!("{}/about", ORIGIN)).unwrap();
        let outcome = worker.dispatch(WorkerEvent::Fetch(request)).await.unwrap();
        assert!(matches!(outcome, EventOutcome::Fetch(FetchOutcome::Passthrough)));
    }
}
