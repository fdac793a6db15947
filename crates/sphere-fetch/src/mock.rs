//! Scripted fetcher.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sphere_core::{FetchRequest, FetchResponse};

use crate::client::{FetchError, Fetcher};

#[derive(Debug, Clone)]
enum Route {
    Respond(FetchResponse),
    Fail(FetchError),
}

/// Fetcher that answers from a table of URLs.
///
/// Unknown URLs fail with a connection error, as if the host were offline.
/// Every call is recorded, including failed ones.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a fetcher with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `response` from now on.
    pub fn respond(&self, url: &str, response: FetchResponse) {
        self.set(url, Route::Respond(response));
    }

    /// Fail requests for `url` from now on.
    pub fn fail(&self, url: &str) {
        self.set(url, Route::Fail(FetchError::Connection(format!("{} unreachable", url))));
    }

    /// Fail every known and unknown URL from now on.
    pub fn go_offline(&self) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.clear();
        }
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests made for `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| *c == url).count()
    }

    fn set(&self, url: &str, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(url.to_string(), route);
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let url = request.url();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.clone());
        }

        let route = self
            .routes
            .lock()
            .map_err(|_| FetchError::Request("mock poisoned".to_string()))?
            .get(&url)
            .cloned();

        match route {
            Some(Route::Respond(response)) => Ok(response),
            Some(Route::Fail(err)) => Err(err),
            None => Err(FetchError::Connection(format!("no route to {}", url))),
        }
    }
}
