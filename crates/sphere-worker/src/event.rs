//! Events delivered by the host and their outcomes.

use std::fmt;

use serde::Serialize;
use sphere_cache::{BucketKind, CacheStatus};
use sphere_core::{FetchRequest, FetchResponse};
use tokio::task::JoinHandle;

/// Kind of a worker event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Install,
    Activate,
    Fetch,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Activate => write!(f, "activate"),
            Self::Fetch => write!(f, "fetch"),
        }
    }
}

/// An event delivered by the host.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Populate the static bucket.
    Install,
    /// Take control of clients.
    Activate,
    /// A request from a controlled page.
    Fetch(FetchRequest),
}

impl WorkerEvent {
    /// The event's kind.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Install => EventKind::Install,
            Self::Activate => EventKind::Activate,
            Self::Fetch(_) => EventKind::Fetch,
        }
    }
}

/// Result of handling an event.
#[derive(Debug)]
pub enum EventOutcome {
    Installed(InstallReport),
    Activated,
    Fetch(FetchOutcome),
}

/// Per-asset results of an install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Asset URLs now in the static bucket.
    pub cached: Vec<String>,
    /// Asset URLs that could not be cached, with the reason.
    pub failed: Vec<FailedAsset>,
}

/// An asset that failed to precache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAsset {
    pub url: String,
    pub reason: String,
}

impl InstallReport {
    /// Whether every asset was cached.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A response served by the worker.
#[derive(Debug)]
pub struct ServedResponse {
    /// The response handed back to the page.
    pub response: FetchResponse,
    /// How it was produced.
    pub status: CacheStatus,
    /// Bucket consulted.
    pub bucket: BucketKind,
    pub(crate) refresh: Option<JoinHandle<()>>,
}

impl ServedResponse {
    pub(crate) fn new(response: FetchResponse, status: CacheStatus, bucket: BucketKind) -> Self {
        Self {
            response,
            status,
            bucket,
            refresh: None,
        }
    }

    /// Whether a background refresh is still attached.
    pub fn has_pending_refresh(&self) -> bool {
        self.refresh.is_some()
    }

    /// Wait for the background refresh, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.refresh.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "background refresh task failed");
            }
        }
    }
}

/// Result of a fetch event.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Not intercepted; the host performs its default network handling.
    Passthrough,
    /// The worker produced a response.
    Served(ServedResponse),
    /// Intercepted, but there is nothing to serve.
    Empty,
}

impl FetchOutcome {
    /// The served response, if any.
    pub fn response(&self) -> Option<&FetchResponse> {
        match self {
            Self::Served(served) => Some(&served.response),
            _ => None,
        }
    }

    /// Consume the outcome and return the served response.
    pub fn into_response(self) -> Option<FetchResponse> {
        match self {
            Self::Served(served) => Some(served.response),
            _ => None,
        }
    }

    /// How the response was produced.
    pub fn status(&self) -> Option<CacheStatus> {
        match self {
            Self::Served(served) => Some(served.status),
            _ => None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough)
    }

    /// Wait for any background work attached to the outcome.
    pub async fn settle(&mut self) {
        if let Self::Served(served) = self {
            served.settle().await;
        }
    }
}
