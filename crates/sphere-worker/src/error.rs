//! Worker error types.

use sphere_cache::CacheError;
use sphere_core::{ConfigError, WorkerState};
use sphere_fetch::FetchError;

use crate::event::EventKind;

/// Errors surfaced by the worker.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("cannot handle {event} while {state}")]
    InvalidTransition { event: EventKind, state: WorkerState },

    #[error("network error: {0}")]
    Network(#[from] FetchError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
