//! Cache manager modelled on a browser service worker.
//!
//! This crate provides:
//! - `ServiceWorker` - Lifecycle plus event dispatch (install, activate, fetch)
//! - `Route` / `classify` - Which strategy handles a request
//! - `cache_first` / `network_first` - The two caching strategies
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sphere_cache::MemoryBackend;
//! use sphere_core::{FetchRequest, WorkerConfig};
//! use sphere_fetch::{FetchSettings, HttpFetcher};
//! use sphere_worker::{ServiceWorker, WorkerEvent};
//!
//! let worker = ServiceWorker::new(
//!     WorkerConfig::new("https://wallsphere.example"),
//!     Arc::new(MemoryBackend::new()),
//!     Arc::new(HttpFetcher::new(&FetchSettings::default())?),
//! )?;
//!
//! worker.dispatch(WorkerEvent::Install).await?;
//! worker.dispatch(WorkerEvent::Activate).await?;
//! let outcome = worker
//!     .dispatch(WorkerEvent::Fetch(FetchRequest::get("https://wallsphere.example/api/assets/wallpapers")?))
//!     .await?;
//! ```

mod error;
mod event;
mod router;
mod strategy;
mod worker;

pub use error::*;
pub use event::*;
pub use router::*;
pub use strategy::*;
pub use worker::*;
