//! Network access for the cache worker.
//!
//! This crate provides:
//! - `Fetcher` - The network seam the worker calls through
//! - `HttpFetcher` - Real HTTP client
//! - `MockFetcher` - Scripted responses for tests and offline runs
//! - `FetchSettings` - Transport configuration

mod client;
mod mock;
mod settings;

pub use client::*;
pub use mock::*;
pub use settings::*;
