//! Core abstractions shared by the Wallsphere crates.
//!
//! This crate provides the fundamental types:
//! - `WorkerConfig` - Bucket names, precache list and route conventions
//! - `FetchRequest` / `FetchResponse` - Messages exchanged with the worker
//! - `WorkerState` - Worker lifecycle tracking

mod config;
mod context;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use lifecycle::*;
