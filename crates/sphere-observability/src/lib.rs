//! Observability for the wallsphere worker and tools.
//!
//! This crate provides:
//! - `LogConfig` / `init` - `tracing-subscriber` setup in human or JSON format
//! - `request_span` - a span carrying a fetch request's identity

mod logging;
mod span;

pub use logging::*;
pub use span::*;
