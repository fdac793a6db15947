//! Transport settings for outbound fetches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the HTTP fetcher.
///
/// The worker itself enforces no timeout; this is the transport's own limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Total request timeout in milliseconds. `None` disables it.
    pub timeout_ms: Option<u64>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_ms: Some(30_000),
            user_agent: format!("wallsphere-worker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchSettings {
    /// Timeout as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
