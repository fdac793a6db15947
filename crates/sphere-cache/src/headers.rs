//! Cache status and debugging headers.

use http::header::HeaderValue;
use serde::{Deserialize, Serialize};
use sphere_core::FetchResponse;

/// Header names for cache debugging.
pub mod header_names {
    /// How the response was produced (HIT, STALE, MISS, NETWORK, FALLBACK).
    pub const X_CACHE_STATUS: &str = "x-cache-status";
    /// Bucket the response was read from or written to.
    pub const X_CACHE_BUCKET: &str = "x-cache-bucket";
}

/// How a served response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Cache-first: served from the bucket.
    Hit,
    /// Cache-first: served from the bucket while a refresh is in flight.
    Stale,
    /// Cache-first: nothing cached, served from the network.
    Miss,
    /// Network-first: served from the network.
    Network,
    /// Network-first: network failed, served from the bucket.
    Fallback,
}

impl CacheStatus {
    /// Header value for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Stale => "STALE",
            Self::Miss => "MISS",
            Self::Network => "NETWORK",
            Self::Fallback => "FALLBACK",
        }
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attach explain headers to a served response.
///
/// Bucket names that are not valid header values are left out.
pub fn annotate(response: &mut FetchResponse, status: CacheStatus, bucket: &str) {
    response.headers.insert(
        header_names::X_CACHE_STATUS,
        HeaderValue::from_static(status.as_str()),
    );

    if let Ok(value) = HeaderValue::from_str(bucket) {
        response.headers.insert(header_names::X_CACHE_BUCKET, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_sets_headers() {
        let mut response = FetchResponse::ok("x");
        annotate(&mut response, CacheStatus::Fallback, "wallsphere-api-v1");

        assert_eq!(response.headers[header_names::X_CACHE_STATUS], "FALLBACK");
        assert_eq!(response.headers[header_names::X_CACHE_BUCKET], "wallsphere-api-v1");
    }

    #[test]
    fn test_every_status_has_a_header_value() {
        let expected = [
            (CacheStatus::Hit, "HIT"),
            (CacheStatus::Stale, "STALE"),
            (CacheStatus::Miss, "MISS"),
            (CacheStatus::Network, "NETWORK"),
            (CacheStatus::Fallback, "FALLBACK"),
        ];

        for (status, value) in expected {
            let mut response = FetchResponse::ok("");
            annotate(&mut response, status, "b");
            assert_eq!(response.headers[header_names::X_CACHE_STATUS], value);
            assert_eq!(status.to_string(), value);
        }
    }
}
