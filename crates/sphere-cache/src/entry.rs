//! Stored form of a cached response.

use chrono::{DateTime, Utc};
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use sphere_core::FetchResponse;

use crate::error::CacheError;

/// A response as held in a cache bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Header name/value pairs in received order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    #[serde(with = "body_base64")]
    pub body: Vec<u8>,
    /// When the entry was written (unix seconds).
    pub stored_at: i64,
}

impl CachedResponse {
    /// Capture a response for storage.
    ///
    /// Headers whose values are not valid UTF-8 are dropped.
    pub fn from_response(response: &FetchResponse) -> Self {
        let headers = response
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            status: response.status.as_u16(),
            headers,
            body: response.body.clone(),
            stored_at: Utc::now().timestamp(),
        }
    }

    /// Rebuild the response.
    pub fn to_response(&self) -> Result<FetchResponse, CacheError> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|_| CacheError::Corrupt(format!("status {}", self.status)))?;

        let mut response = FetchResponse::new(status).with_body(self.body.clone());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| CacheError::Corrupt(format!("header name '{}'", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| CacheError::Corrupt(format!("header value for '{}'", name)))?;
            response.headers.append(name, value);
        }

        Ok(response)
    }

    /// Time the entry was written.
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.stored_at, 0)
    }

    /// Age in seconds.
    pub fn age_secs(&self) -> u64 {
        let now = Utc::now().timestamp();
        now.saturating_sub(self.stored_at).max(0) as u64
    }
}

mod body_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_capture_and_rebuild() {
        let response = FetchResponse::ok(vec![0u8, 159, 146, 150])
            .with_header(CONTENT_TYPE, HeaderValue::from_static("image/png"));

        let cached = CachedResponse::from_response(&response);
        assert_eq!(cached.status, 200);
        assert_eq!(
            cached.headers,
            vec![("content-type".to_string(), "image/png".to_string())]
        );

        let rebuilt = cached.to_response().unwrap();
        assert_eq!(rebuilt, response);
    }

    #[test]
    fn test_body_serialized_as_base64() {
        let cached = CachedResponse {
            status: 200,
            headers: Vec::new(),
            body: b"hi".to_vec(),
            stored_at: 0,
        };

        let json = serde_json::to_value(&cached).unwrap();
        assert_eq!(json["body"], "aGk=");

        let back: CachedResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back.body, b"hi");
    }

    #[test]
    fn test_invalid_status_is_corrupt() {
        let cached = CachedResponse {
            status: 1000,
            headers: Vec::new(),
            body: Vec::new(),
            stored_at: 0,
        };
        assert!(matches!(cached.to_response(), Err(CacheError::Corrupt(_))));
    }

    #[test]
    fn test_stored_at_is_recent() {
        let cached = CachedResponse::from_response(&FetchResponse::ok("x"));
        assert!(cached.stored_at().is_some());
        assert!(cached.age_secs() < 5);
    }
}
