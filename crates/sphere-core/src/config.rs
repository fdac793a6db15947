//! Worker configuration: bucket names, precache list and route conventions.

use http::Uri;
use serde::{Deserialize, Serialize};

use crate::context::parse_absolute;

/// Errors in a worker configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("origin must be an absolute URL, got '{0}'")]
    InvalidOrigin(String),

    #[error("origin must not carry a path, query or fragment, got '{0}'")]
    OriginHasPath(String),

    #[error("static asset path must start with '/' and carry no query or fragment, got '{0}'")]
    InvalidAssetPath(String),

    #[error("bucket names must be distinct and non-empty")]
    InvalidBucketNames,
}

/// Names of the three cache buckets.
///
/// Changing a name retires the old bucket; the version suffix exists for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketNames {
    /// Bucket for precached static assets.
    pub static_assets: String,
    /// Bucket for images.
    pub images: String,
    /// Bucket for API responses.
    pub api: String,
}

impl Default for BucketNames {
    fn default() -> Self {
        Self {
            static_assets: "wallsphere-static-v1".to_string(),
            images: "wallsphere-images-v1".to_string(),
            api: "wallsphere-api-v1".to_string(),
        }
    }
}

impl BucketNames {
    /// All bucket names, static first.
    pub fn all(&self) -> [&str; 3] {
        [&self.static_assets, &self.images, &self.api]
    }
}

/// Path conventions that classify requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConventions {
    /// Path prefixes of API routes.
    pub api_prefixes: Vec<String>,
    /// Path prefixes that always serve images (uploads, avatars).
    pub image_prefixes: Vec<String>,
    /// File extensions treated as images, lowercase and without the dot.
    pub image_extensions: Vec<String>,
}

impl Default for RouteConventions {
    fn default() -> Self {
        Self {
            api_prefixes: vec!["/api/".to_string()],
            image_prefixes: vec!["/uploads/".to_string(), "/static/avatars/".to_string()],
            image_extensions: ["png", "jpg", "jpeg", "gif", "webp", "avif", "svg", "ico"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl RouteConventions {
    /// Check if a path is an API route.
    pub fn is_api_path(&self, path: &str) -> bool {
        self.api_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// Check if a path names an image by prefix or extension.
    pub fn is_image_path(&self, path: &str) -> bool {
        if self.image_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return true;
        }

        let file = path.rsplit('/').next().unwrap_or_default();
        match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.image_extensions.iter().any(|e| *e == ext)
            }
            _ => false,
        }
    }
}

/// Whether a cache-first hit also refreshes the entry from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevalidatePolicy {
    /// Serve the cached copy and refresh it in the background.
    #[default]
    Background,
    /// Serve the cached copy and leave it untouched.
    Never,
}

/// Configuration for a cache worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Site origin that static asset paths are resolved against.
    pub origin: String,
    /// Cache bucket names.
    pub buckets: BucketNames,
    /// Paths fetched and cached at install time.
    pub static_assets: Vec<String>,
    /// Request classification rules.
    pub routes: RouteConventions,
    /// Cache-first refresh behavior.
    pub revalidate: RevalidatePolicy,
    /// Attach `X-Cache-*` headers to served responses.
    pub explain_headers: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5000".to_string(),
            buckets: BucketNames::default(),
            static_assets: default_static_assets(),
            routes: RouteConventions::default(),
            revalidate: RevalidatePolicy::default(),
            explain_headers: false,
        }
    }
}

fn default_static_assets() -> Vec<String> {
    [
        "/",
        "/static/style.css",
        "/static/script.js",
        "/static/manifest.json",
        "/static/sitemap.xsl",
        "/static/favicon.ico",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl WorkerConfig {
    /// Create a configuration for the given origin.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    /// Replace the precache list.
    pub fn with_static_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_assets = assets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cache-first refresh behavior.
    pub fn with_revalidate(mut self, policy: RevalidatePolicy) -> Self {
        self.revalidate = policy;
        self
    }

    /// Enable or disable explain headers.
    pub fn with_explain_headers(mut self, enabled: bool) -> Self {
        self.explain_headers = enabled;
        self
    }

    /// Set the bucket names.
    pub fn with_buckets(mut self, buckets: BucketNames) -> Self {
        self.buckets = buckets;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = parse_absolute(&self.origin)
            .map_err(|_| ConfigError::InvalidOrigin(self.origin.clone()))?;

        // Fetches are matched on their path alone, so the origin must be a bare
        // host and asset paths must be plain paths.
        if origin.path() != "/" || origin.query().is_some() || self.origin.contains('#') {
            return Err(ConfigError::OriginHasPath(self.origin.clone()));
        }

        if let Some(bad) = self.static_assets.iter().find(|a| !is_plain_path(a)) {
            return Err(ConfigError::InvalidAssetPath(bad.clone()));
        }

        let [s, i, a] = self.buckets.all();
        if s.is_empty() || i.is_empty() || a.is_empty() || s == i || s == a || i == a {
            return Err(ConfigError::InvalidBucketNames);
        }

        Ok(())
    }

    /// Resolve a static asset path against the origin.
    pub fn asset_url(&self, path: &str) -> Result<Uri, ConfigError> {
        if !is_plain_path(path) {
            return Err(ConfigError::InvalidAssetPath(path.to_string()));
        }

        let url = format!("{}{}", self.origin.trim_end_matches('/'), path);
        parse_absolute(&url).map_err(|_| ConfigError::InvalidOrigin(self.origin.clone()))
    }

    /// Check if a request path is one of the precached assets.
    pub fn is_static_asset(&self, path: &str) -> bool {
        self.static_assets.iter().any(|a| a == path)
    }
}

fn is_plain_path(path: &str) -> bool {
    path.starts_with('/') && !path.contains(['?', '#'])
}
