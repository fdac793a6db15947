//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sphere_core::WorkerConfig;
use sphere_fetch::FetchSettings;
use sphere_observability::LogConfig;

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cache worker configuration.
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Outbound HTTP settings.
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Cache storage location.
    #[serde(default)]
    pub cache: CacheSettings,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Where the on-disk cache lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Cache directory. Relative paths resolve against the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Generate a default sphere.toml config file.
pub fn generate_default_config() -> String {
    r#"# Wallsphere cache worker configuration

[worker]
origin = "http://localhost:5000"
# "background" refreshes cached assets after serving them, "never" leaves them alone
revalidate = "background"
explain_headers = false
static_assets = [
    "/",
    "/static/style.css",
    "/static/script.js",
    "/static/manifest.json",
    "/static/sitemap.xsl",
    "/static/favicon.ico",
]

# Renaming a bucket retires the old one; `sphere cache clear` removes it
[worker.buckets]
static_assets = "wallsphere-static-v1"
images = "wallsphere-images-v1"
api = "wallsphere-api-v1"

[worker.routes]
api_prefixes = ["/api/"]
image_prefixes = ["/uploads/", "/static/avatars/"]
image_extensions = ["png", "jpg", "jpeg", "gif", "webp", "avif", "svg", "ico"]

[fetch]
timeout_ms = 30000

[log]
level = "info"
format = "human"
# filter = "sphere_worker=debug,info"

[cache]
# directory = ".sphere/cache"
"#
    .to_string()
}
