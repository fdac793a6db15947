//! CLI command implementations.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod render;

use clap::{Args, Subcommand};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Sitemap XML file, or `-` for stdin.
    #[arg(default_value = "-")]
    pub input: String,

    /// Write the HTML to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Absolute URLs to request, in order.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Request destination (image, document, script, style, font, manifest).
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Use an in-memory cache instead of the cache directory.
    #[arg(long)]
    pub ephemeral: bool,

    /// Attach X-Cache-* headers to served responses.
    #[arg(long)]
    pub explain: bool,

    /// Print response bodies.
    #[arg(long)]
    pub body: bool,
}

/// Arguments for the cache command.
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// List cached entries.
    List {
        /// Only list this bucket.
        #[arg(short, long)]
        bucket: Option<String>,
    },
    /// Remove every bucket from cache storage.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}
