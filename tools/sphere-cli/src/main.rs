//! Sphere CLI - Command line tool for the Wallsphere sitemap and cache worker.
//!
//! Commands:
//! - `sphere render` - Render a sitemap XML document as HTML
//! - `sphere fetch` - Run requests through the cache worker
//! - `sphere cache` - Inspect or clear cache storage
//! - `sphere config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sphere_observability::LogLevel;

use commands::{CacheArgs, ConfigArgs, FetchArgs, RenderArgs};

/// Sphere CLI - Render sitemaps and exercise the offline cache worker
#[derive(Parser)]
#[command(name = "sphere")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a sitemap XML document as an HTML page
    Render(RenderArgs),

    /// Fetch URLs through the cache worker
    Fetch(FetchArgs),

    /// Inspect or clear cache storage
    Cache(CacheArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let mut log = ctx.config.log.clone();
    if cli.verbose && log.level > LogLevel::Debug {
        log = log.with_level(LogLevel::Debug);
    }
    if let Err(e) = sphere_observability::init(&log) {
        ctx.output.warn(&format!("Logging disabled: {}", e));
    }

    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args, &ctx).await,
        Commands::Fetch(args) => commands::fetch::run(args, &ctx).await,
        Commands::Cache(args) => commands::cache::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
