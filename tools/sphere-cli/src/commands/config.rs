//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let worker = &ctx.config.worker;
    ctx.output.info("");
    ctx.output.info("[worker]");
    ctx.output.kv("origin", &worker.origin);
    ctx.output.kv("revalidate", &format!("{:?}", worker.revalidate).to_lowercase());
    ctx.output.kv("explain_headers", &worker.explain_headers.to_string());
    ctx.output.kv("static_assets", "");
    for asset in &worker.static_assets {
        ctx.output.list_item(asset);
    }

    ctx.output.info("");
    ctx.output.info("[worker.buckets]");
    ctx.output.kv("static_assets", &worker.buckets.static_assets);
    ctx.output.kv("images", &worker.buckets.images);
    ctx.output.kv("api", &worker.buckets.api);

    ctx.output.info("");
    ctx.output.info("[worker.routes]");
    ctx.output.kv("api_prefixes", &worker.routes.api_prefixes.join(", "));
    ctx.output.kv("image_prefixes", &worker.routes.image_prefixes.join(", "));
    ctx.output
        .kv("image_extensions", &worker.routes.image_extensions.join(", "));

    let fetch = &ctx.config.fetch;
    ctx.output.info("");
    ctx.output.info("[fetch]");
    match fetch.timeout_ms {
        Some(ms) => ctx.output.kv("timeout_ms", &ms.to_string()),
        None => ctx.output.kv("timeout_ms", "(none)"),
    }
    ctx.output.kv("user_agent", &fetch.user_agent);

    let log = &ctx.config.log;
    ctx.output.info("");
    ctx.output.info("[log]");
    ctx.output.kv("level", log.level.as_str());
    ctx.output.kv("format", &log.format.to_string());
    if let Some(filter) = &log.filter {
        ctx.output.kv("filter", filter);
    }

    ctx.output.info("");
    ctx.output.info("[cache]");
    ctx.output.kv("directory", &ctx.cache_path().display().to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.worker.validate() {
        errors.push(format!("worker: {}", e));
    }

    if let Err(e) = ctx.config.log.env_filter() {
        errors.push(format!("log: {}", e));
    }

    if ctx.config.worker.static_assets.is_empty() {
        warnings.push("worker.static_assets is empty, nothing will be precached".to_string());
    }

    for (i, prefix) in ctx.config.worker.routes.api_prefixes.iter().enumerate() {
        if !prefix.starts_with('/') {
            errors.push(format!("worker.routes.api_prefixes[{}] must start with '/'", i));
        }
    }

    if ctx.config.fetch.timeout_ms.is_none() {
        warnings.push("fetch.timeout_ms is unset, requests may hang".to_string());
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
