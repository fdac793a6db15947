//! Cache storage inspection.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use serde::Serialize;
use sphere_cache::{CacheBackend, CacheStore, DiskBackend};

use super::{CacheArgs, CacheCommand};
use crate::context::Context;
use crate::output::{format_age, format_bytes};

#[derive(Serialize)]
struct EntryListing {
    bucket: String,
    key: String,
    status: u16,
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_at: Option<String>,
    retired: bool,
}

/// Run the cache command.
pub async fn run(args: CacheArgs, ctx: &Context) -> Result<()> {
    let dir = ctx.cache_dir()?;
    let backend = DiskBackend::open(&dir)
        .await
        .with_context(|| format!("Failed to open cache storage: {}", dir.display()))?;

    match args.command {
        CacheCommand::List { bucket } => list_entries(&backend, bucket.as_deref(), ctx).await,
        CacheCommand::Clear { yes } => clear(backend, yes, ctx).await,
    }
}

async fn list_entries(backend: &DiskBackend, only: Option<&str>, ctx: &Context) -> Result<()> {
    let active = ctx.config.worker.buckets.all();
    let buckets = backend.buckets().await?;

    if let Some(name) = only {
        if !buckets.iter().any(|b| b == name) {
            bail!("No such bucket: {}", name);
        }
    }

    let mut listings = Vec::new();
    for bucket in buckets.iter().filter(|b| only.map_or(true, |name| name == b.as_str())) {
        let retired = !active.contains(&bucket.as_str());
        for key in backend.keys(bucket).await? {
            // Entries can vanish between listing keys and reading them.
            let Some(entry) = backend.get(bucket, &key).await? else {
                continue;
            };
            listings.push((
                EntryListing {
                    bucket: bucket.clone(),
                    key,
                    status: entry.status,
                    bytes: entry.body.len(),
                    stored_at: entry.stored_at().map(|t| t.to_rfc3339()),
                    retired,
                },
                entry.age_secs(),
            ));
        }
    }

    if ctx.output.is_json() {
        let entries: Vec<&EntryListing> = listings.iter().map(|(l, _)| l).collect();
        ctx.output.json(&entries);
        return Ok(());
    }

    if listings.is_empty() {
        ctx.output.info(&format!("Cache is empty ({})", backend.root().display()));
        return Ok(());
    }

    let mut current: Option<&str> = None;
    for (listing, age) in &listings {
        if current != Some(listing.bucket.as_str()) {
            let title = if listing.retired {
                format!("{} (retired)", listing.bucket)
            } else {
                listing.bucket.clone()
            };
            ctx.output.header(&title);
            current = Some(listing.bucket.as_str());
        }

        ctx.output.table_row(
            &[
                &listing.status.to_string(),
                &format_bytes(listing.bytes as u64),
                &format_age(*age),
                &listing.key,
            ],
            &[4, 10, 8, 0],
        );
    }

    ctx.output.info("");
    ctx.output.info(&format!(
        "{} entries in {}",
        listings.len(),
        backend.root().display()
    ));

    Ok(())
}

async fn clear(backend: DiskBackend, yes: bool, ctx: &Context) -> Result<()> {
    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all cached responses in {}?", backend.root().display()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Aborted");
            return Ok(());
        }
    }

    let store = CacheStore::new(Arc::new(backend), ctx.config.worker.buckets.clone());
    let removed = store.clear().await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "removed_buckets": removed }));
    } else {
        ctx.output.success(&format!("Removed {} buckets", removed));
    }

    Ok(())
}
