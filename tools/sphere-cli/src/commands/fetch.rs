//! Run requests through the cache worker.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use sphere_cache::{CacheBackend, DiskBackend, MemoryBackend};
use sphere_core::{Destination, FetchRequest};
use sphere_fetch::HttpFetcher;
use sphere_observability::request_span;
use sphere_worker::{FetchOutcome, InstallReport, ServiceWorker};
use tracing::Instrument;

use super::FetchArgs;
use crate::context::Context;
use crate::output::{format_bytes, status_badge};

const COLUMNS: [usize; 5] = [12, 6, 10, 22, 0];

#[derive(Serialize)]
struct FetchReport {
    install: InstallReport,
    results: Vec<FetchRow>,
}

#[derive(Serialize)]
struct FetchRow {
    url: String,
    outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<String>,
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the fetch command.
///
/// Each invocation installs and activates a fresh worker over the configured
/// cache storage, then handles the URLs in order.
pub async fn run(args: FetchArgs, ctx: &Context) -> Result<()> {
    let destination = args
        .destination
        .as_deref()
        .map(str::parse::<Destination>)
        .transpose()?;

    let requests = args
        .urls
        .iter()
        .map(|url| {
            let request =
                FetchRequest::get(url).with_context(|| format!("Invalid URL: {}", url))?;
            Ok(match destination {
                Some(d) => request.with_destination(d),
                None => request,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut config = ctx.config.worker.clone();
    if args.explain {
        config.explain_headers = true;
    }

    let backend: Arc<dyn CacheBackend> = if args.ephemeral {
        Arc::new(MemoryBackend::new())
    } else {
        let dir = ctx.cache_dir()?;
        ctx.output.debug(&format!("Cache directory: {}", dir.display()));
        Arc::new(DiskBackend::open(dir).await.context("Failed to open cache storage")?)
    };
    let fetcher = Arc::new(HttpFetcher::new(&ctx.config.fetch)?);
    let worker = ServiceWorker::new(config, backend, fetcher)?;

    let spinner = ctx.output.spinner(&format!(
        "Precaching {} assets from {}",
        worker.config().static_assets.len(),
        worker.config().origin
    ));
    let install = worker.install().await?;
    spinner.finish_and_clear();

    for failed in &install.failed {
        ctx.output
            .warn(&format!("Not precached: {} ({})", failed.url, failed.reason));
    }
    worker.activate()?;

    let progress = ctx.output.progress(requests.len() as u64, "Fetching");
    let mut results = Vec::with_capacity(requests.len());
    let mut bodies = Vec::new();

    for request in &requests {
        let span = request_span(request);
        let result = worker.fetch(request).instrument(span).await;
        progress.inc(1);

        let row = match result {
            Ok(mut outcome) => {
                outcome.settle().await;
                describe(&worker, request, &outcome, &mut bodies, args.body)
            }
            Err(e) => FetchRow {
                url: request.url(),
                outcome: "ERROR".to_string(),
                http_status: None,
                bucket: None,
                bytes: 0,
                error: Some(e.to_string()),
            },
        };
        results.push(row);
    }
    progress.finish_and_clear();

    let errors = results.iter().filter(|r| r.error.is_some()).count();

    if ctx.output.is_json() {
        ctx.output.json(&FetchReport { install, results });
    } else {
        print_results(ctx, &install, &results);
        for (url, body) in &bodies {
            ctx.output.header(url);
            println!("{}", body);
        }
    }

    if errors > 0 {
        bail!("{} of {} requests failed", errors, requests.len());
    }

    Ok(())
}

fn describe(
    worker: &ServiceWorker,
    request: &FetchRequest,
    outcome: &FetchOutcome,
    bodies: &mut Vec<(String, String)>,
    keep_body: bool,
) -> FetchRow {
    let url = request.url();

    match outcome {
        FetchOutcome::Served(served) => {
            if keep_body {
                bodies.push((url.clone(), served.response.text().into_owned()));
            }
            FetchRow {
                url,
                outcome: served.status.to_string(),
                http_status: Some(served.response.status.as_u16()),
                bucket: Some(worker.store().bucket_name(served.bucket).to_string()),
                bytes: served.response.body.len(),
                error: None,
            }
        }
        FetchOutcome::Passthrough => FetchRow {
            url,
            outcome: "PASSTHROUGH".to_string(),
            http_status: None,
            bucket: None,
            bytes: 0,
            error: None,
        },
        FetchOutcome::Empty => FetchRow {
            url,
            outcome: "EMPTY".to_string(),
            http_status: None,
            bucket: None,
            bytes: 0,
            error: None,
        },
    }
}

fn print_results(ctx: &Context, install: &InstallReport, results: &[FetchRow]) {
    ctx.output.info(&format!(
        "Precached {}/{} assets",
        install.cached.len(),
        install.cached.len() + install.failed.len()
    ));

    ctx.output.header("Results");
    ctx.output
        .table_row(&["OUTCOME", "HTTP", "SIZE", "BUCKET", "URL"], &COLUMNS);

    for row in results {
        let status = row.http_status.map(|s| s.to_string()).unwrap_or_default();
        let size = format_bytes(row.bytes as u64);
        let bucket = row.bucket.as_deref().unwrap_or("-");
        let outcome = status_badge(&row.outcome);

        ctx.output
            .table_row(&[&outcome, &status, &size, bucket, &row.url], &COLUMNS);
        if let Some(error) = &row.error {
            ctx.output.list_item(error);
        }
    }
}
