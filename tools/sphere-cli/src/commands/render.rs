//! Render a sitemap as HTML.

use std::io::{Read, Write};

use anyhow::{Context as _, Result};

use super::RenderArgs;
use crate::context::Context;
use crate::output::format_bytes;

/// Run the render command.
///
/// With `--json` and no output file, prints the parsed document instead.
pub async fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let xml = read_input(&args.input, ctx)?;
    let document = sphere_sitemap::parse(&xml)
        .with_context(|| format!("Failed to parse sitemap: {}", args.input))?;

    ctx.output
        .debug(&format!("Parsed {} entries from {}", document.len(), args.input));

    if ctx.output.is_json() && args.output.is_none() {
        ctx.output.json(&document);
        return Ok(());
    }

    let html = sphere_sitemap::render(&document);

    match args.output {
        Some(path) => {
            let path = ctx.resolve_path(&path);
            std::fs::write(&path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.output.success(&format!(
                "Wrote {} ({})",
                path.display(),
                format_bytes(html.len() as u64)
            ));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn read_input(input: &str, ctx: &Context) -> Result<String> {
    if input == "-" {
        let mut xml = String::new();
        std::io::stdin()
            .read_to_string(&mut xml)
            .context("Failed to read sitemap from stdin")?;
        return Ok(xml);
    }

    let path = ctx.resolve_path(input);
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}
