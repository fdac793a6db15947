//! Output formatting for the CLI.

use std::time::Duration;

use console::{pad_str, style, Alignment, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
///
/// In JSON mode only `json` and `error` print anything, so stdout stays
/// machine-readable.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

enum Stream {
    Out,
    Err,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn line(&self, stream: Stream, mark: StyledObject<&str>, msg: &str) {
        if self.json {
            return;
        }
        match stream {
            Stream::Out => println!("{} {}", mark, msg),
            Stream::Err => eprintln!("{} {}", mark, msg),
        }
    }

    pub fn info(&self, msg: &str) {
        self.line(Stream::Out, style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.line(Stream::Out, style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Stream::Err, style("⚠").yellow(), msg);
    }

    /// Print an error. JSON mode reports it as an `{"error": ...}` object on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Print a message only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.line(Stream::Err, style("→").dim(), &style(msg).dim().to_string());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Print a value as pretty JSON.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.json {
            println!("  {} {}", style("•").dim(), item);
        }
    }

    /// Print one table row. A width of `0` leaves the column unpadded.
    ///
    /// Widths are measured without color codes, so styled cells line up.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let cells: Vec<_> = cols
            .iter()
            .zip(widths.iter().chain(std::iter::repeat(&0)))
            .map(|(col, &width)| pad_str(col, width, Alignment::Left, None))
            .collect();
        println!("  {}", cells.join("  ").trim_end());
    }

    /// Progress bar over a known number of requests.
    pub fn progress(&self, len: u64, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len).with_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(msg.to_string());
        bar
    }

    /// Spinner for work of unknown length, such as precaching.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored label for how a response was produced.
pub fn status_badge(status: &str) -> String {
    match status.trim().to_uppercase().as_str() {
        "HIT" | "FALLBACK" => style(status).green().to_string(),
        "STALE" => style(status).yellow().to_string(),
        "MISS" | "NETWORK" => style(status).cyan().to_string(),
        "EMPTY" | "PASSTHROUGH" => style(status).dim().to_string(),
        "ERROR" => style(status).red().to_string(),
        _ => status.to_string(),
    }
}

/// Format bytes as human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format an age in seconds as a short string.
pub fn format_age(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_badge_keeps_text() {
        console::set_colors_enabled(false);
        assert_eq!(status_badge("STALE"), "STALE");
        assert_eq!(status_badge("passthrough"), "passthrough");
        assert_eq!(console::measure_text_width(&status_badge("HIT")), 3);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(42), "42s");
        assert_eq!(format_age(125), "2m 5s");
        assert_eq!(format_age(7_260), "2h 1m");
        assert_eq!(format_age(90_000), "1d 1h");
    }
}
