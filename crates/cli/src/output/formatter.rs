//! Output formatter for human-readable and JSON output
//!
//! Status lines go through [`Formatter::success`], [`Formatter::warning`] and
//! [`Formatter::error`]; object listings through [`Formatter::object`] and
//! friends so `ls` and any future listing command render rows the same way.

use cos_core::FileInfo;
use serde::Serialize;

use super::OutputConfig;

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";

/// Width of a `%Y-%m-%d %H:%M:%S` timestamp, used to pad undated rows
const DATE_WIDTH: usize = 19;

/// Formatter for CLI output
///
/// In JSON mode only [`Formatter::json`] and [`Formatter::error`] write
/// anything; human-readable helpers are silent.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Whether human-readable lines should be written at all
    fn human(&self) -> bool {
        !self.config.quiet && !self.config.json
    }

    /// `glyph`, wrapped in an ANSI color unless colors are off
    fn mark(&self, glyph: &str, color: &str) -> String {
        if self.config.no_color || self.config.json {
            glyph.to_string()
        } else {
            format!("\x1b[{color}m{glyph}\x1b[0m")
        }
    }

    pub fn success(&self, message: &str) {
        if self.human() {
            println!("{} {message}", self.mark("✓", GREEN));
        }
    }

    /// Warnings go to stderr so they never mix with listing output
    pub fn warning(&self, message: &str) {
        if self.human() {
            eprintln!("{} {message}", self.mark("⚠", YELLOW));
        }
    }

    /// Errors are printed even in quiet mode; in JSON mode as
    /// `{"error": "..."}` on stderr.
    pub fn error(&self, message: &str) {
        if !self.config.json {
            eprintln!("{} {message}", self.mark("✗", RED));
            return;
        }
        let body = serde_json::json!({ "error": message });
        match serde_json::to_string_pretty(&body) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{message}"),
        }
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    pub fn println(&self, message: &str) {
        if !self.config.quiet {
            println!("{message}");
        }
    }

    /// Print one listed object with its tag and URL continuation lines
    pub fn object(&self, item: &FileInfo) {
        for line in object_lines(item) {
            self.println(&line);
        }
    }

    /// Tell the user how to fetch the next page
    pub fn cursor_hint(&self, cursor: &str) {
        self.println(&format!(
            "\nMore objects available. Continue with --cursor '{cursor}'"
        ));
    }

    pub fn totals(&self, objects: usize, size_human: &str) {
        self.println(&format!("\nTotal: {objects} objects, {size_human}"));
    }
}

/// `[date] size key`, then one indented line per tag and one for the URL
pub(crate) fn object_lines(item: &FileInfo) -> Vec<String> {
    let date = item
        .last_modified
        .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| " ".repeat(DATE_WIDTH));
    let mut lines = vec![format!("[{date}] {:>9} {}", item.size_human(), item.key)];

    if let Some(tags) = &item.tagging {
        lines.extend(tags.iter().map(|(key, value)| format!("    {key}={value}")));
    }
    if let Some(url) = &item.url {
        lines.push(format!("    {url}"));
    }
    lines
}
