//! Output formatting: table, JSON, YAML.
//!
//! Table uses `tabled`, structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn success(text: &str, color: bool) -> String {
    if color {
        format!("{} {}", "✓".green().bold(), text)
    } else {
        format!("✓ {text}")
    }
}

pub fn warning(text: &str, color: bool) -> String {
    if color {
        format!("{} {}", "!".yellow().bold(), text.yellow())
    } else {
        format!("! {text}")
    }
}

pub fn failure(text: &str, color: bool) -> String {
    if color {
        format!("{} {}", "✗".red().bold(), text.red())
    } else {
        format!("✗ {text}")
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a serializable value, using `to_rows` for the table format.
pub fn render<T, R>(format: OutputFormat, data: &T, to_rows: impl Fn(&T) -> Vec<R>) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => Table::new(to_rows(data)).with(Style::rounded()).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(data).unwrap_or_default(),
        OutputFormat::JsonCompact => serde_json::to_string(data).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(data).unwrap_or_default(),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
