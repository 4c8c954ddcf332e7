//! Shared CLI output helpers for genecheck binaries.

use std::fmt::Display;
use std::time::{Duration, Instant};

use colored::Colorize;

pub fn banner(subtitle: &str) {
    eprintln!();
    eprintln!("{} {}", "genecheck".bold().cyan(), subtitle.dimmed());
    eprintln!();
}

const RULE_WIDTH: usize = 50;
const KEY_WIDTH: usize = 20;

/// A bold heading followed by a dimmed rule padding it to a fixed width.
pub fn section(title: &str) {
    eprintln!("{} {}", title.bold().blue(), section_rule(title).dimmed());
}

/// Long titles still get a short rule.
fn section_rule(title: &str) -> String {
    "─".repeat(RULE_WIDTH.saturating_sub(title.chars().count() + 1).max(4))
}

pub fn kv(key: &str, value: impl Display) {
    eprintln!("  {:<KEY_WIDTH$} {value}", key.dimmed());
}

pub fn success(msg: impl Display) {
    eprintln!("  {} {msg}", "✓".green().bold());
}

pub fn warning(msg: impl Display) {
    eprintln!("  {} {}", "⚠".yellow(), msg.to_string().yellow());
}

pub fn print_summary(start: Instant) {
    eprintln!();
    eprintln!(
        "{}  {}",
        "Time".dimmed(),
        format_elapsed(start.elapsed()).bold()
    );
    eprintln!();
}

/// Formats a duration as HH:MM:SS.d (tenths of a second).
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let tenths = d.subsec_millis() / 100;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{tenths}")
}
