//! Default configuration file generation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;
use crate::prayer::CalculationMethod;

/// Write a commented default `athkari.toml` at `path`, creating parent directories.
///
/// Coordinates are left commented out so the Mecca fallback applies until the user sets
/// their own.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let method_names = CalculationMethod::ALL
        .iter()
        .map(|m| format!("\"{}\"", m.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let content = ConfigBuilder::new()
        .add_section("Location")
        .add_commented_setting(
            "latitude",
            &format!("{:.4}", DEFAULT_COORDINATE.latitude),
            "Geographic latitude (-90 to 90), Mecca when unset",
        )
        .add_commented_setting(
            "longitude",
            &format!("{:.4}", DEFAULT_COORDINATE.longitude),
            "Geographic longitude (-180 to 180)",
        )
        .add_commented_setting(
            "timezone",
            &format!("\"{DEFAULT_TIMEZONE}\""),
            "IANA timezone, detected from coordinates when unset",
        )
        .add_setting(
            "method",
            &format!("\"{}\"", DEFAULT_METHOD.as_str()),
            &format!("Calculation method: {method_names}"),
        )
        .add_section("Routine windows")
        .add_setting(
            "waking",
            &hour_pair(DEFAULT_WAKING_RANGE),
            "Waking up routine hours [start, end)",
        )
        .add_setting(
            "morning",
            &hour_pair(DEFAULT_MORNING_RANGE),
            "Morning routine hours [start, end)",
        )
        .add_setting(
            "evening",
            &hour_pair(DEFAULT_EVENING_RANGE),
            "Evening routine hours [start, end)",
        )
        .add_setting(
            "sleep",
            &hour_pair(DEFAULT_SLEEP_RANGE),
            "Sleep routine hours, may wrap past midnight",
        )
        .add_section("After prayer")
        .add_setting(
            "after_prayer_minutes",
            &DEFAULT_AFTER_PRAYER_MINUTES.to_string(),
            &format!(
                "Length of the after-prayer window ({MINIMUM_AFTER_PRAYER_MINUTES}-{MAXIMUM_AFTER_PRAYER_MINUTES}) minutes"
            ),
        )
        .add_setting(
            "after_prayer_policy",
            &format!("\"{DEFAULT_AFTER_PRAYER_POLICY}\""),
            "\"duration\": open at the Adhan | \"offset\": open after the minutes, until the next prayer",
        )
        .add_setting(
            "include_sunrise",
            &DEFAULT_INCLUDE_SUNRISE.to_string(),
            "Count Sunrise as an upcoming prayer",
        )
        .add_section("Runtime")
        .add_setting(
            "update_interval",
            &DEFAULT_UPDATE_INTERVAL.to_string(),
            &format!(
                "Seconds between routine checks ({MINIMUM_UPDATE_INTERVAL}-{MAXIMUM_UPDATE_INTERVAL})"
            ),
        )
        .build();

    fs::write(path, content).context("Failed to write default config file")?;
    Ok(())
}

fn hour_pair(range: crate::slots::window::HourRange) -> String {
    format!("[{}, {}]", range.start, range.end)
}

struct ConfigBuilder {
    entries: Vec<Entry>,
}

enum Entry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(Entry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(Entry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// A setting shown as an example but left disabled.
    fn add_commented_setting(self, key: &str, value: &str, comment: &str) -> Self {
        self.add_setting(&format!("# {key}"), value, comment)
    }

    fn build(self) -> String {
        // Align comments one space past the longest setting
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Setting { line, .. } => Some(line.len()),
                Entry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                Entry::Section(title) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                Entry::Setting { line, comment } => {
                    lines.push(format!("{line:<width$}{comment}"));
                }
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}
