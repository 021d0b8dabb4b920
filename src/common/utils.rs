//! Formatting helpers shared by commands and the monitor.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::path::Path;

/// Replace the home directory prefix of a path with `~` for display.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}

/// Format a countdown as `Xh YYm`, or `Ym` under an hour.
pub fn format_countdown(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}

/// Format a UTC instant as local `HH:MM` in the given zone.
pub fn format_hm(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%H:%M").to_string()
}
