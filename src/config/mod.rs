//! Configuration for athkari.
//!
//! Settings live in `athkari.toml` under `$XDG_CONFIG_HOME/athkari/` (or the directory given
//! with `--config`). A commented default file is written on first run. Every field is
//! optional; anything missing takes its default from [`crate::common::constants`].
//!
//! ```toml
//! #[Location]
//! # latitude = 21.4225         # Geographic latitude (-90 to 90)
//! # longitude = 39.8262        # Geographic longitude (-180 to 180)
//! # timezone = "Asia/Riyadh"   # IANA zone (detected from coordinates when unset)
//! method = "umm_al_qura"       # Calculation method
//!
//! #[Routine windows]
//! waking = [3, 6]              # Waking up routine hours [start, end)
//! morning = [6, 11]
//! evening = [15, 20]
//! sleep = [20, 3]              # Ranges may wrap past midnight
//!
//! #[After prayer]
//! after_prayer_minutes = 15
//! after_prayer_policy = "duration"   # "duration" or "offset"
//! include_sunrise = false
//!
//! #[Runtime]
//! update_interval = 60         # Seconds between checks (10-300)
//! ```
//!
//! Missing coordinates fall back to Mecca. Loading validates ranges and rejects impossible
//! values with a message naming the offending field.

pub mod builder;
pub mod loading;
pub mod validation;

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::common::constants::*;
use crate::geo::{ResolvedLocation, resolve_location};
use crate::prayer::CalculationMethod;
use crate::slots::window::{AfterPrayerPolicy, AfterPrayerWindow, HourRange, TimeWindowConfig};

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Raw configuration as read from `athkari.toml`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA zone name, detected from the coordinates when unset
    pub timezone: Option<String>,
    pub method: Option<String>,
    pub waking: Option<HourRange>,
    pub morning: Option<HourRange>,
    pub evening: Option<HourRange>,
    pub sleep: Option<HourRange>,
    pub after_prayer_minutes: Option<u32>,
    pub after_prayer_policy: Option<String>,
    pub include_sunrise: Option<bool>,
    /// Seconds between monitor ticks
    pub update_interval: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        loading::load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        loading::load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        loading::get_config_path()
    }

    /// Calculation method; unknown names resolve to Umm al-Qura.
    pub fn method(&self) -> CalculationMethod {
        self.method
            .as_deref()
            .map(CalculationMethod::from_name_or_default)
            .unwrap_or(DEFAULT_METHOD)
    }

    /// Explicitly configured zone, if it parses.
    pub fn timezone(&self) -> Option<Tz> {
        self.timezone.as_deref().and_then(|name| name.parse().ok())
    }

    /// Coordinate and zone, falling back to Mecca when coordinates are missing.
    pub fn location(&self) -> ResolvedLocation {
        resolve_location(self.latitude, self.longitude, self.timezone())
    }

    pub fn after_prayer_window(&self) -> AfterPrayerWindow {
        let minutes = self
            .after_prayer_minutes
            .unwrap_or(DEFAULT_AFTER_PRAYER_MINUTES);
        let policy = self
            .after_prayer_policy
            .as_deref()
            .and_then(AfterPrayerPolicy::from_name)
            .unwrap_or_default();
        AfterPrayerWindow { minutes, policy }
    }

    /// Scheduler settings with defaults filled in.
    pub fn window_config(&self) -> TimeWindowConfig {
        TimeWindowConfig {
            waking: self.waking.unwrap_or(DEFAULT_WAKING_RANGE),
            morning: self.morning.unwrap_or(DEFAULT_MORNING_RANGE),
            evening: self.evening.unwrap_or(DEFAULT_EVENING_RANGE),
            sleep: self.sleep.unwrap_or(DEFAULT_SLEEP_RANGE),
            after_prayer: self.after_prayer_window(),
            include_sunrise: self.include_sunrise.unwrap_or(DEFAULT_INCLUDE_SUNRISE),
        }
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL))
    }

    /// Log the effective settings as a block.
    pub fn log_config(&self) {
        let config_path = get_config_path()
            .map(|p| crate::common::utils::private_path(&p))
            .unwrap_or_else(|_| CONFIG_FILE_NAME.to_string());
        log_block_start!("Loaded configuration from {}", config_path);

        crate::geo::log_location(&self.location());

        let window = self.window_config();
        log_indented!("Method: {}", self.method().display_name());
        for (slot, range) in window.ranges() {
            log_indented!("{}: {}", slot.display_name(), range);
        }
        log_indented!(
            "After prayer: {} minutes ({})",
            window.after_prayer.minutes,
            window.after_prayer.policy.as_str()
        );
        if window.include_sunrise {
            log_indented!("Sunrise counts as an upcoming prayer");
        }
        log_indented!("Update interval: {}s", self.update_interval().as_secs());
    }
}
