//! Application-wide defaults and validation limits.

use crate::prayer::{CalculationMethod, Coordinate};
use crate::slots::window::HourRange;

// # Location defaults

/// Fallback location when no coordinates are configured (Masjid al-Haram, Mecca)
pub const DEFAULT_COORDINATE: Coordinate = Coordinate {
    latitude: 21.4225,
    longitude: 39.8262,
};
pub const DEFAULT_TIMEZONE: &str = "Asia/Riyadh";
pub const DEFAULT_METHOD: CalculationMethod = CalculationMethod::UmmAlQura;

// # Routine window defaults

pub const DEFAULT_WAKING_RANGE: HourRange = HourRange::new(3, 6);
pub const DEFAULT_MORNING_RANGE: HourRange = HourRange::new(6, 11);
pub const DEFAULT_EVENING_RANGE: HourRange = HourRange::new(15, 20);
pub const DEFAULT_SLEEP_RANGE: HourRange = HourRange::new(20, 3);
pub const DEFAULT_AFTER_PRAYER_MINUTES: u32 = 15;
pub const DEFAULT_AFTER_PRAYER_POLICY: &str = "duration";
pub const DEFAULT_INCLUDE_SUNRISE: bool = false;

// # Runtime defaults

pub const DEFAULT_UPDATE_INTERVAL: u64 = 60; // seconds between ticks

// # Validation limits

pub const MINIMUM_AFTER_PRAYER_MINUTES: u32 = 1;
pub const MAXIMUM_AFTER_PRAYER_MINUTES: u32 = 240;
pub const MINIMUM_UPDATE_INTERVAL: u64 = 10;
pub const MAXIMUM_UPDATE_INTERVAL: u64 = 300;
pub const MAXIMUM_HOUR: u32 = 23;

// # File names

pub const CONFIG_DIR_NAME: &str = "athkari";
pub const CONFIG_FILE_NAME: &str = "athkari.toml";

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
