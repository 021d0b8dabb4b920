//! # athkari
//!
//! Prayer-time computation and daily adhkar routine scheduling.
//!
//! The library is organized in two layers:
//!
//! - **Core** (pure, total functions): `prayer` derives a day's prayer instants from a
//!   coordinate and calculation method and answers "which prayer now / what next";
//!   `slots` resolves which remembrance routine is active from the clock, the prayer times,
//!   and the user's hour ranges.
//! - **Shell**: `config` (TOML settings), `geo` (location and timezone), `time_source`
//!   (real or simulated clock), `ticker` and `monitor` (periodic evaluation with change
//!   logging), and `args`/`commands` for the CLI.
//!
//! The two entry points most callers need are re-exported here:
//! [`compute_prayer_times`] and [`resolve_active_routine`].

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod common;
pub mod config;
pub mod geo;
pub mod monitor;
pub mod prayer;
pub mod slots;
pub mod ticker;
pub mod time_source;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

pub use prayer::{CalculationMethod, Coordinate, Prayer, PrayerTimes};
pub use slots::{ActiveRoutineContext, SlotKey, TimeWindowConfig};

/// Prayer times for `date` at the given coordinate.
pub fn compute_prayer_times(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    method: CalculationMethod,
) -> PrayerTimes {
    prayer::compute(date, Coordinate::new(latitude, longitude), method)
}

/// The routine active at `now`, or `None` when `now` falls in a gap between routines.
pub fn resolve_active_routine(
    now: &DateTime<Tz>,
    prayer_times: &PrayerTimes,
    window_config: &TimeWindowConfig,
) -> Option<ActiveRoutineContext> {
    slots::scheduler::resolve_active_context(now, prayer_times, window_config)
}
