//! Clock-hour ranges and after-prayer window settings.
//!
//! Ranges are half-open `[start, end)` over whole hours of the local wall clock and may
//! wrap past midnight (`start > end`, e.g. sleep from 20 to 3).

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SlotKey;
use crate::common::constants::*;

/// A whole-hour range of the local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl From<[u32; 2]> for HourRange {
    fn from([start, end]: [u32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<HourRange> for [u32; 2] {
    fn from(range: HourRange) -> Self {
        [range.start, range.end]
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start, self.end)
    }
}

impl HourRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Wraparound-aware membership test.
    ///
    /// `start < end` means `start <= hour < end`; otherwise `hour >= start || hour < end`.
    /// Identical bounds therefore match every hour, which config validation rejects.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start < self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

/// How the after-prayer window relates to the Adhan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfterPrayerPolicy {
    /// Open at the Adhan, closed `minutes` later
    #[default]
    Duration,
    /// Open `minutes` after the Adhan, closed at the next prayer
    Offset,
}

impl AfterPrayerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::Offset => "offset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "duration" => Some(Self::Duration),
            "offset" => Some(Self::Offset),
            _ => None,
        }
    }
}

/// After-prayer window setting: a number of minutes interpreted by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfterPrayerWindow {
    pub minutes: u32,
    pub policy: AfterPrayerPolicy,
}

impl Default for AfterPrayerWindow {
    fn default() -> Self {
        Self::duration(DEFAULT_AFTER_PRAYER_MINUTES)
    }
}

impl AfterPrayerWindow {
    pub fn duration(minutes: u32) -> Self {
        Self {
            minutes,
            policy: AfterPrayerPolicy::Duration,
        }
    }

    pub fn offset(minutes: u32) -> Self {
        Self {
            minutes,
            policy: AfterPrayerPolicy::Offset,
        }
    }
}

/// User-configured hour ranges for the four clock-driven slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindowConfig {
    pub waking: HourRange,
    pub morning: HourRange,
    pub evening: HourRange,
    pub sleep: HourRange,
    pub after_prayer: AfterPrayerWindow,
    /// Whether Sunrise counts as an upcoming prayer when looking for the next event
    pub include_sunrise: bool,
}

impl Default for TimeWindowConfig {
    fn default() -> Self {
        Self {
            waking: DEFAULT_WAKING_RANGE,
            morning: DEFAULT_MORNING_RANGE,
            evening: DEFAULT_EVENING_RANGE,
            sleep: DEFAULT_SLEEP_RANGE,
            after_prayer: AfterPrayerWindow::default(),
            include_sunrise: DEFAULT_INCLUDE_SUNRISE,
        }
    }
}

impl TimeWindowConfig {
    /// The clock-driven slots with their ranges, in evaluation order.
    pub fn ranges(&self) -> [(SlotKey, HourRange); 4] {
        [
            (SlotKey::WakingUp, self.waking),
            (SlotKey::Morning, self.morning),
            (SlotKey::Evening, self.evening),
            (SlotKey::Sleep, self.sleep),
        ]
    }
}

/// Local instant at `hour:00` on `date`.
///
/// Ambiguous wall times resolve to the earlier instant; times skipped by a DST jump resolve
/// to the first valid hour after the gap.
pub fn local_at_hour(tz: &Tz, date: NaiveDate, hour: u32) -> DateTime<Tz> {
    let time = NaiveTime::from_hms_opt(hour % 24, 0, 0).unwrap_or(NaiveTime::MIN);
    let naive = date.and_time(time);

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// Next occurrence of `hour:00` strictly after `now`: today if still ahead, else tomorrow.
pub fn next_hour_occurrence(now: &DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    let candidate = local_at_hour(&tz, today, hour);
    if candidate > *now {
        candidate
    } else {
        local_at_hour(&tz, today + Duration::days(1), hour)
    }
}
