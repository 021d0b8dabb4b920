//! Queries over a day's [`PrayerTimes`].
//!
//! Periods are half-open: a prayer governs `[its instant, next instant)`. Anything before
//! Fajr belongs to the previous night's Isha.

use chrono::{DateTime, Duration, Utc};

use super::{Prayer, PrayerTimes};
use crate::slots::window::{AfterPrayerPolicy, AfterPrayerWindow};

/// Result of a "next prayer" lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextPrayer {
    pub prayer: Prayer,
    pub time: DateTime<Utc>,
    /// True when today's markers are exhausted and the result is tomorrow's Fajr
    pub is_next_day: bool,
}

/// Which prayer period contains `at`.
///
/// Returns the marker that opened the current period: before Fajr that is Isha (last
/// night's), from Fajr until Sunrise it is Fajr, and so on until Isha.
pub fn current_prayer(times: &PrayerTimes, at: DateTime<Utc>) -> Prayer {
    times
        .iter()
        .rev()
        .find(|(_, time)| *time <= at)
        .map(|(prayer, _)| prayer)
        .unwrap_or(Prayer::Isha)
}

/// First marker strictly after `at`.
///
/// Sunrise is skipped unless `include_sunrise` is set. Once Isha has passed the result is
/// tomorrow's Fajr, approximated as today's Fajr plus 24 hours rather than recomputed.
pub fn next_prayer(times: &PrayerTimes, at: DateTime<Utc>, include_sunrise: bool) -> NextPrayer {
    times
        .iter()
        .filter(|(prayer, _)| include_sunrise || prayer.has_adhan())
        .find(|(_, time)| *time > at)
        .map(|(prayer, time)| NextPrayer {
            prayer,
            time,
            is_next_day: false,
        })
        .unwrap_or_else(|| NextPrayer {
            prayer: Prayer::Fajr,
            time: times.next_day_fajr(),
            is_next_day: true,
        })
}

/// The prayer whose Adhan has most recently sounded, if the current period has one.
///
/// Returns `None` during the Sunrise period. Before Fajr the reading is last night's Isha,
/// even though today's Isha instant still lies ahead.
pub fn current_adhan(times: &PrayerTimes, at: DateTime<Utc>) -> Option<Prayer> {
    match current_prayer(times, at) {
        Prayer::Sunrise => None,
        Prayer::Isha if at < times.fajr => Some(Prayer::Isha),
        prayer if times.time_of(prayer) <= at => Some(prayer),
        _ => None,
    }
}

/// Instant at which the after-prayer window for `prayer` opens.
pub fn post_prayer_window_start(
    times: &PrayerTimes,
    prayer: Prayer,
    window: AfterPrayerWindow,
) -> DateTime<Utc> {
    let adhan = times.time_of(prayer);
    match window.policy {
        AfterPrayerPolicy::Duration => adhan,
        AfterPrayerPolicy::Offset => adhan + Duration::minutes(window.minutes as i64),
    }
}

/// Instant at which the after-prayer window for `prayer` expires.
///
/// Never later than the instant of the following marker.
pub fn post_prayer_window_end(
    times: &PrayerTimes,
    prayer: Prayer,
    window: AfterPrayerWindow,
) -> DateTime<Utc> {
    let period_end = times.period_end(prayer);
    match window.policy {
        AfterPrayerPolicy::Duration => {
            let expiry = times.time_of(prayer) + Duration::minutes(window.minutes as i64);
            expiry.min(period_end)
        }
        AfterPrayerPolicy::Offset => period_end,
    }
}

/// Whether the after-prayer routine for `prayer` is available at `at`.
///
/// Under [`AfterPrayerPolicy::Duration`] the window is `[adhan, adhan + minutes]`; under
/// [`AfterPrayerPolicy::Offset`] it is `[adhan + minutes, next)`. Both are cut off by the
/// next marker. An Isha reading taken before today's Fajr counts as expired.
pub fn is_post_prayer_ready(
    times: &PrayerTimes,
    prayer: Prayer,
    at: DateTime<Utc>,
    window: AfterPrayerWindow,
) -> bool {
    if !prayer.has_adhan() {
        return false;
    }

    // Past midnight: last night's Isha window is over
    if prayer == Prayer::Isha && at < times.fajr {
        return false;
    }

    let adhan = times.time_of(prayer);
    let next = times.period_end(prayer);
    if at >= next {
        return false;
    }

    match window.policy {
        AfterPrayerPolicy::Duration => {
            at >= adhan && at <= adhan + Duration::minutes(window.minutes as i64)
        }
        AfterPrayerPolicy::Offset => at >= adhan + Duration::minutes(window.minutes as i64),
    }
}
