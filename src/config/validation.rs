//! Configuration validation.
//!
//! Hard errors for values the scheduler cannot work with, plus a soft check for after-Isha
//! windows that the midnight rollover will cut short.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;

use super::Config;
use crate::common::constants::*;
use crate::prayer::compute;
use crate::slots::window::{AfterPrayerPolicy, HourRange};

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if let Some(name) = config.timezone.as_deref()
        && name.parse::<Tz>().is_err()
    {
        anyhow::bail!("timezone '{}' is not a valid IANA timezone name", name);
    }

    let ranges = [
        ("waking", config.waking),
        ("morning", config.morning),
        ("evening", config.evening),
        ("sleep", config.sleep),
    ];
    for (field, range) in ranges {
        if let Some(range) = range {
            validate_hour_range(field, range)?;
        }
    }

    if let Some(minutes) = config.after_prayer_minutes
        && !(MINIMUM_AFTER_PRAYER_MINUTES..=MAXIMUM_AFTER_PRAYER_MINUTES).contains(&minutes)
    {
        anyhow::bail!(
            "after_prayer_minutes ({}) must be between {} and {} minutes",
            minutes,
            MINIMUM_AFTER_PRAYER_MINUTES,
            MAXIMUM_AFTER_PRAYER_MINUTES
        );
    }

    if let Some(policy) = config.after_prayer_policy.as_deref()
        && AfterPrayerPolicy::from_name(policy).is_none()
    {
        anyhow::bail!(
            "after_prayer_policy must be \"duration\" or \"offset\" (got \"{}\")",
            policy
        );
    }

    if let Some(interval) = config.update_interval
        && !(MINIMUM_UPDATE_INTERVAL..=MAXIMUM_UPDATE_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "update_interval ({} s) must be between {} and {} seconds",
            interval,
            MINIMUM_UPDATE_INTERVAL,
            MAXIMUM_UPDATE_INTERVAL
        );
    }

    Ok(())
}

fn validate_hour_range(field: &str, range: HourRange) -> Result<()> {
    if range.start > MAXIMUM_HOUR || range.end > MAXIMUM_HOUR {
        anyhow::bail!(
            "{} hours must be between 0 and {} (got [{}, {}])",
            field,
            MAXIMUM_HOUR,
            range.start,
            range.end
        );
    }
    if range.start == range.end {
        anyhow::bail!(
            "{} start and end must differ (got [{}, {}]); identical bounds would cover the whole day",
            field,
            range.start,
            range.end
        );
    }
    Ok(())
}

/// Warning text when the after-Isha window on `date` runs past local midnight.
///
/// After midnight the day's prayer times roll over and an Isha reading before the new Fajr
/// counts as expired, so any part of the window beyond midnight is never shown.
pub fn isha_window_warning(config: &Config, date: NaiveDate) -> Option<String> {
    let location = config.location();
    let window = config.after_prayer_window();
    let times = compute(date, location.coordinate, config.method());

    // Offset windows stay open until the next Fajr, which is always past midnight
    if window.policy == AfterPrayerPolicy::Offset {
        return Some(
            "after_prayer_policy \"offset\" keeps the after-Isha window open until Fajr, \
             but it closes at midnight when prayer times roll over"
                .to_string(),
        );
    }

    let isha_local = times.isha.with_timezone(&location.timezone);
    let window_end = isha_local + Duration::minutes(window.minutes as i64);

    if window_end.date_naive() > isha_local.date_naive() {
        Some(format!(
            "Isha at {} plus {} minutes runs past midnight; the after-Isha window will be cut short",
            isha_local.format("%H:%M"),
            window.minutes
        ))
    } else {
        None
    }
}
