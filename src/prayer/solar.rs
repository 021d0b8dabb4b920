//! Simplified solar-position model for daily prayer times.
//!
//! Declination and equation of time are approximated with single-term sinusoids of the
//! day of year. Every event is expressed as a decimal-hour offset from solar noon, where
//! hours are referenced to the Greenwich meridian (`12 - longitude / 15`). Adding those
//! hours to UTC midnight of the requested day gives absolute instants.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use std::f64::consts::PI;

use super::{CalculationMethod, Coordinate, PrayerTimes};

/// Standard refraction-corrected depression for Sunrise and Maghrib, in degrees.
pub const SUNRISE_ANGLE: f64 = 0.833;

/// Isha offset after Maghrib for methods without an Isha angle.
pub const FIXED_ISHA_MINUTES: i64 = 90;

/// Small fixed correction applied to solar noon for Dhuhr.
pub const DHUHR_OFFSET_MINUTES: f64 = 1.0;

/// Intermediate solar values for one day, useful for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub day_of_year: u32,
    /// Solar declination in radians
    pub declination: f64,
    pub equation_of_time_minutes: f64,
    /// Solar noon in decimal hours (UTC)
    pub solar_noon: f64,
}

/// Compute declination, equation of time and solar noon for a day and longitude.
pub fn solar_position(date: NaiveDate, longitude: f64) -> SolarPosition {
    let day_of_year = date.ordinal();
    let b = 2.0 * PI * (day_of_year as f64 - 81.0) / 365.0;

    let declination = 23.45_f64.to_radians() * b.sin();
    let equation_of_time_minutes = 9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin();
    let solar_noon = 12.0 - longitude / 15.0 - equation_of_time_minutes / 60.0;

    SolarPosition {
        day_of_year,
        declination,
        equation_of_time_minutes,
        solar_noon,
    }
}

/// Compute the six prayer instants for `date` at `coordinate` with `method`.
///
/// Always returns a value. Near the poles the hour-angle cosine is clamped, so events the
/// sun never reaches collapse onto midnight or noon boundaries rather than erroring.
pub fn compute(date: NaiveDate, coordinate: Coordinate, method: CalculationMethod) -> PrayerTimes {
    let params = method.params();
    let sun = solar_position(date, coordinate.longitude);
    let lat = coordinate.latitude.to_radians();
    let dec = sun.declination;

    let sunrise_offset = hour_angle_hours(SUNRISE_ANGLE.to_radians(), lat, dec);

    let fajr = sun.solar_noon - hour_angle_hours(params.fajr_angle.to_radians(), lat, dec);
    let sunrise = sun.solar_noon - sunrise_offset;
    let dhuhr = sun.solar_noon + DHUHR_OFFSET_MINUTES / 60.0;
    // Asr is an elevation above the horizon, so it enters the formula as a negative depression
    let asr = sun.solar_noon
        + hour_angle_hours(-asr_elevation(params.asr_shadow_factor, lat, dec), lat, dec);
    let maghrib = sun.solar_noon + sunrise_offset;

    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    let maghrib_at = at_decimal_hour(midnight, maghrib);

    let isha_at = if params.uses_fixed_isha() {
        fixed_isha(maghrib_at)
    } else {
        at_decimal_hour(
            midnight,
            sun.solar_noon + hour_angle_hours(params.isha_angle.to_radians(), lat, dec),
        )
    };

    PrayerTimes {
        date,
        fajr: at_decimal_hour(midnight, fajr),
        sunrise: at_decimal_hour(midnight, sunrise),
        dhuhr: at_decimal_hour(midnight, dhuhr),
        asr: at_decimal_hour(midnight, asr),
        maghrib: maghrib_at,
        isha: isha_at,
    }
}

/// Isha for methods that place it a fixed interval after Maghrib.
pub fn fixed_isha(maghrib: DateTime<Utc>) -> DateTime<Utc> {
    maghrib + Duration::minutes(FIXED_ISHA_MINUTES)
}

/// Hour angle (in hours) at which the sun sits `depression` radians below the horizon.
fn hour_angle_hours(depression: f64, lat: f64, dec: f64) -> f64 {
    let cos_h = (-depression.sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos());
    cos_h.clamp(-1.0, 1.0).acos().to_degrees() / 15.0
}

/// Sun elevation (radians) at which an object's shadow equals `factor` times its height
/// plus its noon shadow.
fn asr_elevation(factor: f64, lat: f64, dec: f64) -> f64 {
    (1.0 / (factor + (lat - dec).abs().tan())).atan()
}

fn at_decimal_hour(midnight: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    midnight + Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}
