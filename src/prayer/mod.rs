//! Prayer-time computation and queries.
//!
//! This module holds the domain types for the five daily prayers (plus Sunrise, which
//! bounds the Fajr period but has no Adhan) and the engine that derives a day's prayer
//! instants from a geographic coordinate and a calculation method.
//!
//! ## Module Structure
//!
//! - [`method`]: Calculation method presets and their angle parameters
//! - [`solar`]: Simplified solar-position model producing a day's [`PrayerTimes`]
//! - [`queries`]: "Which prayer are we in", "what is next" and post-prayer window queries
//!
//! ## Time Representation
//!
//! Every instant in [`PrayerTimes`] is a `DateTime<Utc>`. The solar model works in decimal
//! hours referenced to the Greenwich meridian, so converting those hours onto UTC midnight of
//! the requested calendar day yields correct absolute instants for any caller timezone.
//! Presentation code converts to the user's zone when formatting.
//!
//! ## Accuracy
//!
//! The model is an approximation (declination and equation of time from single-term
//! sinusoids) and is meant as the offline fallback when no authoritative timetable is
//! available. At polar latitudes the hour-angle cosine is clamped to [-1, 1], which silently
//! yields boundary values instead of failing.

pub mod method;
pub mod queries;
pub mod solar;


use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::slots::SlotKey;

pub use method::{CalculationMethod, MethodParams};
pub use queries::{
    NextPrayer, current_adhan, current_prayer, is_post_prayer_ready, next_prayer,
    post_prayer_window_end, post_prayer_window_start,
};
pub use solar::compute;

/// One of the six daily time markers.
///
/// Sunrise is not a prayer in its own right but it closes the Fajr period, so it takes part
/// in period resolution and (optionally) in "next prayer" lookups.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Prayer {
    /// All six markers in chronological order.
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// The five markers that carry an Adhan, in chronological order.
    pub const WITH_ADHAN: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Sunrise => "Sunrise",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }

    pub fn arabic_name(&self) -> &'static str {
        match self {
            Self::Fajr => "الفجر",
            Self::Sunrise => "الشروق",
            Self::Dhuhr => "الظهر",
            Self::Asr => "العصر",
            Self::Maghrib => "المغرب",
            Self::Isha => "العشاء",
        }
    }

    /// Returns true for every marker except Sunrise.
    pub fn has_adhan(&self) -> bool {
        !matches!(self, Self::Sunrise)
    }

    /// The after-prayer routine tied to this prayer, if any.
    pub fn after_prayer_slot(&self) -> Option<SlotKey> {
        match self {
            Self::Fajr => Some(SlotKey::AfterFajr),
            Self::Sunrise => None,
            Self::Dhuhr => Some(SlotKey::AfterDhuhr),
            Self::Asr => Some(SlotKey::AfterAsr),
            Self::Maghrib => Some(SlotKey::AfterMaghrib),
            Self::Isha => Some(SlotKey::AfterIsha),
        }
    }

    /// The marker that follows this one within the same day, or `None` after Isha.
    pub fn following(&self) -> Option<Prayer> {
        match self {
            Self::Fajr => Some(Self::Sunrise),
            Self::Sunrise => Some(Self::Dhuhr),
            Self::Dhuhr => Some(Self::Asr),
            Self::Asr => Some(Self::Maghrib),
            Self::Maghrib => Some(Self::Isha),
            Self::Isha => None,
        }
    }
}

/// Geographic coordinate in decimal degrees.
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}

/// The six prayer instants for one calendar day at one location.
///
/// Values are produced by [`solar::compute`] (or supplied by an external timetable) and are
/// treated as read-only. Recompute when the day, location, or method changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimes {
    /// Calendar day these instants belong to
    pub date: NaiveDate,
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}

impl PrayerTimes {
    /// Instant of the given marker.
    pub fn time_of(&self, prayer: Prayer) -> DateTime<Utc> {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Instant that closes the period opened by `prayer`.
    ///
    /// For Isha this is the following day's Fajr, approximated as `fajr + 24h`.
    pub fn period_end(&self, prayer: Prayer) -> DateTime<Utc> {
        match prayer.following() {
            Some(next) => self.time_of(next),
            None => self.next_day_fajr(),
        }
    }

    /// Approximation of tomorrow's Fajr used once today's markers are exhausted.
    pub fn next_day_fajr(&self) -> DateTime<Utc> {
        self.fajr + Duration::hours(24)
    }

    /// Iterate over `(prayer, instant)` pairs in chronological order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Prayer, DateTime<Utc>)> + '_ {
        Prayer::ALL.iter().map(move |p| (*p, self.time_of(*p)))
    }

    /// Returns true when the markers are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        self.fajr < self.sunrise
            && self.sunrise < self.dhuhr
            && self.dhuhr < self.asr
            && self.asr < self.maghrib
            && self.maghrib < self.isha
    }
}
