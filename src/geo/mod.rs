//! Location resolution.
//!
//! Provides the coordinate and timezone the prayer engine runs against. Coordinates come
//! from the configuration; when none are set the engine falls back to Mecca. The timezone is
//! taken from the configuration or detected from the coordinates with `tzf-rs`.

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;

use crate::common::constants::{DEFAULT_COORDINATE, DEFAULT_TIMEZONE};
use crate::prayer::Coordinate;


// Building the finder decodes the bundled boundary data, so do it once
static FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// Where a resolved location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Configured,
    Default,
}

/// Coordinate and zone the engine runs against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub timezone: Tz,
    pub source: LocationSource,
}

impl ResolvedLocation {
    pub fn is_default(&self) -> bool {
        self.source == LocationSource::Default
    }
}

/// Timezone for a coordinate, falling back to UTC over open water or on lookup failure.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    let name = FINDER.get_tz_name(longitude, latitude);
    name.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// Resolve the location from optional configured values.
///
/// Both coordinates must be present to be used. An explicit timezone wins over detection.
pub fn resolve_location(
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<Tz>,
) -> ResolvedLocation {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => ResolvedLocation {
            coordinate: Coordinate::new(lat, lon),
            timezone: timezone.unwrap_or_else(|| determine_timezone_from_coordinates(lat, lon)),
            source: LocationSource::Configured,
        },
        _ => ResolvedLocation {
            coordinate: DEFAULT_COORDINATE,
            timezone: timezone.unwrap_or_else(default_timezone),
            source: LocationSource::Default,
        },
    }
}

fn default_timezone() -> Tz {
    DEFAULT_TIMEZONE.parse().unwrap_or(Tz::UTC)
}

/// Log where the location came from, as part of the current block.
pub fn log_location(location: &ResolvedLocation) {
    if location.is_default() {
        log_decorated!("No coordinates configured, using Mecca");
    }
    log_indented!("Location: {}", location.coordinate);
    log_indented!("Timezone: {}", location.timezone);
}
