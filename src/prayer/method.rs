//! Calculation method presets.
//!
//! Each preset fixes the sun depression angles used for Fajr and Isha and the shadow
//! factor used for Asr. Presets are plain tags; their parameters come from a lookup
//! table so the enum itself carries no behavior beyond naming.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Angle parameters of a calculation method.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct MethodParams {
    /// Sun depression below the horizon at Fajr, in degrees
    pub fajr_angle: f64,
    /// Sun depression at Isha in degrees; `0.0` means Isha is a fixed offset after Maghrib
    pub isha_angle: f64,
    /// Shadow length factor for Asr (1 = standard, 2 = Hanafi)
    pub asr_shadow_factor: f64,
}

impl MethodParams {
    /// Returns true when Isha is derived from Maghrib instead of an angle.
    pub fn uses_fixed_isha(&self) -> bool {
        self.isha_angle == 0.0
    }
}

/// The five supported calculation presets.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    #[default]
    UmmAlQura,
    MuslimWorldLeague,
    Egyptian,
    Karachi,
    NorthAmerica,
}

const UMM_AL_QURA: MethodParams = MethodParams {
    fajr_angle: 18.5,
    isha_angle: 0.0,
    asr_shadow_factor: 1.0,
};

const MUSLIM_WORLD_LEAGUE: MethodParams = MethodParams {
    fajr_angle: 18.0,
    isha_angle: 17.0,
    asr_shadow_factor: 1.0,
};

const EGYPTIAN: MethodParams = MethodParams {
    fajr_angle: 19.5,
    isha_angle: 17.5,
    asr_shadow_factor: 1.0,
};

const KARACHI: MethodParams = MethodParams {
    fajr_angle: 18.0,
    isha_angle: 18.0,
    asr_shadow_factor: 2.0,
};

const NORTH_AMERICA: MethodParams = MethodParams {
    fajr_angle: 15.0,
    isha_angle: 15.0,
    asr_shadow_factor: 1.0,
};

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 5] = [
        CalculationMethod::UmmAlQura,
        CalculationMethod::MuslimWorldLeague,
        CalculationMethod::Egyptian,
        CalculationMethod::Karachi,
        CalculationMethod::NorthAmerica,
    ];

    pub fn params(&self) -> MethodParams {
        match self {
            Self::UmmAlQura => UMM_AL_QURA,
            Self::MuslimWorldLeague => MUSLIM_WORLD_LEAGUE,
            Self::Egyptian => EGYPTIAN,
            Self::Karachi => KARACHI,
            Self::NorthAmerica => NORTH_AMERICA,
        }
    }

    /// Configuration key for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UmmAlQura => "umm_al_qura",
            Self::MuslimWorldLeague => "muslim_world_league",
            Self::Egyptian => "egyptian",
            Self::Karachi => "karachi",
            Self::NorthAmerica => "north_america",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::UmmAlQura => "Umm al-Qura",
            Self::MuslimWorldLeague => "Muslim World League",
            Self::Egyptian => "Egyptian General Authority",
            Self::Karachi => "University of Islamic Sciences, Karachi",
            Self::NorthAmerica => "Islamic Society of North America",
        }
    }

    /// Look up a method by configuration key, returning `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "umm_al_qura" | "ummalqura" | "makkah" => Some(Self::UmmAlQura),
            "muslim_world_league" | "mwl" => Some(Self::MuslimWorldLeague),
            "egyptian" | "egypt" => Some(Self::Egyptian),
            "karachi" => Some(Self::Karachi),
            "north_america" | "isna" => Some(Self::NorthAmerica),
            _ => None,
        }
    }

    /// Look up a method by configuration key, falling back to Umm al-Qura.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for CalculationMethod {
    type Err = std::convert::Infallible;

    /// Unknown names parse to Umm al-Qura.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name_or_default(s))
    }
}
