//! Daily routine slots and the scheduler that picks the active one.
//!
//! A slot is a named time-of-day bucket the user works through: four are driven by
//! clock-hour ranges (waking, morning, evening, sleep) and five follow the daily prayers.
//! Attributes live in a static table keyed by [`SlotKey`] so presentation data stays out of
//! the scheduling logic.

pub mod scheduler;
pub mod window;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::prayer::Prayer;

pub use scheduler::{ActiveRoutineContext, UpcomingEvent, UpcomingKind};
pub use window::{AfterPrayerPolicy, AfterPrayerWindow, HourRange, TimeWindowConfig};

/// Category of remembrance content a slot draws from.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DhikrCategory {
    /// Sub-category of [`DhikrCategory::Morning`] read on waking
    Waking,
    Morning,
    AfterPrayer,
    Evening,
    Sleep,
}

impl DhikrCategory {
    /// The top-level category; `Waking` rolls up into `Morning`.
    pub fn parent(&self) -> DhikrCategory {
        match self {
            Self::Waking => Self::Morning,
            other => *other,
        }
    }
}

/// The nine daily routine slots, in display order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    WakingUp,
    Morning,
    AfterFajr,
    AfterDhuhr,
    AfterAsr,
    AfterMaghrib,
    AfterIsha,
    Evening,
    Sleep,
}

/// Static attributes of a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAttributes {
    pub key: &'static str,
    pub sort_order: u8,
    pub display_name: &'static str,
    pub arabic_name: &'static str,
    pub category: DhikrCategory,
    pub prayer: Option<Prayer>,
}

static SLOT_TABLE: [SlotAttributes; 9] = [
    SlotAttributes {
        key: "waking_up",
        sort_order: 0,
        display_name: "Waking Up",
        arabic_name: "أذكار الاستيقاظ",
        category: DhikrCategory::Waking,
        prayer: None,
    },
    SlotAttributes {
        key: "morning",
        sort_order: 1,
        display_name: "Morning",
        arabic_name: "أذكار الصباح",
        category: DhikrCategory::Morning,
        prayer: None,
    },
    SlotAttributes {
        key: "after_fajr",
        sort_order: 2,
        display_name: "After Fajr",
        arabic_name: "أذكار بعد الفجر",
        category: DhikrCategory::AfterPrayer,
        prayer: Some(Prayer::Fajr),
    },
    SlotAttributes {
        key: "after_dhuhr",
        sort_order: 3,
        display_name: "After Dhuhr",
        arabic_name: "أذكار بعد الظهر",
        category: DhikrCategory::AfterPrayer,
        prayer: Some(Prayer::Dhuhr),
    },
    SlotAttributes {
        key: "after_asr",
        sort_order: 4,
        display_name: "After Asr",
        arabic_name: "أذكار بعد العصر",
        category: DhikrCategory::AfterPrayer,
        prayer: Some(Prayer::Asr),
    },
    SlotAttributes {
        key: "after_maghrib",
        sort_order: 5,
        display_name: "After Maghrib",
        arabic_name: "أذكار بعد المغرب",
        category: DhikrCategory::AfterPrayer,
        prayer: Some(Prayer::Maghrib),
    },
    SlotAttributes {
        key: "after_isha",
        sort_order: 6,
        display_name: "After Isha",
        arabic_name: "أذكار بعد العشاء",
        category: DhikrCategory::AfterPrayer,
        prayer: Some(Prayer::Isha),
    },
    SlotAttributes {
        key: "evening",
        sort_order: 7,
        display_name: "Evening",
        arabic_name: "أذكار المساء",
        category: DhikrCategory::Evening,
        prayer: None,
    },
    SlotAttributes {
        key: "sleep",
        sort_order: 8,
        display_name: "Sleep",
        arabic_name: "أذكار النوم",
        category: DhikrCategory::Sleep,
        prayer: None,
    },
];

impl SlotKey {
    pub const ALL: [SlotKey; 9] = [
        SlotKey::WakingUp,
        SlotKey::Morning,
        SlotKey::AfterFajr,
        SlotKey::AfterDhuhr,
        SlotKey::AfterAsr,
        SlotKey::AfterMaghrib,
        SlotKey::AfterIsha,
        SlotKey::Evening,
        SlotKey::Sleep,
    ];

    pub fn attributes(&self) -> &'static SlotAttributes {
        &SLOT_TABLE[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.attributes().key
    }

    pub fn sort_order(&self) -> u8 {
        self.attributes().sort_order
    }

    pub fn display_name(&self) -> &'static str {
        self.attributes().display_name
    }

    pub fn arabic_name(&self) -> &'static str {
        self.attributes().arabic_name
    }

    pub fn category(&self) -> DhikrCategory {
        self.attributes().category
    }

    /// The prayer an after-prayer slot follows.
    pub fn prayer(&self) -> Option<Prayer> {
        self.attributes().prayer
    }

    pub fn is_after_prayer(&self) -> bool {
        self.prayer().is_some()
    }

    /// Fixed successor of a clock-driven slot: waking → morning → evening → sleep → waking.
    pub fn successor(&self) -> Option<SlotKey> {
        match self {
            Self::WakingUp => Some(Self::Morning),
            Self::Morning => Some(Self::Evening),
            Self::Evening => Some(Self::Sleep),
            Self::Sleep => Some(Self::WakingUp),
            _ => None,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for SlotKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotKey::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown slot '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_declaration_order() {
        for (index, slot) in SlotKey::ALL.iter().enumerate() {
            assert_eq!(slot.sort_order() as usize, index);
        }
        let mut sorted = SlotKey::ALL;
        sorted.sort_by_key(|s| s.sort_order());
        assert_eq!(sorted, SlotKey::ALL);
    }

    #[test]
    fn test_five_after_prayer_slots_map_one_to_one() {
        let after: Vec<_> = SlotKey::ALL
            .into_iter()
            .filter(|s| s.is_after_prayer())
            .collect();
        assert_eq!(after.len(), 5);

        for prayer in Prayer::WITH_ADHAN {
            let slot = prayer.after_prayer_slot().unwrap();
            assert_eq!(slot.prayer(), Some(prayer));
            assert_eq!(slot.category(), DhikrCategory::AfterPrayer);
        }
        assert_eq!(Prayer::Sunrise.after_prayer_slot(), None);
    }

    #[test]
    fn test_waking_is_a_morning_sub_category() {
        assert_eq!(SlotKey::WakingUp.category(), DhikrCategory::Waking);
        assert_eq!(SlotKey::WakingUp.category().parent(), DhikrCategory::Morning);
        assert_eq!(SlotKey::Sleep.category().parent(), DhikrCategory::Sleep);
    }

    #[test]
    fn test_clock_successors_cycle() {
        let mut slot = SlotKey::WakingUp;
        let mut visited = vec![slot];
        for _ in 0..3 {
            slot = slot.successor().unwrap();
            visited.push(slot);
        }
        assert_eq!(
            visited,
            TimeWindowConfig::default()
                .ranges()
                .map(|(slot, _)| slot)
                .to_vec()
        );
        assert_eq!(SlotKey::Sleep.successor(), Some(SlotKey::WakingUp));
        assert_eq!(SlotKey::AfterAsr.successor(), None);
    }

    #[test]
    fn test_key_round_trip() {
        for slot in SlotKey::ALL {
            assert_eq!(slot.as_str().parse::<SlotKey>().unwrap(), slot);
            let json = serde_json::to_string(&slot).unwrap();
            assert_eq!(json, format!("\"{}\"", slot.as_str()));
        }
        assert!("lunch".parse::<SlotKey>().is_err());
    }
}
