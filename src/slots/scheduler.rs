//! Active routine resolution.
//!
//! The scheduler is a total function of `(now, prayer_times, window_config)` with no memory
//! of earlier evaluations. Callers re-evaluate it on every tick; any smoothing between
//! successive results (e.g. to avoid flicker) belongs to the caller.
//!
//! ## Priority
//!
//! 1. An open after-prayer window wins over everything else.
//! 2. Otherwise the first clock range containing the current hour, checked in the order
//!    waking, morning, evening, sleep.
//! 3. Otherwise nothing is active and callers typically show [`next_upcoming_event`].

use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt;

use super::SlotKey;
use super::window::{TimeWindowConfig, local_at_hour, next_hour_occurrence};
use crate::prayer::{
    Prayer, PrayerTimes, current_adhan, is_post_prayer_ready, next_prayer, post_prayer_window_end,
};

/// The routine to show right now.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoutineContext {
    pub slot: SlotKey,
    /// When this routine stops being active
    pub end_time: Option<DateTime<Tz>>,
    /// Label of what comes after this routine
    pub next_label: Option<String>,
}

impl ActiveRoutineContext {
    /// Time left until `end_time`, clamped at zero.
    pub fn remaining(&self, now: &DateTime<Tz>) -> Option<Duration> {
        self.end_time
            .clone()
            .map(|end| end.signed_duration_since(now).max(Duration::zero()))
    }
}

/// What an upcoming boundary refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpcomingKind {
    Prayer(Prayer),
    Slot(SlotKey),
}

/// The nearest future boundary, shown as a countdown when no routine is active.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingEvent {
    pub kind: UpcomingKind,
    pub time: DateTime<Tz>,
}

impl UpcomingEvent {
    pub fn label(&self) -> String {
        match self.kind {
            UpcomingKind::Prayer(prayer) => prayer.display_name().to_string(),
            UpcomingKind::Slot(slot) => slot.display_name().to_string(),
        }
    }
}

impl fmt::Display for UpcomingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.label(), self.time.format("%H:%M"))
    }
}

/// Resolve which routine is active at `now`, or `None` inside a gap.
pub fn resolve_active_context(
    now: &DateTime<Tz>,
    times: &PrayerTimes,
    config: &TimeWindowConfig,
) -> Option<ActiveRoutineContext> {
    let tz = now.timezone();
    let at = now.with_timezone(&Utc);

    if let Some(prayer) = current_adhan(times, at)
        && let Some(slot) = prayer.after_prayer_slot()
        && is_post_prayer_ready(times, prayer, at, config.after_prayer)
    {
        // Prayer times roll over at local midnight, which ends any window still open
        let midnight = local_at_hour(&tz, now.date_naive() + Duration::days(1), 0);
        let end_time = post_prayer_window_end(times, prayer, config.after_prayer)
            .with_timezone(&tz)
            .min(midnight);
        return Some(ActiveRoutineContext {
            slot,
            end_time: Some(end_time),
            next_label: Some(next_upcoming_event(now, times, config).label()),
        });
    }

    let hour = now.hour();
    config
        .ranges()
        .into_iter()
        .find(|(_, range)| range.contains_hour(hour))
        .map(|(slot, range)| ActiveRoutineContext {
            slot,
            end_time: Some(next_hour_occurrence(now, range.end)),
            next_label: slot.successor().map(|next| next.display_name().to_string()),
        })
}

/// The nearest future boundary: the next prayer or the next start of a clock range.
///
/// The prayer candidate is considered first, so it wins ties against range starts.
pub fn next_upcoming_event(
    now: &DateTime<Tz>,
    times: &PrayerTimes,
    config: &TimeWindowConfig,
) -> UpcomingEvent {
    let tz = now.timezone();
    let next = next_prayer(times, now.with_timezone(&Utc), config.include_sunrise);

    let prayer_candidate = UpcomingEvent {
        kind: UpcomingKind::Prayer(next.prayer),
        time: next.time.with_timezone(&tz),
    };

    let range_candidates = config
        .ranges()
        .into_iter()
        .map(|(slot, range)| UpcomingEvent {
            kind: UpcomingKind::Slot(slot),
            time: next_hour_occurrence(now, range.start),
        });

    range_candidates.fold(prayer_candidate, |best, candidate| {
        if candidate.time < best.time {
            candidate
        } else {
            best
        }
    })
}
