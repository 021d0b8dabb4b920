//! Routine monitor.
//!
//! [`RoutineMonitor`] is the stateful shell around the pure scheduler: it keeps the current
//! day's [`PrayerTimes`], recomputes them when the local date, location or method changes,
//! and logs the active routine only when it differs from the previous tick.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::common::utils::{format_countdown, format_hm};
use crate::geo::ResolvedLocation;
use crate::prayer::{
    CalculationMethod, Coordinate, Prayer, PrayerTimes, compute, current_adhan, current_prayer,
};
use crate::slots::scheduler::{next_upcoming_event, resolve_active_context};
use crate::slots::{ActiveRoutineContext, SlotKey, TimeWindowConfig, UpcomingEvent, UpcomingKind};
use crate::ticker::{TickControl, TickHandler};

/// Everything worth showing about one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineStatus {
    pub now: DateTime<Tz>,
    pub current_prayer: Prayer,
    pub current_adhan: Option<Prayer>,
    pub active: Option<ActiveRoutineContext>,
    pub upcoming: UpcomingEvent,
}

impl RoutineStatus {
    pub fn evaluate(now: &DateTime<Tz>, times: &PrayerTimes, window: &TimeWindowConfig) -> Self {
        let at = now.with_timezone(&Utc);
        Self {
            now: now.clone(),
            current_prayer: current_prayer(times, at),
            current_adhan: current_adhan(times, at),
            active: resolve_active_context(now, times, window),
            upcoming: next_upcoming_event(now, times, window),
        }
    }

    /// Comparison key for change detection.
    pub fn state(&self) -> RoutineState {
        match &self.active {
            Some(context) => RoutineState::Active(context.slot),
            None => RoutineState::Idle(self.upcoming.kind),
        }
    }
}

/// What the monitor last announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineState {
    Active(SlotKey),
    /// No routine; waiting for the given boundary
    Idle(UpcomingKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimesKey {
    date: NaiveDate,
    coordinate: Coordinate,
    method: CalculationMethod,
}

pub struct RoutineMonitor {
    location: ResolvedLocation,
    method: CalculationMethod,
    window: TimeWindowConfig,
    debug_enabled: bool,
    times: Option<(TimesKey, PrayerTimes)>,
    last_state: Option<RoutineState>,
}

impl RoutineMonitor {
    pub fn new(
        location: ResolvedLocation,
        method: CalculationMethod,
        window: TimeWindowConfig,
        debug_enabled: bool,
    ) -> Self {
        Self {
            location,
            method,
            window,
            debug_enabled,
            times: None,
            last_state: None,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.location.timezone
    }

    pub fn set_location(&mut self, location: ResolvedLocation) {
        self.location = location;
    }

    pub fn set_method(&mut self, method: CalculationMethod) {
        self.method = method;
    }

    /// Prayer times currently held, if any tick has run.
    pub fn prayer_times(&self) -> Option<&PrayerTimes> {
        self.times.as_ref().map(|(_, times)| times)
    }

    pub fn last_state(&self) -> Option<RoutineState> {
        self.last_state
    }

    /// Return the day's prayer times, recomputing when the date, location or method changed.
    pub fn times_for(&mut self, date: NaiveDate) -> &PrayerTimes {
        let key = TimesKey {
            date,
            coordinate: self.location.coordinate,
            method: self.method,
        };

        let entry = match self.times.take() {
            Some((held, times)) if held == key => (held, times),
            _ => {
                let times = compute(date, key.coordinate, key.method);
                self.log_prayer_times(&times);
                (key, times)
            }
        };

        &self.times.insert(entry).1
    }

    /// Evaluate `now` and announce a routine change. Returns the status either way.
    pub fn update(&mut self, now: DateTime<Local>) -> RoutineStatus {
        let now = now.with_timezone(&self.location.timezone);
        let window = self.window;
        let status = RoutineStatus::evaluate(&now, self.times_for(now.date_naive()), &window);

        let state = status.state();
        if self.last_state != Some(state) {
            self.announce(&status);
            self.last_state = Some(state);
        }

        status
    }

    fn announce(&self, status: &RoutineStatus) {
        match &status.active {
            Some(context) => {
                log_block_start!(
                    "Active routine: {} ({})",
                    context.slot.display_name(),
                    context.slot.arabic_name()
                );
                if let Some(end) = &context.end_time
                    && let Some(remaining) = context.remaining(&status.now)
                {
                    log_indented!(
                        "Until {} ({} left)",
                        end.format("%H:%M"),
                        format_countdown(remaining)
                    );
                }
                if let Some(next) = &context.next_label {
                    log_indented!("Next: {}", next);
                }
            }
            None => {
                let wait = status.upcoming.time.clone().signed_duration_since(&status.now);
                log_block_start!("No active routine");
                log_indented!("Next: {} (in {})", status.upcoming, format_countdown(wait));
            }
        }

        if self.debug_enabled {
            log_pipe!();
            log_debug!(
                "Current prayer: {}, adhan: {}",
                status.current_prayer,
                status
                    .current_adhan
                    .map_or("none".to_string(), |p| p.to_string())
            );
        }
    }

    fn log_prayer_times(&self, times: &PrayerTimes) {
        log_block_start!(
            "Prayer times for {} ({})",
            times.date.format("%Y-%m-%d"),
            self.method.display_name()
        );
        for (prayer, instant) in times.iter() {
            log_indented!(
                "{:<8} {}",
                prayer.display_name(),
                format_hm(instant, &self.location.timezone)
            );
        }
    }
}

impl TickHandler for RoutineMonitor {
    fn on_tick(&mut self, now: DateTime<Local>) -> Result<TickControl> {
        self.update(now);
        Ok(TickControl::Continue)
    }
}
