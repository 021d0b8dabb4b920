//! Clock abstraction so the monitor can run on real or simulated time.
//!
//! Everything that needs "now" or needs to wait goes through the global source installed
//! with [`init_time_source`]. Without an explicit source the real clock is used.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local, LocalResult, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration as StdDuration, Instant};

static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Wait for `duration` of this source's time.
    fn sleep(&self, duration: StdDuration);

    fn is_simulated(&self) -> bool;

    /// Whether a simulated run has reached its end (never for real time).
    fn is_ended(&self) -> bool {
        false
    }
}

/// The system clock.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Accelerated clock running from `start` to `end`.
///
/// With a positive multiplier simulated time flows continuously (60.0 = one simulated
/// minute per real second). A multiplier of 0 fast-forwards: every `sleep` jumps the clock
/// by exactly the requested amount.
pub struct SimulatedTimeSource {
    start: DateTime<Local>,
    end: DateTime<Local>,
    multiplier: f64,
    state: Mutex<SimulationState>,
}

#[derive(Default)]
struct SimulationState {
    /// Simulated time already slept through
    elapsed: StdDuration,
    /// Sleep currently underway: real start and simulated length
    in_progress: Option<(Instant, StdDuration)>,
}

/// Multiplier used when a negative value is supplied.
pub const DEFAULT_MULTIPLIER: f64 = 3600.0;

impl SimulatedTimeSource {
    pub fn new(start: DateTime<Local>, end: DateTime<Local>, multiplier: f64) -> Self {
        let multiplier = if multiplier < 0.0 {
            DEFAULT_MULTIPLIER
        } else {
            multiplier
        };
        Self {
            start,
            end,
            multiplier,
            state: Mutex::new(SimulationState::default()),
        }
    }

    pub fn is_fast_forward(&self) -> bool {
        self.multiplier == 0.0
    }

    fn state(&self) -> MutexGuard<'_, SimulationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current_time(&self) -> DateTime<Local> {
        let state = self.state();
        let mut simulated = state.elapsed;

        if let Some((started, length)) = state.in_progress {
            let progressed = started.elapsed().as_secs_f64() * self.multiplier;
            simulated += StdDuration::from_secs_f64(progressed.min(length.as_secs_f64()));
        }

        self.offset_from_start(simulated)
    }

    fn offset_from_start(&self, elapsed: StdDuration) -> DateTime<Local> {
        let offset =
            ChronoDuration::from_std(elapsed).unwrap_or_else(|_| ChronoDuration::weeks(5200));
        self.start
            .checked_add_signed(offset)
            .map_or(self.end, |t| t.min(self.end))
    }

    /// Simulated time still left before the end.
    fn remaining(&self) -> StdDuration {
        let elapsed = self.state().elapsed;
        (self.end - self.offset_from_start(elapsed))
            .to_std()
            .unwrap_or(StdDuration::ZERO)
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let step = duration.min(self.remaining());
        if step.is_zero() {
            return;
        }

        if self.is_fast_forward() {
            self.state().elapsed += step;
            // Yield so log output keeps up
            std::thread::sleep(StdDuration::from_millis(1));
            return;
        }

        self.state().in_progress = Some((Instant::now(), step));
        std::thread::sleep(StdDuration::from_secs_f64(step.as_secs_f64() / self.multiplier));

        let mut state = self.state();
        state.in_progress = None;
        state.elapsed += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end
    }
}

/// Install the global time source.
///
/// Fails if a source is already installed, including the real clock installed implicitly by
/// an earlier [`now`] or [`sleep`].
pub fn init_time_source(source: Arc<dyn TimeSource>) -> Result<()> {
    TIME_SOURCE
        .set(source)
        .map_err(|_| anyhow::anyhow!("Time source already initialized"))
}

pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

fn source() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource))
}

pub fn now() -> DateTime<Local> {
    source().now()
}

pub fn sleep(duration: StdDuration) {
    source().sleep(duration)
}

pub fn is_simulated() -> bool {
    source().is_simulated()
}

pub fn simulation_ended() -> bool {
    source().is_ended()
}

/// Parse `"YYYY-MM-DD HH:MM:SS"` as local time in the zone `tz`.
///
/// Ambiguous times take the earlier instant. Times skipped by a DST jump move one hour
/// forward, matching how routine boundaries are resolved.
pub fn parse_datetime_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Invalid datetime '{s}'. Use YYYY-MM-DD HH:MM:SS"))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + ChronoDuration::hours(1)))
            .earliest()
            .with_context(|| format!("'{s}' does not exist in the target timezone")),
    }
}

/// Parse `"YYYY-MM-DD HH:MM:SS"` in the system zone.
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>> {
    parse_datetime_in(s, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> DateTime<Local> {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn test_parse_datetime_rejects_bad_input() {
        assert!(parse_datetime("2025-06-01 05:10:00").is_ok());
        assert!(parse_datetime("2025-06-01").is_err());
        assert!(parse_datetime("tomorrow").is_err());
    }

    #[test]
    fn test_parse_datetime_in_zone() {
        let parsed = parse_datetime_in("2025-06-01 05:10:00", &chrono_tz::Asia::Riyadh).unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "05:10");
    }

    #[test]
    fn test_parse_datetime_in_dst_gap_moves_forward() {
        let tz = chrono_tz::America::New_York;

        // 02:30 is skipped on 2025-03-09
        let parsed = parse_datetime_in("2025-03-09 02:30:00", &tz).unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "03:30");
        assert_eq!(
            parsed.with_timezone(&chrono::Utc).format("%H:%M").to_string(),
            "07:30"
        );

        // 01:30 happens twice on 2025-11-02; EDT comes first
        let parsed = parse_datetime_in("2025-11-02 01:30:00", &tz).unwrap();
        assert_eq!(
            parsed.with_timezone(&chrono::Utc).format("%H:%M").to_string(),
            "05:30"
        );
    }

    #[test]
    fn test_fast_forward_advances_by_sleep_amount() {
        let start = local("2025-06-01 05:00:00");
        let end = local("2025-06-01 06:00:00");
        let source = SimulatedTimeSource::new(start, end, 0.0);

        assert_eq!(source.now(), start);
        source.sleep(StdDuration::from_secs(600));
        assert_eq!(source.now(), start + ChronoDuration::minutes(10));
        assert!(!source.is_ended());
    }

    #[test]
    fn test_fast_forward_stops_at_end() {
        let start = local("2025-06-01 05:00:00");
        let end = local("2025-06-01 05:30:00");
        let source = SimulatedTimeSource::new(start, end, 0.0);

        source.sleep(StdDuration::from_secs(3600));
        assert_eq!(source.now(), end);
        assert!(source.is_ended());

        // Further sleeps are no-ops
        source.sleep(StdDuration::from_secs(60));
        assert_eq!(source.now(), end);
    }

    #[test]
    fn test_accelerated_sleep_accumulates() {
        let start = local("2025-06-01 05:00:00");
        let end = local("2025-06-01 07:00:00");
        let source = SimulatedTimeSource::new(start, end, 36_000.0);

        // 60 simulated minutes at 36000x is 0.1s of real time
        source.sleep(StdDuration::from_secs(3600));
        assert_eq!(source.now(), start + ChronoDuration::hours(1));
    }
}
