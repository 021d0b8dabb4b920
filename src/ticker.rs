//! Periodic, cancellable tick driver.
//!
//! The ticker owns no domain state. It hands the current time to a [`TickHandler`]
//! immediately and then once per interval until the handler asks to stop, the
//! [`TickerHandle`] is cancelled (directly or by SIGINT/SIGTERM), or a simulated clock runs
//! out.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::time_source;

/// Longest uninterrupted real-time sleep, so cancellation is noticed promptly.
const CANCEL_CHECK_SLICE: Duration = Duration::from_secs(1);

/// What the handler wants after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Why [`Ticker::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    HandlerStopped,
    SimulationEnded,
}

pub trait TickHandler {
    fn on_tick(&mut self, now: DateTime<Local>) -> Result<TickControl>;
}

/// Shared cancellation flag for a running ticker.
#[derive(Debug, Clone, Default)]
pub struct TickerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickerHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancel this handle when SIGINT or SIGTERM arrives.
    pub fn cancel_on_signals(&self) -> Result<()> {
        let mut signals =
            Signals::new([SIGINT, SIGTERM]).context("failed to register signal handlers")?;
        let handle = self.clone();

        thread::spawn(move || {
            if let Some(sig) = signals.forever().next() {
                let name = if sig == SIGINT { "SIGINT" } else { "SIGTERM" };
                log_pipe!();
                log_info!("Received {}, stopping", name);
                handle.cancel();
            }
        });

        Ok(())
    }
}

pub struct Ticker {
    interval: Duration,
    handle: TickerHandle,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: TickerHandle::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn handle(&self) -> TickerHandle {
        self.handle.clone()
    }

    /// Drive `handler` until stopped. Handler errors end the run and are returned.
    pub fn run<H: TickHandler + ?Sized>(&self, handler: &mut H) -> Result<StopReason> {
        loop {
            if self.handle.is_cancelled() {
                return Ok(StopReason::Cancelled);
            }

            if handler.on_tick(time_source::now())? == TickControl::Stop {
                return Ok(StopReason::HandlerStopped);
            }

            if time_source::simulation_ended() {
                return Ok(StopReason::SimulationEnded);
            }

            self.wait();
        }
    }

    fn wait(&self) {
        // Simulated clocks scale the sleep themselves
        if time_source::is_simulated() {
            time_source::sleep(self.interval);
            return;
        }

        let mut remaining = self.interval;
        while !remaining.is_zero() && !self.handle.is_cancelled() {
            let slice = remaining.min(CANCEL_CHECK_SLICE);
            time_source::sleep(slice);
            remaining -= slice;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHandler {
        ticks: usize,
        stop_after: usize,
    }

    impl TickHandler for CountingHandler {
        fn on_tick(&mut self, _now: DateTime<Local>) -> Result<TickControl> {
            self.ticks += 1;
            if self.ticks >= self.stop_after {
                Ok(TickControl::Stop)
            } else {
                Ok(TickControl::Continue)
            }
        }
    }

    struct CancellingHandler {
        handle: TickerHandle,
        ticks: usize,
    }

    impl TickHandler for CancellingHandler {
        fn on_tick(&mut self, _now: DateTime<Local>) -> Result<TickControl> {
            self.ticks += 1;
            self.handle.cancel();
            Ok(TickControl::Continue)
        }
    }

    struct FailingHandler;

    impl TickHandler for FailingHandler {
        fn on_tick(&mut self, _now: DateTime<Local>) -> Result<TickControl> {
            anyhow::bail!("tick failed")
        }
    }

    #[test]
    fn test_handler_stop_ends_run() {
        let ticker = Ticker::new(Duration::from_millis(1));
        let mut handler = CountingHandler {
            ticks: 0,
            stop_after: 3,
        };
        assert_eq!(ticker.run(&mut handler).unwrap(), StopReason::HandlerStopped);
        assert_eq!(handler.ticks, 3);
    }

    #[test]
    fn test_first_tick_is_immediate() {
        // A long interval would hang the test if the first tick waited for it
        let ticker = Ticker::new(Duration::from_secs(3600));
        let mut handler = CountingHandler {
            ticks: 0,
            stop_after: 1,
        };
        ticker.run(&mut handler).unwrap();
        assert_eq!(handler.ticks, 1);
    }

    #[test]
    fn test_cancel_stops_before_next_tick() {
        let ticker = Ticker::new(Duration::from_millis(1));
        let mut handler = CancellingHandler {
            handle: ticker.handle(),
            ticks: 0,
        };
        assert_eq!(ticker.run(&mut handler).unwrap(), StopReason::Cancelled);
        assert_eq!(handler.ticks, 1);
    }

    #[test]
    fn test_cancelled_ticker_never_ticks() {
        let ticker = Ticker::new(Duration::from_millis(1));
        ticker.handle().cancel();
        let mut handler = CountingHandler {
            ticks: 0,
            stop_after: 10,
        };
        assert_eq!(ticker.run(&mut handler).unwrap(), StopReason::Cancelled);
        assert_eq!(handler.ticks, 0);
    }

    #[test]
    fn test_handler_error_propagates() {
        let ticker = Ticker::new(Duration::from_millis(1));
        assert!(ticker.run(&mut FailingHandler).is_err());
    }
}
