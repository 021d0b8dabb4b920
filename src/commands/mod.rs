//! Command handlers.
//!
//! Each command lives in its own submodule. The long-running ones (`watch` and `simulate`)
//! share [`run_monitor`].

pub mod help;
pub mod simulate;
pub mod status;
pub mod times;
pub mod watch;

use anyhow::Result;

use crate::config::Config;
use crate::monitor::RoutineMonitor;
use crate::ticker::{StopReason, Ticker};

/// Run a [`RoutineMonitor`] built from `config` until cancelled or the clock runs out.
pub fn run_monitor(config: &Config, debug_enabled: bool) -> Result<StopReason> {
    let mut monitor = RoutineMonitor::new(
        config.location(),
        config.method(),
        config.window_config(),
        debug_enabled,
    );

    let ticker = Ticker::new(config.update_interval());
    ticker.handle().cancel_on_signals()?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Checking every {}s", ticker.interval().as_secs());
    }

    ticker.run(&mut monitor)
}
