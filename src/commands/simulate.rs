//! `athkari simulate`: run the monitor against an accelerated clock.
//!
//! Start and end are read in the configured timezone, so a simulation of "Fajr in Mecca"
//! behaves the same wherever it is run.

use anyhow::{Context, Result};
use chrono::Local;
use std::sync::Arc;

use crate::config::Config;
use crate::logger::Log;
use crate::time_source::{self, SimulatedTimeSource};

pub fn handle_simulate_command(
    start_time: String,
    end_time: String,
    multiplier: f64,
    log_to_file: bool,
    debug_enabled: bool,
) -> Result<()> {
    let config = Config::load()?;
    let tz = config.location().timezone;

    let start = time_source::parse_datetime_in(&start_time, &tz).context("Invalid start time")?;
    let end = time_source::parse_datetime_in(&end_time, &tz).context("Invalid end time")?;
    if end <= start {
        anyhow::bail!("End time must be after start time");
    }

    let _log_guard = if log_to_file {
        let filename = format!(
            "athkari-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        );
        println!("Writing simulation output to {filename}");
        Some(Log::start_file_logging(filename)?)
    } else {
        None
    };

    // Install the clock before logging so every line carries simulated time
    let source = SimulatedTimeSource::new(
        start.with_timezone(&Local),
        end.with_timezone(&Local),
        multiplier,
    );
    let fast_forward = source.is_fast_forward();
    time_source::init_time_source(Arc::new(source))
        .context("Failed to install the simulated clock")?;
    Log::set_display_zone(tz);

    log_version!();
    log_block_start!("Simulation Mode");
    let duration = end.clone().signed_duration_since(&start);
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );
    if fast_forward {
        log_indented!("Time acceleration: fast-forward");
    } else {
        log_indented!(
            "Time acceleration: {}x (about {:.1} seconds)",
            multiplier as u64,
            duration.num_seconds() as f64 / multiplier
        );
    }

    config.log_config();

    let reason = super::run_monitor(&config, debug_enabled)?;
    if debug_enabled {
        log_pipe!();
        log_debug!("Monitor stopped: {:?}", reason);
    }
    log_end!();
    Ok(())
}
