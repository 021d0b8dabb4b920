//! `athkari times`: print one day's prayer times.

use anyhow::Result;
use chrono::NaiveDate;

use crate::common::utils::format_hm;
use crate::config::Config;
use crate::prayer::compute;

pub fn handle_times_command(date: Option<NaiveDate>, debug_enabled: bool) -> Result<()> {
    let config = Config::load()?;
    let location = config.location();
    let method = config.method();
    let date = date.unwrap_or_else(|| {
        crate::time_source::now()
            .with_timezone(&location.timezone)
            .date_naive()
    });

    let times = compute(date, location.coordinate, method);

    log_version!();
    log_block_start!("Prayer times for {}", date.format("%A %Y-%m-%d"));
    crate::geo::log_location(&location);
    log_indented!("Method: {}", method.display_name());
    log_pipe!();
    for (prayer, instant) in times.iter() {
        log_decorated!(
            "{:<8} {}  {}",
            prayer.display_name(),
            format_hm(instant, &location.timezone),
            prayer.arabic_name()
        );
    }

    if debug_enabled {
        let sun = crate::prayer::solar::solar_position(date, location.coordinate.longitude);
        log_pipe!();
        log_debug!(
            "Day {}, declination {:.3}°, equation of time {:.2} min",
            sun.day_of_year,
            sun.declination.to_degrees(),
            sun.equation_of_time_minutes
        );
    }

    log_end!();
    Ok(())
}
