//! `athkari watch`: follow the active routine until interrupted.

use anyhow::Result;

use crate::config::Config;

pub fn handle_watch_command(debug_enabled: bool) -> Result<()> {
    log_version!();
    let config = Config::load()?;
    config.log_config();

    let reason = super::run_monitor(&config, debug_enabled)?;
    if debug_enabled {
        log_pipe!();
        log_debug!("Monitor stopped: {:?}", reason);
    }
    log_end!();
    Ok(())
}
