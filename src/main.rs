//! athkari entry point.
//!
//! Parses the command line and dispatches to a command handler. Without a command the
//! routine monitor runs until interrupted.

use anyhow::Result;

use athkari::args::{CliAction, ParsedArgs};
use athkari::commands;
use athkari::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use athkari::{config, log_error_exit};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args());

    let code = match run(parsed.action) {
        Ok(code) => code,
        Err(e) => {
            log_error_exit!("{:#}", e);
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}

fn run(action: CliAction) -> Result<i32> {
    match action {
        CliAction::ShowVersion => {
            println!("athkari {}", env!("CARGO_PKG_VERSION"));
        }
        CliAction::ShowHelp => commands::help::display_usage(),
        CliAction::ShowHelpDueToError => {
            commands::help::display_usage();
            return Ok(EXIT_FAILURE);
        }
        CliAction::Help { command } => commands::help::run_help_command(command.as_deref())?,
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::watch::handle_watch_command(debug_enabled)?;
        }
        CliAction::Times {
            debug_enabled,
            config_dir,
            date,
        } => {
            config::set_config_dir(config_dir)?;
            commands::times::handle_times_command(date, debug_enabled)?;
        }
        CliAction::Status {
            debug_enabled: _,
            config_dir,
            json,
        } => {
            // Keep stdout clean for the report
            athkari::logger::Log::set_enabled(false);
            config::set_config_dir(config_dir)?;
            let result = commands::status::handle_status_command(json);
            athkari::logger::Log::set_enabled(true);
            result?;
        }
        CliAction::Simulate {
            debug_enabled,
            config_dir,
            start_time,
            end_time,
            multiplier,
            log_to_file,
        } => {
            config::set_config_dir(config_dir)?;
            commands::simulate::handle_simulate_command(
                start_time,
                end_time,
                multiplier,
                log_to_file,
                debug_enabled,
            )?;
        }
    }

    Ok(EXIT_SUCCESS)
}
