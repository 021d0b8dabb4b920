//! Help output for athkari and its commands.

use anyhow::Result;

/// Brief usage for a command, shown next to argument errors.
pub fn show_command_usage(command: &str) {
    match command {
        "watch" | "w" => log_block_start!("Usage: athkari watch"),
        "times" | "t" => log_block_start!("Usage: athkari times [YYYY-MM-DD]"),
        "status" | "s" => log_block_start!("Usage: athkari status [--json]"),
        "simulate" | "S" => {
            log_block_start!("Usage: athkari simulate <start> <end> [multiplier] [--log]")
        }
        "help" | "h" => log_block_start!("Usage: athkari help [COMMAND]"),
        _ => log_block_start!("Usage: athkari [OPTIONS] [COMMAND]"),
    }
}

/// `athkari help [COMMAND]`.
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("watch") | Some("w") => display_watch_help(),
        Some("times") | Some("t") => display_times_help(),
        Some("status") | Some("s") => display_status_help(),
        Some("simulate") | Some("S") => display_simulate_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_warning_standalone!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Full usage, shown for `--help` and after argument errors.
pub fn display_usage() {
    log_version!();
    log_block_start!("Usage: athkari [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>      Use a custom configuration directory");
    log_indented!("-d, --debug             Show prayer details on every routine change");
    log_indented!("-h, --help              Print help information");
    log_indented!("-V, --version           Print version information");
    log_block_start!("Commands:");
    log_commands();
    log_pipe!();
    log_info!("Without a command athkari watches the active routine until interrupted.");
    log_end!();
}

fn log_commands() {
    log_indented!("watch, w                Watch the active routine (default)");
    log_indented!("times, t [DATE]         Print the prayer times for a day");
    log_indented!("status, s               Print the current prayer and routine");
    log_indented!("simulate, S <from> <to> Run the monitor on a simulated clock");
    log_indented!("help, h [COMMAND]       Show detailed help for a command");
}

fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_commands();
    log_pipe!();
    log_info!("Use 'athkari help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'athkari --help' to see all options and general usage.");
    log_end!();
}

fn display_watch_help() {
    log_version!();
    log_block_start!("watch - Follow the active routine");
    log_block_start!("Usage: athkari watch");
    log_block_start!("Description:");
    log_indented!("Checks the routine every update_interval seconds and logs each change.");
    log_indented!("After-prayer windows take priority over the clock-hour routines.");
    log_indented!("Stops on Ctrl+C or SIGTERM.");
    log_end!();
}

fn display_times_help() {
    log_version!();
    log_block_start!("times - Print prayer times");
    log_block_start!("Usage: athkari times [YYYY-MM-DD]");
    log_block_start!("Arguments:");
    log_indented!("DATE  Day to compute, today when omitted");
    log_block_start!("Examples:");
    log_indented!("athkari times");
    log_indented!("athkari times 2025-03-01");
    log_end!();
}

fn display_status_help() {
    log_version!();
    log_block_start!("status - Print the current state once");
    log_block_start!("Usage: athkari status [--json]");
    log_block_start!("Options:");
    log_indented!("-j, --json  Output as JSON");
    log_end!();
}

fn display_simulate_help() {
    log_version!();
    log_block_start!("simulate - Run on a simulated clock");
    log_block_start!("Usage: athkari simulate <start> <end> [multiplier] [--log]");
    log_block_start!("Arguments:");
    log_indented!("start       \"YYYY-MM-DD HH:MM:SS\" in the configured timezone");
    log_indented!("end         \"YYYY-MM-DD HH:MM:SS\", after start");
    log_indented!("multiplier  Time acceleration (default 3600, 0 = fast-forward)");
    log_block_start!("Options:");
    log_indented!("--log  Write output to a timestamped log file");
    log_block_start!("Examples:");
    log_indented!("athkari simulate \"2025-06-01 03:00:00\" \"2025-06-02 03:00:00\" 0");
    log_end!();
}

fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: athkari help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_end!();
}
