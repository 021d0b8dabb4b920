//! Command-line argument parsing.
//!
//! `athkari [OPTIONS] [COMMAND]`. Global flags may appear anywhere; the first non-flag
//! argument selects the command and the remaining positionals are its arguments.

use chrono::NaiveDate;

use crate::time_source::DEFAULT_MULTIPLIER;

#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Watch the active routine until interrupted (default)
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print a day's prayer times
    Times {
        debug_enabled: bool,
        config_dir: Option<String>,
        date: Option<NaiveDate>,
    },
    /// Print the current prayer and routine once
    Status {
        debug_enabled: bool,
        config_dir: Option<String>,
        json: bool,
    },
    /// Run the monitor against a simulated clock
    Simulate {
        debug_enabled: bool,
        config_dir: Option<String>,
        start_time: String,
        end_time: String,
        multiplier: f64,
        log_to_file: bool,
    },
    /// Show general or command help
    Help { command: Option<String> },
    ShowHelp,
    ShowVersion,
    ShowHelpDueToError,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

#[derive(Default)]
struct Flags {
    debug: bool,
    help: bool,
    version: bool,
    json: bool,
    log: bool,
    config_dir: Option<String>,
}

impl ParsedArgs {
    /// Parse arguments (program name first, as from `std::env::args()`).
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let action = match split_args(args) {
            Some((flags, positionals)) => resolve_action(flags, &positionals),
            None => CliAction::ShowHelpDueToError,
        };
        ParsedArgs { action }
    }
}

/// Separate flags from positionals. `None` when a flag is unknown or incomplete.
fn split_args<I, S>(args: I) -> Option<(Flags, Vec<String>)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = Flags::default();
    let mut positionals = Vec::new();
    let mut iter = args.into_iter().skip(1).map(|s| s.as_ref().to_string());

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--version" | "-V" | "-v" => flags.version = true,
            "--debug" | "-d" => flags.debug = true,
            "--json" | "-j" => flags.json = true,
            "--log" => flags.log = true,
            "--config" | "-c" => match iter.next() {
                Some(dir) if !dir.starts_with('-') => flags.config_dir = Some(dir),
                _ => {
                    log_warning_standalone!(
                        "Missing directory for --config. Usage: --config <directory>"
                    );
                    return None;
                }
            },
            // Negative numbers are positionals, not flags
            other if other.starts_with('-') && other.parse::<f64>().is_err() => {
                log_warning_standalone!("Unknown option: {}", other);
                return None;
            }
            _ => positionals.push(arg),
        }
    }

    Some((flags, positionals))
}

fn resolve_action(flags: Flags, positionals: &[String]) -> CliAction {
    if flags.version {
        return CliAction::ShowVersion;
    }

    let Some((command, rest)) = positionals.split_first() else {
        if flags.help {
            return CliAction::ShowHelp;
        }
        return CliAction::Run {
            debug_enabled: flags.debug,
            config_dir: flags.config_dir,
        };
    };

    if flags.help {
        return CliAction::Help {
            command: Some(command.clone()),
        };
    }

    match command.as_str() {
        "watch" | "w" if rest.is_empty() => CliAction::Run {
            debug_enabled: flags.debug,
            config_dir: flags.config_dir,
        },
        "times" | "t" => match rest {
            [] => CliAction::Times {
                debug_enabled: flags.debug,
                config_dir: flags.config_dir,
                date: None,
            },
            [date] => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(date) => CliAction::Times {
                    debug_enabled: flags.debug,
                    config_dir: flags.config_dir,
                    date: Some(date),
                },
                Err(_) => {
                    log_warning_standalone!("Invalid date '{}'. Use YYYY-MM-DD", date);
                    CliAction::ShowHelpDueToError
                }
            },
            _ => usage_error(command),
        },
        "status" | "s" if rest.is_empty() => CliAction::Status {
            debug_enabled: flags.debug,
            config_dir: flags.config_dir,
            json: flags.json,
        },
        "simulate" | "S" => parse_simulate(flags, command, rest),
        "help" | "h" => match rest {
            [] => CliAction::Help { command: None },
            [topic] => CliAction::Help {
                command: Some(topic.clone()),
            },
            _ => usage_error(command),
        },
        "watch" | "w" | "status" | "s" => usage_error(command),
        unknown => {
            log_warning_standalone!("Unknown command: {}", unknown);
            CliAction::ShowHelpDueToError
        }
    }
}

// simulate <start> <end> [multiplier]
fn parse_simulate(flags: Flags, command: &str, rest: &[String]) -> CliAction {
    let (start_time, end_time, multiplier) = match rest {
        [start, end] => (start, end, DEFAULT_MULTIPLIER),
        [start, end, multiplier] => match multiplier.parse::<f64>() {
            Ok(value) if value >= 0.0 => (start, end, value),
            _ => {
                log_warning_standalone!(
                    "Invalid multiplier '{}'. Use a number >= 0 (0 = fast-forward)",
                    multiplier
                );
                return CliAction::ShowHelpDueToError;
            }
        },
        _ => return usage_error(command),
    };

    CliAction::Simulate {
        debug_enabled: flags.debug,
        config_dir: flags.config_dir,
        start_time: start_time.clone(),
        end_time: end_time.clone(),
        multiplier,
        log_to_file: flags.log,
    }
}

fn usage_error(command: &str) -> CliAction {
    crate::commands::help::show_command_usage(command);
    CliAction::ShowHelpDueToError
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["athkari"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_and_config_anywhere() {
        let expected = CliAction::Status {
            debug_enabled: true,
            config_dir: Some("/tmp/cfg".to_string()),
            json: false,
        };
        assert_eq!(parse(&["-d", "status", "--config", "/tmp/cfg"]), expected);
        assert_eq!(parse(&["--config", "/tmp/cfg", "status", "--debug"]), expected);
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h"]), CliAction::ShowHelp);
        assert_eq!(parse(&["--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-V"]), CliAction::ShowVersion);
        // Version takes precedence
        assert_eq!(parse(&["--help", "--version"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_command_help() {
        assert_eq!(
            parse(&["help", "simulate"]),
            CliAction::Help {
                command: Some("simulate".to_string())
            }
        );
        assert_eq!(parse(&["help"]), CliAction::Help { command: None });
        assert_eq!(
            parse(&["times", "--help"]),
            CliAction::Help {
                command: Some("times".to_string())
            }
        );
    }

    #[test]
    fn test_parse_watch_alias() {
        assert!(matches!(parse(&["watch"]), CliAction::Run { .. }));
        assert!(matches!(parse(&["w", "-d"]), CliAction::Run { debug_enabled: true, .. }));
    }

    #[test]
    fn test_parse_times_with_date() {
        assert_eq!(
            parse(&["times", "2025-06-01"]),
            CliAction::Times {
                debug_enabled: false,
                config_dir: None,
                date: NaiveDate::from_ymd_opt(2025, 6, 1),
            }
        );
        assert!(matches!(parse(&["times"]), CliAction::Times { date: None, .. }));
        assert_eq!(parse(&["times", "June"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_status_json() {
        assert!(matches!(parse(&["status", "--json"]), CliAction::Status { json: true, .. }));
    }

    #[test]
    fn test_parse_simulate() {
        assert_eq!(
            parse(&["simulate", "2025-06-01 04:00:00", "2025-06-01 22:00:00", "0", "--log"]),
            CliAction::Simulate {
                debug_enabled: false,
                config_dir: None,
                start_time: "2025-06-01 04:00:00".to_string(),
                end_time: "2025-06-01 22:00:00".to_string(),
                multiplier: 0.0,
                log_to_file: true,
            }
        );

        assert!(matches!(
            parse(&["simulate", "2025-06-01 04:00:00", "2025-06-01 22:00:00"]),
            CliAction::Simulate { multiplier, .. } if multiplier == DEFAULT_MULTIPLIER
        ));
    }

    #[test]
    fn test_parse_simulate_errors() {
        assert_eq!(parse(&["simulate", "2025-06-01 04:00:00"]), CliAction::ShowHelpDueToError);
        assert_eq!(
            parse(&["simulate", "a", "b", "-5"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(parse(&["simulate", "a", "b", "fast"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_unknown_input() {
        assert_eq!(parse(&["--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["pray"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["status", "extra"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
    }
}
