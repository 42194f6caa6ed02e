//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a
//! clean interface for the main application logic. It supports the
//! standard help, version, and debug flags while gracefully handling
//! unknown options.

use crate::color::Preset;
use crate::logger::Log;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the scheduler with these settings
    Run { debug_enabled: bool },
    /// Apply a single temperature and exit (presets already resolved)
    Set { kelvin: u32 },
    /// Restore the neutral 6500K state and exit
    Reset,
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run,
    Set(u32),
    Reset,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// Commands are `set <kelvin|preset>`, `reset`, and `run`; preset names
    /// are resolved to their Kelvin values here, at configuration time.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut command: Option<Command> = None;
        let mut unknown_arg_found = false;

        let mut i = 0;
        while i < args_vec.len() {
            let arg = args_vec[i].as_str();
            match arg {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "set" if command.is_none() => {
                    if i + 1 < args_vec.len() {
                        i += 1;
                        let value = &args_vec[i];
                        match value.parse::<u32>() {
                            Ok(kelvin) => command = Some(Command::Set(kelvin)),
                            Err(_) => match Preset::from_name(value) {
                                Some(preset) => command = Some(Command::Set(preset.kelvin())),
                                None => {
                                    Log::log_warning(&format!(
                                        "Unknown temperature or preset: {}",
                                        value
                                    ));
                                    unknown_arg_found = true;
                                }
                            },
                        }
                    } else {
                        Log::log_warning(
                            "Missing value for set. Usage: set <kelvin|day|night|sunset|candle>",
                        );
                        unknown_arg_found = true;
                    }
                }
                "reset" if command.is_none() => command = Some(Command::Reset),
                "run" if command.is_none() => command = Some(Command::Run),
                _ => {
                    if arg.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg));
                    } else {
                        Log::log_warning(&format!("Unknown command: {}", arg));
                    }
                    unknown_arg_found = true;
                }
            }
            i += 1;
        }

        let action = if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if display_version {
            CliAction::ShowVersion
        } else {
            match command {
                Some(Command::Set(kelvin)) => CliAction::Set { kelvin },
                Some(Command::Reset) => CliAction::Reset,
                Some(Command::Run) => CliAction::Run { debug_enabled },
                None => CliAction::ShowHelp,
            }
        };

        ParsedArgs { action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        Log::set_enabled(false);
        ParsedArgs::parse(args.iter().copied()).action
    }

    #[test]
    fn test_no_arguments_shows_help() {
        assert_eq!(parse(&["sundown"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_run_command() {
        assert_eq!(
            parse(&["sundown", "run"]),
            CliAction::Run {
                debug_enabled: false
            }
        );
        assert_eq!(
            parse(&["sundown", "run", "--debug"]),
            CliAction::Run {
                debug_enabled: true
            }
        );
        assert_eq!(
            parse(&["sundown", "-d", "run"]),
            CliAction::Run {
                debug_enabled: true
            }
        );
    }

    #[test]
    fn test_set_with_kelvin_value() {
        assert_eq!(parse(&["sundown", "set", "3400"]), CliAction::Set { kelvin: 3400 });
    }

    #[test]
    fn test_set_with_preset_names() {
        assert_eq!(parse(&["sundown", "set", "day"]), CliAction::Set { kelvin: 6500 });
        assert_eq!(parse(&["sundown", "set", "night"]), CliAction::Set { kelvin: 3400 });
        assert_eq!(
            parse(&["sundown", "set", "sunset"]),
            CliAction::Set { kelvin: 2600 }
        );
        assert_eq!(
            parse(&["sundown", "set", "candle"]),
            CliAction::Set { kelvin: 1900 }
        );
    }

    #[test]
    fn test_set_with_bad_value() {
        assert_eq!(parse(&["sundown", "set", "dusk"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["sundown", "set"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_reset_command() {
        assert_eq!(parse(&["sundown", "reset"]), CliAction::Reset);
    }

    #[test]
    fn test_help_and_version_flags() {
        assert_eq!(parse(&["sundown", "--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["sundown", "-h"]), CliAction::ShowHelp);
        assert_eq!(parse(&["sundown", "--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["sundown", "-V"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_help_wins_over_command() {
        assert_eq!(parse(&["sundown", "run", "--help"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_unknown_arguments() {
        assert_eq!(parse(&["sundown", "--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["sundown", "dance"]), CliAction::ShowHelpDueToError);
    }
}
