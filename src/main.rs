//! oplog entry point.
//!
//! ## CLI Subcommands
//!
//! - `oplog policies check <FILE>` - Validate a policy file (exit 0/1/2)
//! - `oplog config show|defaults` - Print configuration
//! - `oplog demo` - Run the interception demo
//! - `oplog version` / `oplog help`

use std::path::Path;
use std::process::ExitCode;

use oplog::cli::{config_cmd, run_check, run_demo};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match command {
        "policies" | "policy" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("check");
            match subcommand {
                "check" => {
                    let path = args
                        .get(3)
                        .cloned()
                        .or_else(|| std::env::var("OPLOG_POLICY_FILE").ok());
                    match path {
                        Some(path) => ExitCode::from(run_check(Path::new(&path)) as u8),
                        None => {
                            eprintln!("Missing policy file path");
                            print_command_help("policies");
                            ExitCode::from(2u8)
                        }
                    }
                }
                _ => {
                    eprintln!("Unknown policies subcommand: {}", subcommand);
                    print_command_help("policies");
                    ExitCode::FAILURE
                }
            }
        }
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => {
                    config_cmd::run_show();
                    ExitCode::SUCCESS
                }
                "defaults" => {
                    config_cmd::run_defaults();
                    ExitCode::SUCCESS
                }
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    ExitCode::FAILURE
                }
            }
        }
        "demo" => ExitCode::from(run_demo() as u8),
        "help" | "--help" | "-h" => {
            if let Some(subcommand) = args.get(2) {
                print_command_help(subcommand);
            } else {
                print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("oplog {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "oplog - policy-driven call logging v{}

USAGE:
    oplog <COMMAND> [OPTIONS]

COMMANDS:
    policies     Validate policy files (check)
    config       Show configuration (show, defaults)
    demo         Run interceptors end to end with tracing output
    version      Show version information
    help         Show this help message

ENVIRONMENT:
    OPLOG_LOG_LEVEL             Log filter (default: info)
    OPLOG_LOG_FORMAT            json, pretty or compact (default: json)
    OPLOG_LOG_FILE              Log output file (default: stderr)
    OPLOG_CHANNEL               Channel on call log records (default: OperationInvoker)
    OPLOG_POLICY_FILE           Policy file used when none is given
    OPLOG_DEFAULT_ACTOR         Actor reported by the demo (default: anonymous)
    OPLOG_MEMORY_SINK_CAPACITY  In-memory sink capacity (default: 10000)

EXIT CODES:
    0  Success
    1  Failure / warnings
    2  Load or configuration error
",
        version
    );
}

/// Print detailed help for a specific command.
fn print_command_help(command: &str) {
    match command {
        "policies" | "policy" => {
            eprintln!(
                "oplog policies - Validate policy files

USAGE:
    oplog policies check [FILE]

DESCRIPTION:
    Loads a TOML policy file (FILE, or OPLOG_POLICY_FILE), prints every
    declared policy and reports duplicate declarations, unsupported modes
    and ignored parameters.

EXIT CODES:
    0  Policy file is valid
    1  Policy file loaded with warnings
    2  Policy file could not be read or parsed
"
            );
        }
        "config" => {
            eprintln!(
                "oplog config - Show configuration

USAGE:
    oplog config <SUBCOMMAND>

SUBCOMMANDS:
    show           Show effective configuration
    defaults       Show default configuration
"
            );
        }
        "demo" => {
            eprintln!(
                "oplog demo - Run the interception demo

USAGE:
    oplog demo

DESCRIPTION:
    Calls Say(a), Say(b), Say(c) under max_count(2) and Read returning
    5, 5, 7, 7, 5 under return_changed_only. Call log lines are written
    through tracing on target oplog::calls.
"
            );
        }
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'oplog help' for general usage.",
                command
            );
        }
    }
}
