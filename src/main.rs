use std::process::ExitCode;

use clap::Parser;
use rseq::runtime::{self, Commands, Config, ErrorMode, LogLevel};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long = "log-level", global = true, value_parser)]
    /// trace, debug, info, warn, error or off. Falls back to RUST_LOG, then info
    log_level: Option<LogLevel>,

    #[arg(long = "on-error", global = true, value_parser, default_value = "skip")]
    /// What to do with a record that cannot be converted: skip (warn and go on) or abort
    error_mode: ErrorMode,
}

fn main() -> ExitCode {
    let mut cli = Cli::parse();

    runtime::setup_global_logger(cli.log_level);
    Config::init(Config {
        error_mode: cli.error_mode,
    });

    log::debug!("Running {:?}", cli.command);
    let result = cli.command.try_execute();

    if let Err(e) = result {
        log::error!("{:?} failed", cli.command);
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    return ExitCode::SUCCESS;
}
