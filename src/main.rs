mod cli;
mod config;
mod error;
mod logging;
mod model;
mod providers;
mod sync;

use std::process::ExitCode;

use tracing::{error, warn};

use cli::Command;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n");
            cli::print_help();
            return ExitCode::from(2);
        }
    };

    match command {
        Command::Help => {
            cli::print_help();
            ExitCode::SUCCESS
        }
        Command::Groups => match cli::handle_groups().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e:#}");
                ExitCode::FAILURE
            }
        },
        Command::Sync { dry_run } => match cli::handle_sync(dry_run).await {
            Ok(report) if report.is_clean() => ExitCode::SUCCESS,
            Ok(report) => {
                warn!(
                    failed = report.failed,
                    missing_start_date = report.missing_start_date,
                    "Some tickets could not be synced"
                );
                ExitCode::FAILURE
            }
            Err(e) => {
                error!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}
