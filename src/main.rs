//! Command-line entry point for `macsetup`.
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use macsetup_cli::{cli, commands, error, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let result = match args.command {
        cli::Command::Install(opts) => {
            logging::init_subscriber(args.verbose, "install");
            let log = Arc::new(logging::Logger::new("install"));
            let result = commands::install::run(&args.global, &opts, &log);
            // Task failures were already reported by the task runner.
            if let Err(e) = &result
                && log.failure_count() == 0
            {
                log.error(&format!("{e:#}"));
            }
            result
        }
        cli::Command::Completions(opts) => {
            commands::completions::run(&opts);
            Ok(())
        }
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(error::exit_code_for(&e)),
    }
}
