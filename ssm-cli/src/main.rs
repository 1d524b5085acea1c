//! `ssm`: generate, view and inspect Secure Share Model archives.

mod cli;
mod commands;
mod config;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::{CliArgs, CliCommand};
use crate::config::{init_logger, load_config, resolve_log_level};

fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logger(&resolve_log_level(&cli, &config));

    let result = match cli.command {
        CliCommand::Generate(args) => commands::generate(args, config),
        CliCommand::View(args) => commands::view(args, config),
        CliCommand::Inspect(args) => commands::inspect(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
