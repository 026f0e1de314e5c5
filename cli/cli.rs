mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::process;

use cli_args::{Cli, Commands, ProjectConfigOpts, SelectionOpts};
use gitgather_core::{AppError, Config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;
    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::Config(_)) => 1,
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::TomlSerialize(_)) => 6,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::DirCreation { .. }) => 2,
                Some(AppError::Git(_)) => 3,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(_) => 1,
                None => 1,
            };

            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}\n", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(Commands::Generate(args)) => {
            log::debug!("Executing 'generate' command...");
            commands::generate::handle_generate_command(args, quiet)?;
        }
        Some(Commands::Debug(args)) => {
            log::debug!("Executing 'debug' command...");
            commands::debug::handle_debug_command(args)?;
        }
        Some(Commands::Completion(args)) => {
            log::debug!("Executing 'completion' command...");
            commands::completion::handle_completion_command(&args, quiet)?;
        }
    }
    Ok(())
}

fn merge_config_with_cli_overrides(mut config: Config, selection: &SelectionOpts) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if selection.no_git {
        config.general.no_git = true;
    }
    if selection.all {
        config.general.all = true;
    }
    if selection.no_dotfiles {
        config.general.no_dotfiles = true;
    }
    config
        .filters
        .include
        .extend(selection.include.iter().cloned());
    config
        .filters
        .exclude
        .extend(selection.exclude.iter().cloned());

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

pub fn load_config_for_command(
    project_root: &std::path::Path,
    project_opts: &ProjectConfigOpts,
    selection: &SelectionOpts,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        project_opts.config.as_ref(),
        project_opts.no_config,
    )
    .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    Ok(merge_config_with_cli_overrides(config, selection))
}
