use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use colored::*;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use gitgather_core::AppError;

use crate::cli_args::{Cli, CompletionArgs};

pub fn handle_completion_command(args: &CompletionArgs, quiet: bool) -> Result<()> {
    let shell_str = args.shell.as_deref().unwrap_or("fish");
    let shell_enum = parse_shell(shell_str)?;

    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    if !args.save {
        generate(shell_enum, &mut command, bin_name, &mut io::stdout());
        return Ok(());
    }

    let (save_dir, filename) = completion_target(shell_enum, &bin_name)?;
    let save_path = save_dir.join(&filename);

    if save_path.exists() {
        if quiet {
            anyhow::bail!(
                "Target file '{}' exists. Overwrite prevented in quiet mode.",
                save_path.display()
            );
        }
        print!(
            "{} Completion file already exists at '{}'. Overwrite? [{}/{}] ",
            "⚠️".yellow(),
            save_path.display().to_string().cyan(),
            "y".green(),
            "N".red()
        );
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut response = String::new();
        io::stdin()
            .read_line(&mut response)
            .context("Failed to read user input")?;
        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Save cancelled.");
            return Ok(());
        }
    }

    fs::create_dir_all(&save_dir)
        .with_context(|| format!("Failed to create directory {}", save_dir.display()))?;
    let mut file = File::create(&save_path)
        .with_context(|| format!("Failed to create file {}", save_path.display()))?;
    generate(shell_enum, &mut command, bin_name, &mut file);

    if !quiet {
        println!(
            "{} {} completions saved to: {}",
            "✅".green(),
            shell_str.cyan(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}

fn parse_shell(shell_str: &str) -> Result<Shell> {
    match shell_str.to_lowercase().as_str() {
        "fish" => Ok(Shell::Fish),
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        _ => anyhow::bail!(AppError::InvalidArgument(format!(
            "Unsupported shell for completion: {}",
            shell_str
        ))),
    }
}

fn completion_target(shell: Shell, bin_name: &str) -> Result<(PathBuf, String)> {
    let (dir, filename) = match shell {
        Shell::Fish => (
            dirs::config_dir().map(|p| p.join("fish").join("completions")),
            format!("{}.fish", bin_name),
        ),
        Shell::Bash => (
            dirs::config_dir().map(|p| p.join("bash_completion.d")),
            format!("{}.bash", bin_name),
        ),
        Shell::Zsh => (
            dirs::data_local_dir().map(|p| p.join("zsh").join("site-functions")),
            format!("_{}", bin_name),
        ),
        _ => anyhow::bail!(AppError::InvalidArgument(format!(
            "Default save location not known for shell: {}",
            shell
        ))),
    };
    let dir = dir.ok_or_else(|| anyhow::anyhow!("Could not determine standard completion directory."))?;
    Ok((dir, filename))
}
