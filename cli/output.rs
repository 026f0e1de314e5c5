use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use gitgather_core::AppError;

pub fn print_saved(path: &Path, files_written: usize, quiet: bool) {
    if !quiet {
        println!(
            "{} {} files gathered into: {}",
            "✅".green(),
            files_written.to_string().cyan(),
            path.display().to_string().blue()
        );
    }
}

/// Per-file failures never abort a run; list them once at the end.
pub fn report_read_errors(errors: &[AppError], quiet: bool) {
    if errors.is_empty() || quiet {
        return;
    }
    eprintln!(
        "\n{}",
        "⚠️ Warning: Some selected files could not be read and were skipped:".yellow()
    );
    for err in errors {
        eprintln!(" - {}", err);
    }
    eprintln!("---");
}

pub fn print_data_or_text<T: Serialize>(data: &T, plain_text: String, format: &str) -> Result<()> {
    match format.to_lowercase().as_str() {
        "json" => {
            let content =
                serde_json::to_string_pretty(data).context("Failed to serialize output to JSON")?;
            write_to_stdout(&content)
        }
        _ => write_to_stdout(&plain_text),
    }
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
