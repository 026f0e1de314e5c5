use crate::cli_args::DebugArgs;
use crate::load_config_for_command;
use crate::output::print_data_or_text;
use anyhow::{Context, Result};
use colored::*;
use log;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use gitgather_core::{self as core, Config, PatternGroup, SelectionPlan};

#[derive(Debug, Serialize)]
struct PatternPartition {
    exact: Vec<String>,
    glob: Vec<String>,
}

impl From<&PatternGroup> for PatternPartition {
    fn from(group: &PatternGroup) -> Self {
        Self {
            exact: group
                .exact()
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            glob: group.globs().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DebugInfo<'a> {
    effective_config: &'a Config,
    project_root: String,
    include: PatternPartition,
    exclude: PatternPartition,
    candidate_count: usize,
    selected_files: Vec<String>,
    tree: &'a str,
}

pub fn handle_debug_command(args: DebugArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.repo_path.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(&project_root, &args.project_config, &args.selection)
        .context("Failed to load configuration for debug command")?;

    log::debug!("Debug: Planning selection...");
    let plan = core::plan_selection(&project_root, &config, None)
        .context("Failed to plan file selection for debug")?;

    let debug_data = DebugInfo {
        effective_config: &config,
        project_root: plan.root.to_string_lossy().into_owned(),
        include: PatternPartition::from(&plan.patterns.include),
        exclude: PatternPartition::from(&plan.patterns.exclude),
        candidate_count: plan.candidate_count,
        selected_files: relative_paths(&plan),
        tree: &plan.tree,
    };

    let format = args.format.as_deref().unwrap_or("text");
    let text = if format == "text" {
        format_debug_info_pretty(&debug_data)?
    } else {
        String::new()
    };
    print_data_or_text(&debug_data, text, format)
}

fn relative_paths(plan: &SelectionPlan) -> Vec<String> {
    plan.selected
        .iter()
        .map(|p| core::relative_to_root(p, &plan.root))
        .map(|p: PathBuf| p.to_string_lossy().into_owned())
        .collect()
}

fn format_debug_info_pretty(info: &DebugInfo) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", "--- Effective Configuration ---".green().bold().underline())?;
    let config_toml = info
        .effective_config
        .to_toml()
        .context("Failed to serialize effective config to TOML")?;
    writeln!(out, "{}", config_toml)?;

    writeln!(out, "{} {}", "Project root:".green(), info.project_root.cyan())?;
    write_partition(&mut out, "Include", &info.include)?;
    write_partition(&mut out, "Exclude", &info.exclude)?;

    let heading = format!(
        "\n--- Selected Files ({} of {} candidates) ---",
        info.selected_files.len(),
        info.candidate_count
    );
    writeln!(out, "{}", heading.green().bold().underline())?;
    if info.selected_files.is_empty() {
        writeln!(out, "{}", "(None)".dimmed())?;
    } else {
        for path in &info.selected_files {
            writeln!(out, "- {}", path.cyan())?;
        }
    }

    writeln!(out, "{}", "\n--- Tree ---".green().bold().underline())?;
    writeln!(out, "{}", info.tree)?;
    writeln!(out, "{}", "\n--- End Debug Info ---".green().bold())?;
    Ok(out)
}

fn write_partition(out: &mut String, title: &str, partition: &PatternPartition) -> Result<()> {
    let none = "(none)".dimmed().to_string();
    let join = |items: &[String]| {
        if items.is_empty() {
            none.clone()
        } else {
            items.join(", ")
        }
    };
    writeln!(
        out,
        "{:<16} {}",
        format!("{} exact:", title).green(),
        join(&partition.exact)
    )?;
    writeln!(
        out,
        "{:<16} {}",
        format!("{} glob:", title).green(),
        join(&partition.glob)
    )?;
    Ok(())
}
