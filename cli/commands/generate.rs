use crate::cli_args::GenerateArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use log;
use gitgather_core::{self as core, Config};

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.repo_path.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config = load_config_for_command(&project_root, &args.project_config, &args.selection)
        .context("Failed to load configuration")?;
    if args.no_tree {
        config.general.tree_output = false;
    }

    match args.output_file.as_deref() {
        Some(output_file) => {
            log::info!("Gathering into file: {}", output_file.display());
            let summary = core::generate_repo_overview(&project_root, output_file, &config)
                .context("Failed to generate repository overview")?;
            output::report_read_errors(&summary.errors, quiet);
            output::print_saved(&summary.output, summary.files_written, quiet);
        }
        None => {
            log::info!("Gathering to stdout.");
            let overview = core::build_overview(&project_root, &config, None)
                .context("Failed to gather repository files")?;
            output::report_read_errors(&overview.errors, quiet);
            output::write_to_stdout(&overview.render())?;
        }
    }
    Ok(())
}
