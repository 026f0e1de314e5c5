use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        value_name = "REPO_PATH",
        help = "Path to the repository (default: $GITGATHER_ROOT or current dir)."
    )]
    pub repo_path: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .gitgather/gitgather.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionOpts {
    #[arg(
        long,
        help = "Include all files, not just those tracked by git.",
        help_heading = "File Selection"
    )]
    pub no_git: bool,

    #[arg(
        long,
        help = "Include all files, including hidden ones (overrides --no-dotfiles).",
        help_heading = "File Selection"
    )]
    pub all: bool,

    #[arg(long, help = "Exclude dotfiles.", help_heading = "File Selection")]
    pub no_dotfiles: bool,

    #[arg(long = "include", value_name = "PATTERN", action = clap::ArgAction::Append, help = "Include files matching this name, directory or glob.", help_heading = "File Selection")]
    pub include: Vec<String>,

    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append, help = "Exclude files matching this name, directory or glob.", help_heading = "File Selection")]
    pub exclude: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concatenate repository files for LLM context analysis.",
    long_about = "gitgather selects files from a repository (git-tracked, or every file with --no-git) \nusing include/exclude patterns, then writes a directory tree of the selection \nfollowed by the contents of each selected file.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  gitgather generate . context.md --include '*.rs' --exclude target\n  gitgather generate . --no-git --no-dotfiles\n  gitgather debug . -f json",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Write the tree and file contents of the selected files."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "d",
        about = "Show effective configuration, pattern partition and selected files."
    )]
    Debug(DebugArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        value_name = "OUTPUT_FILE",
        help = "Output file path (default: standard output)."
    )]
    pub output_file: Option<PathBuf>,

    #[arg(
        long,
        help = "Omit the directory tree ahead of file contents.",
        help_heading = "Output Control"
    )]
    pub no_tree: bool,

    #[clap(flatten)]
    pub selection: SelectionOpts,
}

#[derive(Args, Debug, Clone)]
pub struct DebugArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["text", "json"], help_heading = "Output Formatting")]
    pub format: Option<String>,

    #[clap(flatten)]
    pub selection: SelectionOpts,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save completion script to default location (prompts overwrite)."
    )]
    pub save: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_takes_repo_and_optional_output() {
        let cli = Cli::try_parse_from(["gitgather", "gen", ".", "out.md", "--include", "*.rs"]).unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.project_config.repo_path, Some(PathBuf::from(".")));
        assert_eq!(args.output_file, Some(PathBuf::from("out.md")));
        assert_eq!(args.selection.include, ["*.rs"]);

        let cli = Cli::try_parse_from(["gitgather", "generate", "."]).unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.output_file, None);
    }

    #[test]
    fn stdout_is_the_default_not_a_flag() {
        assert!(Cli::try_parse_from(["gitgather", "generate", ".", "--stdout"]).is_err());
    }
}
