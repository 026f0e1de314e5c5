use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gather::{self, FileInfo};
use crate::pattern::PatternSet;
use crate::select::select_with;
use crate::tree::build_tree;
use log;
use std::fs;
use std::path::{Path, PathBuf};

const FENCE: &str = "```";

/// The outcome of selection, before any file is read.
#[derive(Debug, Clone)]
pub struct SelectionPlan {
    pub root: PathBuf,
    pub patterns: PatternSet,
    pub candidate_count: usize,
    pub selected: Vec<PathBuf>,
    pub tree: String,
}

#[derive(Debug)]
pub struct Overview {
    pub tree: Option<String>,
    pub files: Vec<FileInfo>,
    /// Files that were selected but could not be read.
    pub errors: Vec<AppError>,
}

#[derive(Debug)]
pub struct OverviewSummary {
    pub output: PathBuf,
    pub files_written: usize,
    pub errors: Vec<AppError>,
}

impl Overview {
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(tree) = &self.tree {
            out.push_str(&format!("{FENCE}\n{tree}\n{FENCE}\n\n"));
        }
        for file in &self.files {
            out.push_str(&format!(
                "File: {}\n{FENCE}\n{}\n{FENCE}\n\n",
                file.relative_path, file.content
            ));
        }
        out
    }
}

/// Enumerate candidates, apply the configured patterns and render the tree.
///
/// `skip` names a path that never takes part, normally the output artifact.
pub fn plan_selection(repo_root: &Path, config: &Config, skip: Option<&Path>) -> Result<SelectionPlan> {
    let root = repo_root.canonicalize().map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to canonicalize repository root '{}': {}", repo_root.display(), e),
        ))
    })?;

    let mut candidates = gather::collect_candidates(&root, config)?;
    let candidate_count = candidates.len();
    if let Some(skip_path) = skip {
        candidates.retain(|candidate| {
            let keep = candidate != skip_path;
            if !keep {
                log::debug!("Skipping output artifact: {}", candidate.display());
            }
            keep
        });
    }

    let patterns = PatternSet::new(&config.effective_include(), &config.effective_exclude(), &root);
    let selected = select_with(&candidates, &root, &patterns);
    let tree = build_tree(&root, &selected, |p: &Path| p.is_dir());

    Ok(SelectionPlan {
        root,
        patterns,
        candidate_count,
        selected,
        tree,
    })
}

pub fn build_overview(repo_root: &Path, config: &Config, skip: Option<&Path>) -> Result<Overview> {
    let plan = plan_selection(repo_root, config, skip)?;
    let (files, errors) = gather::read_files(&plan.root, &plan.selected);
    Ok(Overview {
        tree: config.general.tree_output.then_some(plan.tree),
        files,
        errors,
    })
}

/// Gather `repo_root` per `config` and write the overview to `output_file`.
pub fn generate_repo_overview(
    repo_root: &Path,
    output_file: &Path,
    config: &Config,
) -> Result<OverviewSummary> {
    let output = absolute_output_path(output_file);
    let overview = build_overview(repo_root, config, Some(&output))?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(&output, overview.render()).map_err(|e| AppError::FileWrite {
        path: output.clone(),
        source: e,
    })?;
    log::info!(
        "Wrote {} files to {}",
        overview.files.len(),
        output.display()
    );

    Ok(OverviewSummary {
        output,
        files_written: overview.files.len(),
        errors: overview.errors,
    })
}

// The file usually does not exist yet, so resolve through its parent.
fn absolute_output_path(output_file: &Path) -> PathBuf {
    if let Ok(canonical) = output_file.canonicalize() {
        return canonical;
    }
    let parent = match output_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), output_file.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => std::path::absolute(output_file).unwrap_or_else(|_| output_file.to_path_buf()),
    }
}
