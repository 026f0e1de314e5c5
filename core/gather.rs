use crate::config::Config;
use crate::error::{AppError, Result};
use crate::select::relative_to_root;
use log;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub relative_path: String,
    pub content: String,
}

/// Root-relative paths of every file tracked by git, in index order.
pub fn list_git_files(repo_root: &Path) -> Result<Vec<PathBuf>> {
    log::debug!("Listing git-tracked files in {}", repo_root.display());
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["ls-files", "-z"])
        .output()
        .map_err(|e| {
            AppError::Git(format!(
                "Failed to run 'git ls-files' in {}: {}",
                repo_root.display(),
                e
            ))
        })?;

    if !output.status.success() {
        return Err(AppError::Git(format!(
            "'git ls-files' failed in {} ({}): {}",
            repo_root.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let tracked: Vec<PathBuf> = String::from_utf8_lossy(&output.stdout)
        .split('\0')
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect();
    log::info!("git reports {} tracked files.", tracked.len());
    Ok(tracked)
}

/// Absolute paths of every non-directory entry below `repo_root`.
///
/// Links are not followed; a symlink is listed unless it resolves to a
/// directory. Nothing is hidden, `.git` included.
pub fn walk_files(repo_root: &Path) -> Result<Vec<PathBuf>> {
    if !repo_root.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "Repository root is not a directory: {}",
            repo_root.display()
        )));
    }

    log::info!("Walking project directory: {}", repo_root.display());
    let mut files = Vec::new();
    let walker = WalkDir::new(repo_root).follow_links(false).sort_by_file_name();
    for entry_result in walker {
        match entry_result {
            Ok(entry) => {
                if entry.depth() == 0 || entry.file_type().is_dir() {
                    continue;
                }
                if entry.path_is_symlink() && entry.path().is_dir() {
                    log::trace!("Skipping symlinked directory: {}", entry.path().display());
                    continue;
                }
                log::trace!("Walked file: {}", entry.path().display());
                files.push(entry.into_path());
            }
            Err(e) => {
                log::warn!(
                    "Error walking directory: {} (at {})",
                    e,
                    e.path()
                        .map_or_else(|| "unknown path".into(), |p| p.display().to_string())
                );
            }
        }
    }
    log::info!("Directory walk complete. Found {} files.", files.len());
    Ok(files)
}

/// Candidate paths for selection, as absolute paths under `repo_root`.
pub fn collect_candidates(repo_root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if config.general.no_git {
        walk_files(repo_root)
    } else {
        Ok(list_git_files(repo_root)?
            .into_iter()
            .map(|relative| repo_root.join(relative))
            .collect())
    }
}

/// Read `paths` in order, skipping (and returning) the ones that fail.
pub fn read_files(repo_root: &Path, paths: &[PathBuf]) -> (Vec<FileInfo>, Vec<AppError>) {
    log::info!("Reading content for {} files...", paths.len());
    let results: Vec<Result<FileInfo>> = paths
        .par_iter()
        .map(|path| {
            let relative_path = relative_to_root(path, repo_root)
                .to_string_lossy()
                .into_owned();
            log::info!("Processing file: {}", relative_path);
            match fs::read(path) {
                Ok(bytes) => Ok(FileInfo {
                    path: path.clone(),
                    relative_path,
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(e) => {
                    log::error!("Failed to process {}: {}", path.display(), e);
                    Err(AppError::FileRead {
                        path: path.clone(),
                        source: e,
                    })
                }
            }
        })
        .collect();

    let mut files = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for res in results {
        match res {
            Ok(info) => files.push(info),
            Err(e) => errors.push(e),
        }
    }
    log::info!("File reading complete. {} read, {} skipped.", files.len(), errors.len());
    (files, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_lists_files_sorted_and_skips_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b/empty")).unwrap();
        fs::write(root.join("b/two.txt"), "2").unwrap();
        fs::write(root.join("a.txt"), "1").unwrap();
        fs::write(root.join(".hidden"), "h").unwrap();

        let files = walk_files(root).unwrap();
        let relative: Vec<String> = files
            .iter()
            .map(|p| relative_to_root(p, root).to_string_lossy().into_owned())
            .collect();
        assert_eq!(relative, [".hidden", "a.txt", "b/two.txt"]);
    }

    #[test]
    fn walk_rejects_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(walk_files(&missing), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn read_files_keeps_order_and_reports_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("one.txt"), "first").unwrap();
        fs::write(root.join("two.txt"), b"bad \xff byte").unwrap();
        let paths = vec![
            root.join("two.txt"),
            root.join("missing.txt"),
            root.join("one.txt"),
        ];

        let (files, errors) = read_files(root, &paths);
        let names: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(names, ["two.txt", "one.txt"]);
        assert_eq!(files[1].content, "first");
        assert!(files[0].content.starts_with("bad "));
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], AppError::FileRead { path, .. } if path.ends_with("missing.txt")));
    }
}
