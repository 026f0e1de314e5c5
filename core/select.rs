//! Include/exclude selection over candidate paths.
//!
//! Rules are evaluated in a fixed order and the first one that fires decides:
//!
//! 1. exact exclusion (the path, or a directory containing it, is named),
//! 2. exact inclusion (the path, a containing directory or its basename is named),
//! 3. glob evaluation against the root-relative path.

use crate::pattern::PatternSet;
use log;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Included,
    Excluded,
}

impl Selection {
    pub fn is_included(self) -> bool {
        self == Selection::Included
    }
}

/// Express `path` relative to `root`; relative inputs are taken as already relative.
pub fn relative_to_root(path: &Path, root: &Path) -> PathBuf {
    let relative = if path.is_absolute() {
        pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf())
    } else {
        path.to_path_buf()
    };
    relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

pub fn decide(path: &Path, root: &Path, patterns: &PatternSet) -> Selection {
    let relative_path = relative_to_root(path, root);
    decide_relative(&relative_path, patterns)
}

fn decide_relative(relative_path: &Path, patterns: &PatternSet) -> Selection {
    if let Some(pattern) = patterns.exclude.contains_path(relative_path) {
        log::trace!(
            "Excluded by exact pattern '{}': {}",
            pattern.display(),
            relative_path.display()
        );
        return Selection::Excluded;
    }

    if let Some(pattern) = patterns
        .include
        .contains_path(relative_path)
        .or_else(|| patterns.include.names_file(relative_path))
    {
        log::trace!(
            "Included by exact pattern '{}': {}",
            pattern.display(),
            relative_path.display()
        );
        return Selection::Included;
    }

    if patterns.include.has_globs() && !patterns.include.glob_matches(relative_path) {
        log::trace!("Not matched by any include glob: {}", relative_path.display());
        return Selection::Excluded;
    }

    if patterns.exclude.glob_matches(relative_path) {
        log::trace!("Excluded by glob: {}", relative_path.display());
        return Selection::Excluded;
    }

    log::trace!("Included: {}", relative_path.display());
    Selection::Included
}

/// Filter `paths` down to those selected by the include/exclude patterns.
///
/// The result keeps the input order and returns each path in the form it was
/// given. Matching is done on the root-relative form of every path.
pub fn select<P, I, E>(paths: &[P], root: &Path, include: &[I], exclude: &[E]) -> Vec<PathBuf>
where
    P: AsRef<Path>,
    I: AsRef<str>,
    E: AsRef<str>,
{
    let patterns = PatternSet::new(include, exclude, root);
    select_with(paths, root, &patterns)
}

pub fn select_with<P: AsRef<Path>>(paths: &[P], root: &Path, patterns: &PatternSet) -> Vec<PathBuf> {
    let selected: Vec<PathBuf> = paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| decide(path, root, patterns).is_included())
        .map(Path::to_path_buf)
        .collect();
    log::debug!("Selected {} of {} candidate paths.", selected.len(), paths.len());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_PATTERNS: &[&str] = &[];

    fn root() -> &'static Path {
        Path::new("/repo")
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn no_patterns_selects_everything() {
        let paths = ["a.txt", ".hidden", "dir/b.md", "/repo/abs.rs"];
        let selected = select(&paths, root(), NO_PATTERNS, NO_PATTERNS);
        assert_eq!(names(&selected), paths);
    }

    #[test]
    fn include_glob_filters_by_relative_path() {
        let paths = ["a.txt", "b.md", "dir/c.txt"];
        let selected = select(&paths, root(), &["*.txt"], NO_PATTERNS);
        assert_eq!(names(&selected), ["a.txt", "dir/c.txt"]);
    }

    #[test]
    fn exact_directory_exclusion_removes_descendants() {
        let paths = ["a.txt", "dir1/x.md", "dir1/sub/y.md", "dir10/z.md"];
        let selected = select(&paths, root(), NO_PATTERNS, &["dir1"]);
        assert_eq!(names(&selected), ["a.txt", "dir10/z.md"]);
    }

    #[test]
    fn exact_include_overrides_glob_exclude() {
        let paths = ["keep.txt", "drop.txt"];
        let selected = select(&paths, root(), &["keep.txt"], &["*.txt"]);
        assert_eq!(names(&selected), ["keep.txt"]);
    }

    #[test]
    fn exact_exclude_beats_every_include() {
        let paths = ["vendor/lib.rs", "vendor/keep.rs", "src/main.rs"];
        let selected = select(&paths, root(), &["*.rs", "keep.rs", "vendor"], &["vendor"]);
        assert_eq!(names(&selected), ["src/main.rs"]);
    }

    #[test]
    fn exact_exclude_does_not_match_basename() {
        let paths = ["file1.txt", "nested/file1.txt"];
        let selected = select(&paths, root(), NO_PATTERNS, &["file1.txt"]);
        assert_eq!(names(&selected), ["nested/file1.txt"]);
    }

    #[test]
    fn basename_include_matches_anywhere() {
        let paths = ["a.md", "deep/dir/file13.txt", "other.txt"];
        let selected = select(&paths, root(), &["file13.txt", "*.md"], NO_PATTERNS);
        assert_eq!(names(&selected), ["a.md", "deep/dir/file13.txt"]);
    }

    #[test]
    fn mixed_include_and_exclude_lists() {
        let paths = ["file1.txt", "file2.md", "file3.txt", "file4.rtf", "file5.rtf"];
        let selected = select(
            &paths,
            root(),
            &["*.txt", "file4.rtf"],
            &["file1.txt", "*.rtf"],
        );
        assert_eq!(names(&selected), ["file3.txt", "file4.rtf"]);
    }

    #[test]
    fn directory_include_punches_through_glob_exclude() {
        let paths = ["dir6/file14.txt", "dir3/file8.txt", "file4.md", "dir1/file12.md"];
        let selected = select(&paths, root(), &["dir6"], &["*.txt", "dir1"]);
        assert_eq!(names(&selected), ["dir6/file14.txt", "file4.md"]);
    }

    #[test]
    fn dot_glob_excludes_hidden_top_level_entries() {
        let paths = [".env", ".git/config", "src/.keep", "main.rs"];
        let selected = select(&paths, root(), NO_PATTERNS, &[".*"]);
        assert_eq!(names(&selected), ["src/.keep", "main.rs"]);
    }

    #[test]
    fn absolute_candidates_are_matched_relative_to_root() {
        let paths = ["/repo/dir1/x.md", "/repo/a.txt", "/repo/b.md"];
        let selected = select(&paths, root(), &["*.md"], &["dir1"]);
        assert_eq!(names(&selected), ["/repo/b.md"]);
    }

    #[test]
    fn absolute_exact_pattern_matches_relative_candidate() {
        let paths = ["src/main.rs", "README.md"];
        let selected = select(&paths, root(), NO_PATTERNS, &["/repo/src"]);
        assert_eq!(names(&selected), ["README.md"]);
    }

    #[test]
    fn trailing_separator_names_a_directory() {
        let paths = ["build/out.o", "builder.rs"];
        let selected = select(&paths, root(), NO_PATTERNS, &["build/"]);
        assert_eq!(names(&selected), ["builder.rs"]);
    }

    #[test]
    fn double_star_is_an_ordinary_star() {
        let paths = ["test.rs", "a/test.rs"];
        let selected = select(&paths, root(), &["**/test.rs"], NO_PATTERNS);
        assert_eq!(names(&selected), ["a/test.rs"]);

        let paths = ["src/main.rs", "src/a/b.rs"];
        let selected = select(&paths, root(), &["src/**/*.rs"], NO_PATTERNS);
        assert_eq!(names(&selected), ["src/a/b.rs"]);
    }

    #[test]
    fn braces_are_literal() {
        let paths = ["a.rs", "a.{rs,md}"];
        let selected = select(&paths, root(), &["*.{rs,md}"], NO_PATTERNS);
        assert_eq!(names(&selected), ["a.{rs,md}"]);
    }

    #[cfg(unix)]
    #[test]
    fn backslash_is_literal() {
        let paths = ["a\\b.txt", "ab.txt"];
        let selected = select(&paths, root(), &["a\\*"], NO_PATTERNS);
        assert_eq!(names(&selected), ["a\\b.txt"]);
    }

    #[test]
    fn negated_class_excludes_listed_characters() {
        let paths = ["log1.txt", "log2.txt", "logx.txt"];
        let selected = select(&paths, root(), NO_PATTERNS, &["log[!0-9].txt"]);
        assert_eq!(names(&selected), ["log1.txt", "log2.txt"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let paths = ["README.md", "readme.md"];
        let selected = select(&paths, root(), &["README.md"], &["*.md"]);
        assert_eq!(names(&selected), ["README.md"]);
    }

    #[test]
    fn reselecting_is_idempotent() {
        let paths = ["a.txt", "b.md", "dir/c.txt", "dir/keep.md", "skip/d.txt"];
        let include = ["*.txt", "keep.md"];
        let exclude = ["skip"];
        let once = select(&paths, root(), &include, &exclude);
        let twice = select(&once, root(), &include, &exclude);
        assert_eq!(once, twice);
    }

    #[test]
    fn inputs_are_left_untouched() {
        let paths = vec![PathBuf::from("a.txt"), PathBuf::from("b.md")];
        let before = paths.clone();
        let _ = select(&paths, root(), &["*.md"], NO_PATTERNS);
        assert_eq!(paths, before);
    }

    #[test]
    fn decide_reports_each_rule() {
        let patterns = PatternSet::new(&["keep.txt", "*.md"], &["secret", "*.txt"], root());
        assert_eq!(decide(Path::new("secret/keep.txt"), root(), &patterns), Selection::Excluded);
        assert_eq!(decide(Path::new("x/keep.txt"), root(), &patterns), Selection::Included);
        assert_eq!(decide(Path::new("notes.md"), root(), &patterns), Selection::Included);
        assert_eq!(decide(Path::new("other.txt"), root(), &patterns), Selection::Excluded);
        assert_eq!(decide(Path::new("main.rs"), root(), &patterns), Selection::Excluded);
    }
}
