use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log;
use std::path::{Path, PathBuf};

use crate::select::relative_to_root;

/// Characters that turn a pattern into a shell-style glob.
pub const WILDCARD_CHARS: [char; 4] = ['*', '?', '[', ']'];

/// A user-supplied include/exclude pattern, classified once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matched by path equality, basename equality or directory containment.
    Exact(String),
    /// Matched with shell wildcards against the whole root-relative path.
    Glob(String),
}

impl Pattern {
    pub fn classify(raw: &str) -> Self {
        if raw.contains(WILDCARD_CHARS) {
            Pattern::Glob(raw.to_string())
        } else {
            Pattern::Exact(raw.to_string())
        }
    }

}

/// One side (include or exclude) of a [`PatternSet`].
#[derive(Debug, Clone)]
pub struct PatternGroup {
    exact: Vec<PathBuf>,
    globs: Vec<String>,
    matcher: GlobSet,
}

impl PatternGroup {
    fn partition<S: AsRef<str>>(raw_patterns: &[S], root: &Path) -> Self {
        let mut exact = Vec::new();
        let mut globs = Vec::new();

        for raw in raw_patterns {
            match Pattern::classify(raw.as_ref()) {
                Pattern::Exact(s) => {
                    let normalized = relative_to_root(Path::new(&s), root);
                    if normalized.as_os_str().is_empty() {
                        log::warn!("Ignoring empty exact pattern \"{}\"", raw.as_ref());
                        continue;
                    }
                    exact.push(normalized);
                }
                Pattern::Glob(s) => globs.push(s),
            }
        }

        let matcher = build_glob_set(&globs);
        PatternGroup {
            exact,
            globs,
            matcher,
        }
    }

    pub fn exact(&self) -> &[PathBuf] {
        &self.exact
    }

    pub fn globs(&self) -> &[String] {
        &self.globs
    }

    /// True when this group declared any glob, even one that failed to compile.
    pub fn has_globs(&self) -> bool {
        !self.globs.is_empty()
    }

    pub fn glob_matches(&self, relative_path: &Path) -> bool {
        self.matcher.is_match(relative_path)
    }

    /// `relative_path` equals an exact pattern or lies beneath one.
    pub fn contains_path(&self, relative_path: &Path) -> Option<&Path> {
        self.exact
            .iter()
            .find(|pattern| relative_path.starts_with(pattern))
            .map(PathBuf::as_path)
    }

    /// The final segment of `relative_path` equals an exact pattern.
    pub fn names_file(&self, relative_path: &Path) -> Option<&Path> {
        let name = relative_path.file_name()?;
        self.exact
            .iter()
            .find(|pattern| pattern.as_os_str() == name)
            .map(PathBuf::as_path)
    }
}

/// Include and exclude patterns partitioned into exact and glob groups.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub include: PatternGroup,
    pub exclude: PatternGroup,
}

impl PatternSet {
    pub fn new<I, E>(include: &[I], exclude: &[E], root: &Path) -> Self
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        let set = PatternSet {
            include: PatternGroup::partition(include, root),
            exclude: PatternGroup::partition(exclude, root),
        };
        log::debug!(
            "Pattern set: {} exact / {} glob includes, {} exact / {} glob excludes",
            set.include.exact.len(),
            set.include.globs.len(),
            set.exclude.exact.len(),
            set.exclude.globs.len()
        );
        set
    }
}

// Malformed globs are dropped here; callers still see them through `globs()`,
// so a broken include glob keeps excluding what it failed to match.
fn build_glob_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern_str in patterns {
        let translated = shell_glob(pattern_str);
        let built = GlobBuilder::new(&translated)
            .literal_separator(false)
            .backslash_escape(false)
            .build();
        match built {
            Ok(glob) => {
                log::trace!("Adding glob pattern: {}", pattern_str);
                builder.add(glob);
            }
            Err(e) => {
                log::warn!(
                    "Invalid glob pattern \"{}\" will match nothing: {}",
                    pattern_str,
                    e
                );
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("Error building glob set, globs will match nothing: {}", e);
        GlobSet::empty()
    })
}

/// Rewrite a shell wildcard pattern so globset reads only `* ? [ ]` as special.
///
/// Runs of `*` collapse to one (no `**` directory semantics) and braces are
/// wrapped in classes so they stay literal. Class bodies are copied verbatim;
/// an unclosed `[` is left for globset to reject.
fn shell_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                out.push('*');
                while chars.next_if_eq(&'*').is_some() {}
            }
            '[' => {
                out.push('[');
                if let Some(bang) = chars.next_if_eq(&'!') {
                    out.push(bang);
                }
                // A leading `]` is a member, not the end of the class.
                if let Some(bracket) = chars.next_if_eq(&']') {
                    out.push(bracket);
                }
                for member in chars.by_ref() {
                    out.push(member);
                    if member == ']' {
                        break;
                    }
                }
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_wildcard_characters() {
        assert_eq!(Pattern::classify("README.md"), Pattern::Exact("README.md".into()));
        assert_eq!(Pattern::classify("src/lib"), Pattern::Exact("src/lib".into()));
        for raw in ["*.rs", "file?.txt", "[ab].txt", "odd]name"] {
            assert_eq!(Pattern::classify(raw), Pattern::Glob(raw.into()));
        }
        assert_eq!(Pattern::classify("a{b,c}"), Pattern::Exact("a{b,c}".into()));
    }

    #[test]
    fn partitions_include_and_exclude() {
        let root = Path::new("/repo");
        let set = PatternSet::new(&["*.txt", "keep.md"], &["target", ".*"], root);
        assert_eq!(set.include.globs(), ["*.txt".to_string()]);
        assert_eq!(set.include.exact(), [PathBuf::from("keep.md")]);
        assert_eq!(set.exclude.exact(), [PathBuf::from("target")]);
        assert_eq!(set.exclude.globs(), [".*".to_string()]);
    }

    #[test]
    fn exact_patterns_are_normalized() {
        let root = Path::new("/repo");
        let set = PatternSet::new::<&str, &str>(&["./docs/", "/repo/src/main.rs", ""], &[], root);
        assert_eq!(
            set.include.exact(),
            [PathBuf::from("docs"), PathBuf::from("src/main.rs")]
        );
    }

    #[test]
    fn star_crosses_separators() {
        let set = PatternSet::new::<&str, &str>(&["*.txt", "src/?.rs"], &[], Path::new("/repo"));
        assert!(set.include.glob_matches(Path::new("a.txt")));
        assert!(set.include.glob_matches(Path::new("deep/nested/c.txt")));
        assert!(set.include.glob_matches(Path::new("src/a.rs")));
        assert!(!set.include.glob_matches(Path::new("src/ab.rs")));
        assert!(!set.include.glob_matches(Path::new("b.md")));
    }

    #[test]
    fn character_classes_match() {
        let set = PatternSet::new::<&str, &str>(&["file[12].txt"], &[], Path::new("/repo"));
        assert!(set.include.glob_matches(Path::new("file1.txt")));
        assert!(set.include.glob_matches(Path::new("file2.txt")));
        assert!(!set.include.glob_matches(Path::new("file3.txt")));
    }

    #[test]
    fn malformed_glob_matches_nothing_but_still_counts() {
        let set = PatternSet::new::<&str, &str>(&["[unclosed"], &[], Path::new("/repo"));
        assert!(set.include.has_globs());
        assert!(!set.include.glob_matches(Path::new("[unclosed")));
        assert!(!set.include.glob_matches(Path::new("anything")));
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_pattern() {
        let set = PatternSet::new::<&str, &str>(&[" notes.txt"], &[], Path::new("/repo"));
        assert_eq!(set.include.exact(), [PathBuf::from(" notes.txt")]);
        assert!(set.include.names_file(Path::new("docs/ notes.txt")).is_some());
        assert!(set.include.names_file(Path::new("docs/notes.txt")).is_none());
    }

    #[test]
    fn globset_extensions_are_translated_away() {
        assert_eq!(shell_glob("**/test.rs"), "*/test.rs");
        assert_eq!(shell_glob("src/***.rs"), "src/*.rs");
        assert_eq!(shell_glob("*.{rs,md}"), "*.[{]rs,md[}]");
        assert_eq!(shell_glob("[!{]x"), "[!{]x");
        assert_eq!(shell_glob("[]*]"), "[]*]");
        assert_eq!(shell_glob("[**]"), "[**]");
    }

    #[test]
    fn negated_classes_match() {
        let set = PatternSet::new::<&str, &str>(&["file[!12].txt"], &[], Path::new("/repo"));
        assert!(set.include.glob_matches(Path::new("file3.txt")));
        assert!(!set.include.glob_matches(Path::new("file1.txt")));
        assert!(!set.include.glob_matches(Path::new("file2.txt")));
    }

    #[test]
    fn directory_containment_is_per_component() {
        let set = PatternSet::new::<&str, &str>(&["dir1"], &[], Path::new("/repo"));
        assert!(set.include.contains_path(Path::new("dir1")).is_some());
        assert!(set.include.contains_path(Path::new("dir1/x.md")).is_some());
        assert!(set.include.contains_path(Path::new("dir10/x.md")).is_none());
        assert!(set.include.names_file(Path::new("a/b/dir1")).is_some());
    }
}
