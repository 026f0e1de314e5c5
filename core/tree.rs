use crate::select::relative_to_root;
use log;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const CONTINUATION: &str = "│   ";
const BLANK: &str = "    ";

/// One directory level of the hierarchy implied by the selected paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    pub fn from_paths<P: AsRef<Path>>(root: &Path, paths: &[P]) -> Self {
        let mut tree = TreeNode::default();
        for path in paths {
            let relative_path = relative_to_root(path.as_ref(), root);
            let components: Vec<String> = relative_path
                .components()
                .filter_map(|c| match c {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();
            if components.is_empty() {
                log::trace!("Skipping path with no tree components: {}", path.as_ref().display());
                continue;
            }
            tree.insert(components);
        }
        tree
    }

    pub fn insert<I>(&mut self, components: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut node = self;
        for component in components {
            node = node.children.entry(component).or_default();
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Render as an ASCII tree rooted at `.`, without a trailing newline.
    ///
    /// `is_dir` is asked about every leaf (with `root` joined to the leaf's
    /// relative path) to tell empty directories apart from files.
    pub fn render<F>(&self, root: &Path, is_dir: F) -> String
    where
        F: Fn(&Path) -> bool,
    {
        let mut lines = vec![".".to_string()];
        self.render_level(root, &PathBuf::new(), "", &is_dir, &mut lines);
        lines.join("\n")
    }

    fn render_level<F>(
        &self,
        root: &Path,
        relative_dir: &Path,
        prefix: &str,
        is_dir: &F,
        lines: &mut Vec<String>,
    ) where
        F: Fn(&Path) -> bool,
    {
        let mut empty_dirs = Vec::new();
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        // BTreeMap iteration keeps every bucket sorted by name.
        for (name, child) in &self.children {
            if !child.is_leaf() {
                dirs.push((name, child));
            } else if is_dir(&root.join(relative_dir).join(name)) {
                empty_dirs.push(name);
            } else {
                files.push(name);
            }
        }

        for name in empty_dirs {
            lines.push(format!("{prefix}{BRANCH}{name}"));
        }

        let dir_count = dirs.len();
        for (i, (name, child)) in dirs.into_iter().enumerate() {
            let is_last = i + 1 == dir_count && files.is_empty();
            let connector = if is_last { LAST_BRANCH } else { BRANCH };
            lines.push(format!("{prefix}{connector}{name}"));
            let child_prefix = format!("{prefix}{}", if is_last { BLANK } else { CONTINUATION });
            child.render_level(root, &relative_dir.join(name), &child_prefix, is_dir, lines);
        }

        let file_count = files.len();
        for (i, name) in files.into_iter().enumerate() {
            let connector = if i + 1 == file_count { LAST_BRANCH } else { BRANCH };
            lines.push(format!("{prefix}{connector}{name}"));
        }
    }
}

/// Build and render the tree for `selected_paths` in one step.
pub fn build_tree<P, F>(root: &Path, selected_paths: &[P], is_dir: F) -> String
where
    P: AsRef<Path>,
    F: Fn(&Path) -> bool,
{
    log::debug!("Building tree from {} selected paths...", selected_paths.len());
    let tree = TreeNode::from_paths(root, selected_paths);
    tree.render(root, is_dir)
}
