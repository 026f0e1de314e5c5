pub mod config;
pub mod error;
pub mod gather;
pub mod overview;
pub mod pattern;
pub mod select;
pub mod tree;

pub use config::{Config, FiltersConfig, GeneralConfig};
pub use error::{AppError, Result};
pub use gather::{FileInfo, collect_candidates, list_git_files, read_files, walk_files};
pub use overview::{
    Overview, OverviewSummary, SelectionPlan, build_overview, generate_repo_overview,
    plan_selection,
};
pub use pattern::{Pattern, PatternGroup, PatternSet};
pub use select::{Selection, decide, relative_to_root, select, select_with};
pub use tree::{TreeNode, build_tree};
