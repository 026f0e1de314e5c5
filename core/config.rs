use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".gitgather";
pub const DEFAULT_CONFIG_FILENAME: &str = "gitgather.toml";
pub const PROJECT_ROOT_ENV: &str = "GITGATHER_ROOT";
/// Glob added to the excludes by `no_dotfiles`.
pub const DOTFILES_PATTERN: &str = ".*";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Walk the filesystem instead of asking git for tracked files.
    #[serde(default)]
    pub no_git: bool,
    /// Keep hidden files even when `no_dotfiles` is set.
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub no_dotfiles: bool,
    #[serde(default = "default_true")]
    pub tree_output: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            no_git: false,
            all: false,
            no_dotfiles: false,
            tree_output: default_true(),
        }
    }
}

impl Config {
    pub fn effective_include(&self) -> Vec<String> {
        self.filters.include.clone()
    }

    pub fn effective_exclude(&self) -> Vec<String> {
        let mut exclude = self.filters.exclude.clone();
        if self.general.no_dotfiles && !self.general.all {
            log::debug!("Excluding dotfiles via '{}'", DOTFILES_PATTERN);
            exclude.push(DOTFILES_PATTERN.to_string());
        }
        exclude
    }

    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var(PROJECT_ROOT_ENV).ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        let Some(p_str) = cli_config_file else {
            let default_path = project_root
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME);
            if default_path.exists() {
                log::debug!("Using default config file path: {}", default_path.display());
                return Ok(Some(default_path));
            }
            log::debug!(
                "No config file specified and default not found at: {}",
                default_path.display()
            );
            return Ok(None);
        };

        let mut path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
        let looks_like_path =
            path.is_absolute() || path.components().count() > 1 || p_str.contains(['/', '\\']);

        if looks_like_path {
            if !path.exists() && path.extension().is_none() {
                path.set_extension("toml");
            }
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Specified config file not found at path: {}",
                    path.display()
                )));
            }
            log::debug!("Using specified config file path: {}", path.display());
            return Ok(Some(path));
        }

        let filename = if path.extension().is_none_or(|e| e != "toml") {
            format!("{}.toml", path.to_string_lossy())
        } else {
            path.to_string_lossy().to_string()
        };
        let config_dir = project_root.join(DEFAULT_CONFIG_DIR);
        let full_path = config_dir.join(filename);
        if !full_path.exists() {
            return Err(AppError::Config(format!(
                "Specified config file '{}' not found in default directory: {}",
                p_str,
                config_dir.display()
            )));
        }
        log::debug!(
            "Using specified config filename in default directory: {}",
            full_path.display()
        );
        Ok(Some(full_path))
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<Config>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
