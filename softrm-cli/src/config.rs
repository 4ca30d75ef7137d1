//! Trash directory configuration.
//!
//! The trash root comes from, in priority order: the `--trash-dir` flag or
//! `SOFTRM_TRASH_DIR`, the `trashdir` key of the config file, and finally
//! the platform data directory. Environment variables inside the value are
//! expanded.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use softrm_core::TrashConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Trash directory, may reference environment variables.
    pub trashdir: Option<String>,
}

impl FileConfig {
    /// Loads the config file.
    ///
    /// An explicitly given file must exist; a missing default file simply
    /// yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "softrm")
}

/// Picks the trash root from the flag, the config file or the default.
pub fn resolve_trash_config(flag: Option<&str>, file: &FileConfig, cwd: &Path) -> Result<TrashConfig> {
    let raw = match flag.or(file.trashdir.as_deref()) {
        Some(raw) => raw.to_string(),
        None => default_trash_dir()?,
    };
    let config = TrashConfig::from_raw(&raw, cwd)?;
    log::debug!("trash directory resolved to {}", config.trash_root.display());
    Ok(config)
}

fn default_trash_dir() -> Result<String> {
    let dirs = project_dirs().context("failed to determine the user's data directory")?;
    Ok(dirs.data_dir().join("trash").to_string_lossy().into_owned())
}
