//! Canonical locations under the tutor's data home.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory name used under the user's home when no data home is given.
pub const DEFAULT_HOME_DIR: &str = ".vimlearn";

/// All canonical paths within a data home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorPaths {
    pub home: PathBuf,
    pub config_path: PathBuf,
    pub users_dir: PathBuf,
}

impl TutorPaths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            config_path: home.join("config.toml"),
            users_dir: home.join("users"),
            home,
        }
    }

    /// Use `explicit` when given (flag or `VIMLEARN_HOME`), else `~/.vimlearn`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let home = match explicit {
            Some(path) => path.to_path_buf(),
            None => dirs::home_dir()
                .map(|home| home.join(DEFAULT_HOME_DIR))
                .context("home directory not found; pass --home or set VIMLEARN_HOME")?,
        };
        Ok(Self::new(home))
    }
}
