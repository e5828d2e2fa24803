//! Runtime configuration for vault access.
//!
//! # Responsibility
//! - Carry the vault working directory and logging settings.
//! - Validate both before any command touches the vault.
//!
//! # Invariants
//! - A validated config has an absolute, existing workdir directory.
//! - A validated config has a canonical log level spelling.

use crate::graph::network::Network;
use crate::logging::{normalize_level, LogSettings};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

/// Environment variable naming the vault working directory.
pub const WORKDIR_ENV: &str = "SYNAPSE_WORKDIR";
/// Environment variable naming the log level.
pub const LOG_LEVEL_ENV: &str = "SYNAPSE_LOG_LEVEL";
/// Environment variable naming the log directory.
pub const LOG_DIR_ENV: &str = "SYNAPSE_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    /// Workdir does not exist.
    MissingWorkdir(PathBuf),
    /// Workdir exists but is not a directory.
    WorkdirNotDirectory(PathBuf),
    /// Relative workdir could not be resolved against the process cwd.
    CurrentDir(io::Error),
    /// Log settings were rejected.
    Logging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingWorkdir(path) => {
                write!(f, "workdir `{}` does not exist", path.display())
            }
            Self::WorkdirNotDirectory(path) => {
                write!(f, "workdir `{}` is not a directory", path.display())
            }
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
            Self::Logging(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            _ => None,
        }
    }
}

/// Vault and logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynapseConfig {
    /// Vault root directory.
    pub workdir: PathBuf,
    #[serde(default)]
    pub log: LogSettings,
}

impl SynapseConfig {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            log: LogSettings::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log.level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.log.dir = dir;
        self
    }

    /// Resolves the workdir and normalizes log settings.
    ///
    /// # Errors
    /// - `MissingWorkdir` / `WorkdirNotDirectory` for an unusable workdir.
    /// - `CurrentDir` when a relative workdir cannot be resolved.
    /// - `Logging` for an unsupported log level.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.workdir.is_relative() {
            let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
            self.workdir = cwd.join(&self.workdir);
        }
        if !self.workdir.exists() {
            return Err(ConfigError::MissingWorkdir(self.workdir));
        }
        if !self.workdir.is_dir() {
            return Err(ConfigError::WorkdirNotDirectory(self.workdir));
        }

        self.log.level = normalize_level(&self.log.level)
            .map_err(ConfigError::Logging)?
            .to_string();
        Ok(self)
    }

    /// Network rooted at the configured workdir.
    pub fn network(&self) -> Network {
        Network::new(self.workdir.clone())
    }
}
