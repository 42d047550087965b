//! Configuration file loading and parsing

use crate::config::env::apply_env_overrides;
use crate::error::{Error, Result};
use crate::types::{AwsConfig, BackupTarget, GcpConfig, GithubConfig, RepoRef, SealsyncConfigFile};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["sealsync.yaml", "sealsync.yml"];

/// Loaded sealsync configuration (file + environment overrides)
#[derive(Debug, Clone, Default)]
pub struct SealsyncConfig {
    /// The parsed configuration
    pub config: SealsyncConfigFile,

    /// Path to the configuration file, if one was found
    pub config_path: Option<Utf8PathBuf>,
}

impl SealsyncConfig {
    /// Load configuration from the specified path or search for it.
    ///
    /// An explicit path must exist. Without one, the current directory and its
    /// parents are searched; finding nothing yields the defaults. Environment
    /// overrides are applied in both cases.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let found = match path {
            Some(p) => Some((p.to_owned(), read_config(p)?)),
            None => {
                let cwd = std::env::current_dir()?;
                let cwd = Utf8PathBuf::try_from(cwd).map_err(|_| {
                    Error::invalid_config("Current directory path is not valid UTF-8")
                })?;
                Self::find_config_from(&cwd)?
            }
        };

        let mut loaded = match found {
            Some((config_path, content)) => {
                debug!("Using config file: {}", config_path);
                Self::from_yaml(&content, Some(config_path))?
            }
            None => {
                debug!("No sealsync.yaml found, using defaults");
                Self::default()
            }
        };

        loaded.config = apply_env_overrides(loaded.config);
        Ok(loaded)
    }

    /// Parse configuration from YAML content without touching the environment
    pub fn from_yaml(content: &str, config_path: Option<Utf8PathBuf>) -> Result<Self> {
        let config: SealsyncConfigFile = if content.trim().is_empty() {
            SealsyncConfigFile::default()
        } else {
            serde_yaml_ng::from_str(content)?
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Find a configuration file in `start` or any of its parents
    pub fn find_config_from(start: &Utf8Path) -> Result<Option<(Utf8PathBuf, String)>> {
        let mut current = Some(start);

        while let Some(dir) = current {
            for name in CONFIG_FILE_NAMES {
                let path = dir.join(name);
                if path.is_file() {
                    let content = fs::read_to_string(&path)?;
                    return Ok(Some((path, content)));
                }
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Get the inner configuration file
    pub fn inner(&self) -> &SealsyncConfigFile {
        &self.config
    }

    /// GitHub settings
    pub fn github(&self) -> &GithubConfig {
        &self.config.github
    }

    /// AWS settings
    pub fn aws(&self) -> &AwsConfig {
        &self.config.aws
    }

    /// GCP settings
    pub fn gcp(&self) -> &GcpConfig {
        &self.config.gcp
    }

    /// Destination repository, if both owner and repo are configured
    pub fn repository(&self) -> Option<RepoRef> {
        let github = &self.config.github;
        match (non_empty(&github.owner), non_empty(&github.repo)) {
            (Some(owner), Some(repo)) => Some(RepoRef::new(owner, repo)),
            _ => None,
        }
    }

    /// Explicitly configured collection name for a backup target
    pub fn collection_name(&self, target: BackupTarget) -> Option<String> {
        let name = match target {
            BackupTarget::Aws => &self.config.aws.secret_name,
            BackupTarget::Gcp => &self.config.gcp.secret_name,
        };
        non_empty(name).map(str::to_string)
    }
}

fn read_config(path: &Utf8Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
