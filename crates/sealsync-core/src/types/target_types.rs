//! Repository and backup target identifiers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A GitHub repository (OWNER/REPO)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Default backup collection name for this repository
    pub fn default_collection_name(&self) -> String {
        format!("github-secrets-{}-{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(Error::invalid_repository(s)),
        }
    }
}

/// Cloud secret manager used as a backup store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupTarget {
    /// AWS Secrets Manager
    Aws,
    /// GCP Secret Manager
    Gcp,
}

impl BackupTarget {
    /// Parse an optional target where `none` (or empty) means no backup
    pub fn parse_optional(value: &str) -> Result<Option<Self>> {
        match value.trim().to_lowercase().as_str() {
            "" | "none" => Ok(None),
            other => other.parse().map(Some),
        }
    }

    /// Human readable service name
    pub fn service_name(&self) -> &'static str {
        match self {
            BackupTarget::Aws => "AWS Secrets Manager",
            BackupTarget::Gcp => "GCP Secret Manager",
        }
    }
}

impl std::fmt::Display for BackupTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupTarget::Aws => write!(f, "aws"),
            BackupTarget::Gcp => write!(f, "gcp"),
        }
    }
}

impl FromStr for BackupTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Ok(BackupTarget::Aws),
            "gcp" => Ok(BackupTarget::Gcp),
            other => Err(Error::invalid_backup_target(other)),
        }
    }
}
