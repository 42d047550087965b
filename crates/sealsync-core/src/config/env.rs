//! Environment variable overrides (SEALSYNC_* prefix)
//!
//! Precedence (low to high):
//! 1. Defaults
//! 2. sealsync.yaml
//! 3. Environment variables
//! 4. CLI flags (handled by caller)

use crate::types::SealsyncConfigFile;
use std::env;
use tracing::debug;

/// Prefix for all environment overrides
pub const ENV_PREFIX: &str = "SEALSYNC_";

/// Apply SEALSYNC_* environment overrides on top of a parsed config
pub fn apply_env_overrides(mut config: SealsyncConfigFile) -> SealsyncConfigFile {
    if let Some(val) = var("GITHUB_OWNER") {
        config.github.owner = Some(val);
    }
    if let Some(val) = var("GITHUB_REPO") {
        config.github.repo = Some(val);
    }
    if let Some(val) = var("GITHUB_TOKEN") {
        config.github.token = Some(val);
    }

    if let Some(val) = var("AWS_REGION") {
        config.aws.region = val;
    }
    if let Some(val) = var("AWS_PROFILE") {
        config.aws.profile = Some(val);
    }
    if let Some(val) = var("AWS_SECRET_NAME") {
        config.aws.secret_name = Some(val);
    }

    if let Some(val) = var("GCP_PROJECT") {
        config.gcp.project = Some(val);
    }
    if let Some(val) = var("GCP_SECRET_NAME") {
        config.gcp.secret_name = Some(val);
    }
    if let Some(val) = var("GCP_CREDENTIALS_PATH") {
        config.gcp.credentials_path = Some(val);
    }

    config
}

fn var(suffix: &str) -> Option<String> {
    let name = format!("{}{}", ENV_PREFIX, suffix);
    match env::var(&name) {
        Ok(val) if !val.trim().is_empty() => {
            debug!("Applying override from {}", name);
            Some(val)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "SEALSYNC_GITHUB_OWNER",
        "SEALSYNC_GITHUB_REPO",
        "SEALSYNC_AWS_REGION",
        "SEALSYNC_AWS_SECRET_NAME",
        "SEALSYNC_GCP_PROJECT",
        "SEALSYNC_GCP_CREDENTIALS_PATH",
    ];

    fn clear() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        clear();
        env::set_var("SEALSYNC_GITHUB_OWNER", "env-owner");
        env::set_var("SEALSYNC_AWS_REGION", "ap-southeast-2");
        env::set_var("SEALSYNC_AWS_SECRET_NAME", "env-collection");

        let mut file = SealsyncConfigFile::default();
        file.github.owner = Some("file-owner".into());
        file.github.repo = Some("file-repo".into());

        let config = apply_env_overrides(file);
        assert_eq!(config.github.owner.as_deref(), Some("env-owner"));
        assert_eq!(config.github.repo.as_deref(), Some("file-repo"));
        assert_eq!(config.aws.region, "ap-southeast-2");
        assert_eq!(config.aws.secret_name.as_deref(), Some("env-collection"));
        clear();
    }

    #[test]
    #[serial]
    fn test_env_sets_gcp_credentials_path() {
        clear();
        env::set_var("SEALSYNC_GCP_CREDENTIALS_PATH", "/run/secrets/sa.json");

        let config = apply_env_overrides(SealsyncConfigFile::default());
        assert_eq!(
            config.gcp.credentials_path.as_deref(),
            Some("/run/secrets/sa.json")
        );
        clear();
    }

    #[test]
    #[serial]
    fn test_blank_env_values_are_ignored() {
        clear();
        env::set_var("SEALSYNC_GCP_PROJECT", "   ");

        let mut file = SealsyncConfigFile::default();
        file.gcp.project = Some("file-project".into());

        let config = apply_env_overrides(file);
        assert_eq!(config.gcp.project.as_deref(), Some("file-project"));
        clear();
    }
}
