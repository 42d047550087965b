//! CLI command implementations

pub mod list;
pub mod push;
pub mod restore;

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use sealsync_core::{BackupTarget, RepoRef, SealsyncConfig};
use sealsync_secrets::{
    resolve_gcp_access_token, AwsSecretsManagerStore, GcpSecretManagerStore, KeyedBlobStore,
};
use std::sync::Arc;

use crate::cli::TargetArgs;

/// Load sealsync.yaml (plus environment overrides) and apply command-line flags
pub fn load_config(path: Option<&Utf8Path>, target: &TargetArgs) -> Result<SealsyncConfig> {
    let mut config = SealsyncConfig::load(path).context("Failed to load configuration")?;
    apply_target_args(&mut config, target);
    Ok(config)
}

fn apply_target_args(config: &mut SealsyncConfig, args: &TargetArgs) {
    let file = &mut config.config;

    if let Some(ref owner) = args.owner {
        file.github.owner = Some(owner.clone());
    }
    if let Some(ref repo) = args.repo {
        file.github.repo = Some(repo.clone());
    }
    if let Some(ref region) = args.aws_region {
        file.aws.region = region.clone();
    }
    if let Some(ref profile) = args.aws_profile {
        file.aws.profile = Some(profile.clone());
    }
    if let Some(ref project) = args.gcp_project {
        file.gcp.project = Some(project.clone());
    }
}

/// Resolve the backup collection name.
///
/// Order: `--secret-name`, the target's configured `secret_name`, then the
/// repository default when `default_for` is given.
pub fn collection_name(
    config: &SealsyncConfig,
    target: BackupTarget,
    flag: Option<&str>,
    default_for: Option<&RepoRef>,
) -> Option<String> {
    flag.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| config.collection_name(target))
        .or_else(|| default_for.map(RepoRef::default_collection_name))
}

/// Build the keyed blob store for a backup target
pub async fn backup_store(
    config: &SealsyncConfig,
    target: BackupTarget,
) -> Result<Arc<dyn KeyedBlobStore>> {
    match target {
        BackupTarget::Aws => {
            let aws = config.aws();
            let profile = aws.profile.as_deref().filter(|p| !p.trim().is_empty());
            Ok(Arc::new(AwsSecretsManagerStore::new(&aws.region, profile).await))
        }
        BackupTarget::Gcp => {
            let gcp = config.gcp();
            let project = gcp
                .project
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    anyhow!(
                        "GCP project ID not specified. Use --gcp-project or set gcp.project in sealsync.yaml"
                    )
                })?;
            let token = resolve_gcp_access_token(
                gcp.access_token.as_deref(),
                gcp.credentials_path.as_deref(),
            )
            .await?;
            let store = GcpSecretManagerStore::new(project, token)
                .context("Failed to create GCP Secret Manager client")?;
            Ok(Arc::new(store))
        }
    }
}
