//! Push command: back up a secret, then store it in GitHub

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8Path;
use dialoguer::{Input, Password};
use sealsync_core::BackupTarget;
use sealsync_secrets::{
    resolve_github_token, validate_secret_name, GithubClient, PrimaryStore, SyncConfig,
    SyncEngine,
};

use super::{backup_store, collection_name, load_config};
use crate::cli::PushArgs;
use crate::output;

pub async fn run(args: PushArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path, &args.target)?;
    let backup = BackupTarget::parse_optional(&args.backup)
        .context("Invalid backup destination (use 'aws', 'gcp', or 'none')")?;

    let repo = config.repository().ok_or_else(|| {
        anyhow!("GitHub owner and repo must be specified via --owner/--repo or sealsync.yaml")
    })?;
    let token = resolve_github_token(config.github().token.as_deref()).await?;

    let key = match args.key {
        Some(key) => key,
        None => Input::<String>::new()
            .with_prompt("Secret key name")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read secret key")?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("Secret key cannot be empty");
    }
    validate_secret_name(&key).context("Invalid secret key")?;

    let value = match args.value {
        Some(value) => value,
        None => Password::new()
            .with_prompt(format!("Value for secret '{}'", key))
            .allow_empty_password(true)
            .interact()
            .context("Failed to read secret value")?,
    };
    if value.is_empty() {
        bail!("Secret value cannot be empty");
    }

    let collection = backup.and_then(|target| {
        collection_name(&config, target, args.target.secret_name.as_deref(), Some(&repo))
    });

    output::header(&format!("Push Secret: {}", key));
    output::kv("Repository", &repo.to_string());
    match (backup, collection.as_deref()) {
        (Some(target), Some(name)) => {
            output::kv("Backup", &format!("{} ({})", target.service_name(), name))
        }
        _ => output::kv("Backup", "none"),
    }
    output::kv("Size", &format!("{} bytes", value.len()));
    println!();

    let primary = GithubClient::new(repo.clone(), token.clone())?;
    let mut engine = SyncEngine::new(SyncConfig::new(collection, Some(repo), Some(token)), primary);
    if let Some(target) = backup {
        engine = engine.with_backup(target, backup_store(&config, target).await?);
    }

    let spinner = output::spinner("Pushing secret...");
    let pushed = engine.push(&key, &value, backup).await;
    spinner.finish_and_clear();
    pushed.with_context(|| format!("Failed to push secret '{}'", key))?;

    if let Some(target) = backup {
        output::success(&format!("Backed up to {}", target.service_name()));
    }
    output::success(&format!(
        "Pushed {} to GitHub repository {}",
        key,
        engine.primary().destination()
    ));

    Ok(())
}
