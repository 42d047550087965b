//! Restore command: replay a backup collection into GitHub

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use sealsync_core::BackupTarget;
use sealsync_secrets::{
    github_token_from_config_or_env, resolve_github_token, GithubClient, KeyState, SyncConfig,
    SyncEngine, SyncResult,
};

use super::{backup_store, collection_name, load_config};
use crate::cli::RestoreArgs;
use crate::output;

pub async fn run(args: RestoreArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path, &args.target)?;
    let source: BackupTarget = args.backup.parse().context("Invalid backup source")?;

    let collection = collection_name(&config, source, args.target.secret_name.as_deref(), None);
    let destination = config.repository();
    let configured_token = config.github().token.as_deref();

    // gh is only consulted once the rest of the configuration is complete
    let token = if collection.is_some() && destination.is_some() {
        match resolve_github_token(configured_token).await {
            Ok(token) => Some(token),
            Err(e) => {
                output::warning(&e.to_string());
                None
            }
        }
    } else {
        github_token_from_config_or_env(configured_token)
    };

    let sync_config = SyncConfig::new(collection.clone(), destination.clone(), token.clone());
    sync_config
        .validate_for_restore()
        .context("Restore requires an explicit backup secret name, repository, and GitHub token")?;

    let (collection, repo, token) = match (collection, destination, token) {
        (Some(c), Some(r), Some(t)) => (c, r, t),
        _ => return Err(anyhow!("Incomplete restore configuration")),
    };

    output::header(&format!("Restore from {}", source.service_name()));
    output::kv("Backup secret", &collection);
    output::kv("Repository", &repo.to_string());
    println!();

    let store = backup_store(&config, source).await?;
    let engine = SyncEngine::new(sync_config, GithubClient::new(repo, token)?)
        .with_backup(source, store);

    let restored = engine
        .restore_with(source, |key, state| match state {
            KeyState::Succeeded => output::restore_line(key, true),
            KeyState::Failed => output::restore_line(key, false),
            KeyState::Pending | KeyState::Writing => {}
        })
        .await;

    match restored {
        Ok(result) => {
            if result.attempted == 0 {
                output::info(&format!("No secrets found in {}", collection));
            }
            print_summary(&result);
            Ok(())
        }
        Err(err) => {
            if let Some(result) = err.sync_result() {
                print_summary(result);
            }
            Err(err).with_context(|| format!("Failed to restore from {}", source.service_name()))
        }
    }
}

fn print_summary(result: &SyncResult) {
    println!();
    for failure in &result.failures {
        output::error(&format!("{}: {}", failure.key, failure.error));
    }

    let summary = format!("Restore complete: {} secrets restored", result.summary());
    if result.is_success() {
        output::success(&summary);
    } else {
        output::warning(&summary);
    }
}
