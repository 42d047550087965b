//! List command: show the secret names held in a backup collection

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use sealsync_core::BackupTarget;
use sealsync_secrets::JsonCollection;

use super::{backup_store, collection_name, load_config};
use crate::cli::ListArgs;
use crate::output;

pub async fn run(args: ListArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path, &args.target)?;
    let source: BackupTarget = args.backup.parse().context("Invalid backup source")?;

    let repo = config.repository();
    let name = collection_name(
        &config,
        source,
        args.target.secret_name.as_deref(),
        repo.as_ref(),
    )
    .ok_or_else(|| {
        anyhow!("Backup secret name not specified. Use --secret-name, configure secret_name, or set the repository")
    })?;

    let store = backup_store(&config, source).await?;
    let collection = JsonCollection::new(store.as_ref(), name.as_str());

    let spinner = output::spinner(&format!("Reading {}...", name));
    let keys = collection.keys().await;
    spinner.finish_and_clear();
    let keys = keys.with_context(|| format!("Failed to list secrets in {}", name))?;

    output::header(&format!("{} secret: {}", source.service_name(), name));
    if keys.is_empty() {
        output::info("No secrets stored");
        return Ok(());
    }

    for key in &keys {
        println!("  {}", key);
    }
    println!();
    output::kv("Total", &keys.len().to_string());

    Ok(())
}
