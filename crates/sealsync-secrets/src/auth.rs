//! Credential discovery for GitHub and GCP
//!
//! Each resolver walks an explicit value, then an environment variable, then
//! the vendor CLI, returning the first non-blank token found. A configured GCP
//! service account key file routes the CLI step through application default
//! credentials.

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Environment variable consulted for a GitHub token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable consulted for a GCP OAuth access token
pub const GCP_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Environment variable gcloud reads a service account key file from
pub const GCP_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error(
        "GitHub token not found. Please either:\n  \
         1. Set github.token in sealsync.yaml\n  \
         2. Set the GITHUB_TOKEN environment variable\n  \
         3. Authenticate with GitHub CLI: gh auth login"
    )]
    GithubTokenNotFound,

    #[error(
        "GCP access token not found. Please either:\n  \
         1. Set gcp.access_token in sealsync.yaml\n  \
         2. Set the GOOGLE_OAUTH_ACCESS_TOKEN environment variable\n  \
         3. Authenticate with gcloud: gcloud auth login"
    )]
    GcpTokenNotFound,

    #[error("GCP credentials file not found: {path}")]
    GcpCredentialsFileNotFound { path: String },

    #[error("Failed to obtain a GCP access token for service account {path}. Is gcloud installed?")]
    GcpServiceAccountFailed { path: String },
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn from_env(var: &str) -> Option<String> {
    non_blank(std::env::var(var).ok().as_deref())
}

/// Run a command and return its trimmed stdout on success
async fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    stdout_of(Command::new(program).args(args)).await
}

async fn stdout_of(command: &mut Command) -> Option<String> {
    let output = command.output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    non_blank(Some(&*stdout))
}

/// GitHub token from an explicit value or `GITHUB_TOKEN`, without running `gh`
pub fn github_token_from_config_or_env(configured: Option<&str>) -> Option<String> {
    if let Some(token) = non_blank(configured) {
        debug!("Using GitHub token from configuration");
        return Some(token);
    }

    let token = from_env(GITHUB_TOKEN_ENV)?;
    debug!("Using GitHub token from {}", GITHUB_TOKEN_ENV);
    Some(token)
}

/// Resolve a GitHub token: explicit value, `GITHUB_TOKEN`, then `gh auth token`
pub async fn resolve_github_token(configured: Option<&str>) -> Result<String, CredentialError> {
    if let Some(token) = github_token_from_config_or_env(configured) {
        return Ok(token);
    }

    let authenticated = Command::new("gh")
        .args(["auth", "status"])
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false);

    if authenticated {
        if let Some(token) = command_stdout("gh", &["auth", "token"]).await {
            debug!("Using GitHub token from gh CLI");
            return Ok(token);
        }
    }

    Err(CredentialError::GithubTokenNotFound)
}

/// Resolve a GCP access token: explicit value, `GOOGLE_OAUTH_ACCESS_TOKEN`,
/// then gcloud.
///
/// With a service account key file, gcloud mints the token from that file
/// (`gcloud auth application-default print-access-token`). Without one, the
/// active gcloud login is used.
pub async fn resolve_gcp_access_token(
    configured: Option<&str>,
    credentials_path: Option<&str>,
) -> Result<String, CredentialError> {
    if let Some(token) = non_blank(configured) {
        debug!("Using GCP access token from configuration");
        return Ok(token);
    }

    if let Some(token) = from_env(GCP_TOKEN_ENV) {
        debug!("Using GCP access token from {}", GCP_TOKEN_ENV);
        return Ok(token);
    }

    if let Some(path) = non_blank(credentials_path) {
        return service_account_token(&path).await;
    }

    if let Some(token) = command_stdout("gcloud", &["auth", "print-access-token"]).await {
        debug!("Using GCP access token from gcloud CLI");
        return Ok(token);
    }

    Err(CredentialError::GcpTokenNotFound)
}

async fn service_account_token(path: &str) -> Result<String, CredentialError> {
    if !std::path::Path::new(path).is_file() {
        return Err(CredentialError::GcpCredentialsFileNotFound {
            path: path.to_string(),
        });
    }

    let token = stdout_of(
        Command::new("gcloud")
            .args(["auth", "application-default", "print-access-token"])
            .env(GCP_CREDENTIALS_ENV, path),
    )
    .await
    .ok_or_else(|| CredentialError::GcpServiceAccountFailed {
        path: path.to_string(),
    })?;

    debug!("Using GCP access token for service account {}", path);
    Ok(token)
}
