//! Configuration file types (sealsync.yaml)

use serde::{Deserialize, Serialize};

/// Default AWS region used when neither config nor flags provide one
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Top-level sealsync.yaml structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SealsyncConfigFile {
    /// GitHub (primary store) settings
    #[serde(default)]
    pub github: GithubConfig,

    /// AWS Secrets Manager backup settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// GCP Secret Manager backup settings
    #[serde(default)]
    pub gcp: GcpConfig,
}

/// GitHub repository and credential settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Repository owner (user or organization)
    #[serde(default)]
    pub owner: Option<String>,

    /// Repository name
    #[serde(default)]
    pub repo: Option<String>,

    /// Personal access token with `repo` scope
    #[serde(default)]
    pub token: Option<String>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// AWS Secrets Manager settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region
    #[serde(default = "default_aws_region")]
    pub region: String,

    /// Shared config profile (~/.aws/config)
    #[serde(default)]
    pub profile: Option<String>,

    /// Name of the secret holding the aggregated collection
    #[serde(default)]
    pub secret_name: Option<String>,
}

fn default_aws_region() -> String {
    DEFAULT_AWS_REGION.to_string()
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_aws_region(),
            profile: None,
            secret_name: None,
        }
    }
}

/// GCP Secret Manager settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GcpConfig {
    /// GCP project id
    #[serde(default)]
    pub project: Option<String>,

    /// Name of the secret holding the aggregated collection
    #[serde(default)]
    pub secret_name: Option<String>,

    /// OAuth2 bearer token (falls back to GOOGLE_OAUTH_ACCESS_TOKEN / gcloud)
    #[serde(default)]
    pub access_token: Option<String>,

    /// Service account key file used when no bearer token is given
    #[serde(default)]
    pub credentials_path: Option<String>,
}

impl std::fmt::Debug for GcpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpConfig")
            .field("project", &self.project)
            .field("secret_name", &self.secret_name)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("credentials_path", &self.credentials_path)
            .finish()
    }
}
