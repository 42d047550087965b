//! AWS Secrets Manager store
//!
//! Uses `GetSecretValue` for reads and `UpdateSecret` for writes, falling
//! back to `CreateSecret` when the slot does not exist yet.

use crate::error::StoreError;
use crate::store::{classify, KeyedBlobStore};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use tracing::{debug, info};

/// Description attached to secrets written by sealsync
const SECRET_DESCRIPTION: &str = "GitHub Secrets backup (JSON format)";

pub struct AwsSecretsManagerStore {
    client: Client,
    region: String,
}

impl AwsSecretsManagerStore {
    /// Create a store using the default credential chain, optionally pinned
    /// to a shared config profile
    pub async fn new(region: &str, profile: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

        if let Some(profile) = profile {
            debug!("Using AWS profile: {}", profile);
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            region: region.to_string(),
        }
    }

    /// Create a store from an existing SDK client
    pub fn from_client(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    async fn create(&self, name: &str, value: &str) -> Result<(), StoreError> {
        info!("Creating secret {} in {}", name, self.region);

        self.client
            .create_secret()
            .name(name)
            .secret_string(value)
            .description(SECRET_DESCRIPTION)
            .send()
            .await
            .map_err(|err| {
                let message = format!("failed to create secret: {}", DisplayErrorContext(&err));
                classify(name, &message, false)
            })?;

        Ok(())
    }
}

#[async_trait]
impl KeyedBlobStore for AwsSecretsManagerStore {
    async fn get(&self, name: &str) -> Result<String, StoreError> {
        debug!("Reading secret {} from {}", name, self.region);

        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false);
                classify(name, &DisplayErrorContext(&err).to_string(), not_found)
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| StoreError::other(format!("secret '{}' has no string value", name)))
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), StoreError> {
        debug!(
            "Updating secret {} in {} ({} bytes)",
            name,
            self.region,
            value.len()
        );

        match self
            .client
            .update_secret()
            .secret_id(name)
            .secret_string(value)
            .description(SECRET_DESCRIPTION)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false);
                match classify(name, &DisplayErrorContext(&err).to_string(), not_found) {
                    StoreError::NotFound { .. } => self.create(name, value).await,
                    other => Err(other),
                }
            }
        }
    }

    fn backend(&self) -> &'static str {
        "AWS Secrets Manager"
    }

    fn auth_hint(&self) -> &'static str {
        "Please check your AWS credentials or run 'aws sso login' if using SSO"
    }
}

impl std::fmt::Debug for AwsSecretsManagerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsManagerStore")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
