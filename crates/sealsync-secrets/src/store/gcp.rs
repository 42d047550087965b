//! GCP Secret Manager store (REST API)
//!
//! Reads the `latest` version of a secret and writes by adding a new version.
//! A write to a secret that does not exist yet creates it with automatic
//! replication first.

use crate::error::StoreError;
use crate::store::{classify, KeyedBlobStore};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_SECRET_ID_LEN: usize = 255;

pub struct GcpSecretManagerStore {
    client: reqwest::Client,
    endpoint: String,
    project: String,
    access_token: String,
}

#[derive(Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

impl GcpSecretManagerStore {
    pub fn new(
        project: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project: project.into(),
            access_token: access_token.into(),
        })
    }

    /// Point the store at a different API root (emulators, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Project-scoped API URL, each segment appended with path encoding
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| StoreError::other(format!("invalid endpoint {}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::other(format!("endpoint {} cannot take a path", self.endpoint)))?
            .pop_if_empty()
            .extend(["projects", self.project.as_str(), "secrets"])
            .extend(segments);
        Ok(url)
    }

    fn secret_url(&self, name: &str, suffix: &[&str]) -> Result<Url, StoreError> {
        validate_secret_id(name)?;
        let mut segments = vec![name];
        segments.extend_from_slice(suffix);
        self.url(&segments)
    }

    async fn create(&self, name: &str) -> Result<(), StoreError> {
        info!("Creating secret {} in project {}", name, self.project);

        let url = self.url(&[])?;
        let response = self
            .client
            .post(url)
            .query(&[("secretId", name)])
            .bearer_auth(&self.access_token)
            .json(&json!({ "replication": { "automatic": {} } }))
            .send()
            .await
            .map_err(|e| StoreError::other(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(name, status, &body))
    }

    async fn add_version(&self, name: &str, value: &str) -> Result<StatusCode, StoreError> {
        validate_secret_id(name)?;
        let segment = format!("{}:addVersion", name);
        let url = self.url(&[segment.as_str()])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "payload": { "data": BASE64.encode(value) } }))
            .send()
            .await
            .map_err(|e| StoreError::other(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(status);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(name, status, &body))
    }
}

/// Secret ids are 1-255 ASCII letters, digits, hyphens or underscores
pub fn validate_secret_id(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_SECRET_ID_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::other(format!("invalid secret id '{}'", name)))
    }
}

/// Map a non-success HTTP status to a store error.
///
/// 401 and 403 are authentication failures regardless of body content.
pub fn classify_status(name: &str, status: StatusCode, body: &str) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::auth(format!("{}: {}", status, body.trim()))
        }
        _ => classify(
            name,
            &format!("{}: {}", status, body.trim()),
            status == StatusCode::NOT_FOUND,
        ),
    }
}

#[async_trait]
impl KeyedBlobStore for GcpSecretManagerStore {
    async fn get(&self, name: &str) -> Result<String, StoreError> {
        debug!("Reading secret {} from project {}", name, self.project);

        let url = self.secret_url(name, &["versions", "latest:access"])?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| StoreError::other(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(name, status, &body));
        }

        let parsed: AccessSecretVersionResponse = response
            .json()
            .await
            .map_err(|e| StoreError::other(format!("invalid response: {}", e)))?;

        let bytes = BASE64
            .decode(parsed.payload.data)
            .map_err(|e| StoreError::other(format!("invalid payload encoding: {}", e)))?;

        String::from_utf8(bytes)
            .map_err(|_| StoreError::other(format!("secret '{}' is not valid UTF-8", name)))
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), StoreError> {
        debug!(
            "Adding version to secret {} in project {} ({} bytes)",
            name,
            self.project,
            value.len()
        );

        match self.add_version(name, value).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound { .. }) => {
                self.create(name).await?;
                self.add_version(name, value).await.map(|_| ())
            }
            Err(e) => Err(e),
        }
    }

    fn backend(&self) -> &'static str {
        "GCP Secret Manager"
    }

    fn auth_hint(&self) -> &'static str {
        "Please check your GCP credentials or run 'gcloud auth login'"
    }
}

impl std::fmt::Debug for GcpSecretManagerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpSecretManagerStore")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
