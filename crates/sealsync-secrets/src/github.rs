//! GitHub Actions repository secrets (primary store)
//!
//! GitHub never returns secret values. Writes require the value to be sealed
//! for the repository public key, sent together with that key's id.

use crate::error::PrimaryStoreError;
use crate::types::RecipientPublicKey;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use sealsync_core::RepoRef;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A write-only secret store that accepts sealed values
#[async_trait]
pub trait PrimaryStore: Send + Sync {
    /// Fetch the current recipient public key
    async fn encryption_key(&self) -> Result<RecipientPublicKey, PrimaryStoreError>;

    /// Create or replace a secret with an already sealed value
    async fn write_encrypted_secret(
        &self,
        name: &str,
        ciphertext: &str,
        key_id: &str,
    ) -> Result<(), PrimaryStoreError>;

    /// Human-readable destination, e.g. `owner/repo`
    fn destination(&self) -> String;
}

#[derive(Serialize)]
struct PutSecretRequest<'a> {
    encrypted_value: &'a str,
    key_id: &'a str,
}

/// GitHub REST client scoped to one repository
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    repo: RepoRef,
    token: String,
}

impl GithubClient {
    pub fn new(repo: RepoRef, token: impl Into<String>) -> Result<Self, PrimaryStoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sealsync/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PrimaryStoreError::Transport {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            repo,
            token: token.into(),
        })
    }

    /// Use a GitHub Enterprise or mock API root
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    fn secrets_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/actions/secrets",
            self.api_url, self.repo.owner, self.repo.repo
        )
    }

    /// URL of one secret, with the name appended as a single encoded path segment
    fn secret_url(&self, name: &str) -> Result<Url, PrimaryStoreError> {
        let invalid = |message: String| PrimaryStoreError::InvalidResponse { message };

        let mut url = Url::parse(&self.secrets_url())
            .map_err(|e| invalid(format!("invalid API URL {}: {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("API URL {} cannot take a path", self.api_url)))?
            .push(name);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

/// Check a name against GitHub's secret naming rules.
///
/// Names may only contain ASCII letters, digits and underscores, must not
/// start with a digit and must not use the reserved `GITHUB_` prefix. GitHub
/// answers such requests with 422, so the same status is reported here.
pub fn validate_secret_name(name: &str) -> Result<(), PrimaryStoreError> {
    let problem = if name.is_empty() {
        Some("secret name is empty")
    } else if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some("secret names may only contain letters, digits and underscores")
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        Some("secret names must not start with a digit")
    } else if name.to_ascii_uppercase().starts_with("GITHUB_") {
        Some("secret names must not start with GITHUB_")
    } else {
        None
    };

    match problem {
        Some(message) => Err(PrimaryStoreError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            message: format!("invalid secret name '{}': {}", name, message),
        }),
        None => Ok(()),
    }
}

/// Map a non-success GitHub status to a primary store error
pub fn status_error(status: StatusCode, body: &str) -> PrimaryStoreError {
    let message = github_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PrimaryStoreError::AuthFailure {
            status: status.as_u16(),
            message,
        },
        _ => PrimaryStoreError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extract the `message` field from a GitHub error body, if present
fn github_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn transport(err: reqwest::Error) -> PrimaryStoreError {
    PrimaryStoreError::Transport {
        message: err.to_string(),
    }
}

#[async_trait]
impl PrimaryStore for GithubClient {
    async fn encryption_key(&self) -> Result<RecipientPublicKey, PrimaryStoreError> {
        let url = format!("{}/public-key", self.secrets_url());
        debug!("Fetching public key for {}", self.repo);

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .json::<RecipientPublicKey>()
            .await
            .map_err(|e| PrimaryStoreError::InvalidResponse {
                message: format!("failed to parse public key: {}", e),
            })
    }

    async fn write_encrypted_secret(
        &self,
        name: &str,
        ciphertext: &str,
        key_id: &str,
    ) -> Result<(), PrimaryStoreError> {
        validate_secret_name(name)?;
        let url = self.secret_url(name)?;
        debug!("Writing secret {} to {}", name, self.repo);

        let response = self
            .request(reqwest::Method::PUT, url.as_str())
            .json(&PutSecretRequest {
                encrypted_value: ciphertext,
                key_id,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    fn destination(&self) -> String {
        self.repo.to_string()
    }
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("repo", &self.repo)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrimaryStoreErrorKind;

    fn client() -> GithubClient {
        GithubClient::new(RepoRef::new("acme", "widgets"), "ghp_secret").unwrap()
    }

    #[test]
    fn test_secrets_url() {
        let gh = client().with_api_url("https://ghe.example.com/api/v3/");
        assert_eq!(
            gh.secrets_url(),
            "https://ghe.example.com/api/v3/repos/acme/widgets/actions/secrets"
        );
        assert_eq!(gh.destination(), "acme/widgets");
    }

    #[test]
    fn test_auth_statuses() {
        let err = status_error(StatusCode::UNAUTHORIZED, r#"{"message":"Bad credentials"}"#);
        assert_eq!(err.kind(), PrimaryStoreErrorKind::AuthFailure);
        assert!(err.to_string().contains("Bad credentials"));

        let err = status_error(StatusCode::FORBIDDEN, "");
        assert_eq!(err.kind(), PrimaryStoreErrorKind::AuthFailure);
    }

    #[test]
    fn test_other_statuses_are_rejected() {
        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, "plain text body");
        assert_eq!(
            err,
            PrimaryStoreError::Rejected {
                status: 422,
                message: "plain text body".into()
            }
        );
    }

    #[test]
    fn test_put_request_targets_named_secret() {
        let gh = client();
        let url = gh.secret_url("API_KEY").unwrap();
        let request = gh.request(reqwest::Method::PUT, url.as_str()).build().unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.github.com/repos/acme/widgets/actions/secrets/API_KEY"
        );
        assert_eq!(request.url().fragment(), None);
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_secret_url_keeps_name_in_one_segment() {
        let gh = client().with_api_url("https://ghe.example.com/api/v3/");

        for name in ["A#B", "A?x=1", "../variables/X"] {
            let url = gh.secret_url(name).unwrap();
            let request = gh.request(reqwest::Method::PUT, url.as_str()).build().unwrap();

            assert!(
                request
                    .url()
                    .path()
                    .starts_with("/api/v3/repos/acme/widgets/actions/secrets/"),
                "{} escaped the secrets path: {}",
                name,
                request.url()
            );
            assert_eq!(request.url().path_segments().unwrap().count(), 8);
            assert_eq!(request.url().fragment(), None);
            assert_eq!(request.url().query(), None);
        }
    }

    #[test]
    fn test_validate_secret_name() {
        assert!(validate_secret_name("API_KEY").is_ok());
        assert!(validate_secret_name("_private2").is_ok());

        let invalid = [
            "",
            "A#B",
            "A?x=1",
            "../variables/X",
            "WITH SPACE",
            "1PASSWORD",
            "GITHUB_TOKEN",
            "github_x",
        ];
        for name in invalid {
            let err = validate_secret_name(name).unwrap_err();
            assert_eq!(err.kind(), PrimaryStoreErrorKind::Rejected, "{name}");
            assert!(matches!(err, PrimaryStoreError::Rejected { status: 422, .. }));
        }
    }

    #[tokio::test]
    async fn test_invalid_name_rejected_before_request() {
        // Unroutable API root: reaching the network would surface as Transport
        let gh = client().with_api_url("http://127.0.0.1:9");

        let err = gh
            .write_encrypted_secret("A#B", "Y2lwaGVy", "key-1")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PrimaryStoreErrorKind::Rejected);
        assert!(err.to_string().contains("A#B"));
    }

    #[test]
    fn test_debug_redacts_token() {
        assert!(!format!("{:?}", client()).contains("ghp_secret"));
    }
}
