//! [`GitHubClient`]: the `RepoHost` used in production.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use stacksift_core::config::{GithubConfig, DEFAULT_API_BASE_URL, DEFAULT_USER_AGENT};
use stacksift_core::{Credential, FetchOutcome, RepoHost, RepoRef, StackError};
use tracing::{debug, warn};

use crate::HostError;

/// Media type returning file contents as raw bytes instead of base64 JSON.
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Languages are fetched outside the orchestrator, so they carry their own timeout.
const LANGUAGES_TIMEOUT: Duration = Duration::from_secs(10);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// GitHub REST API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl GitHubClient {
    /// Client for `https://api.github.com`.
    pub fn new() -> Result<Self, HostError> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Client for another API root (GitHub Enterprise, or a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, HostError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(HostError::InvalidBaseUrl(base_url));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| HostError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: trimmed.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Client configured from the `github` config section.
    pub fn from_config(config: &GithubConfig) -> Result<Self, HostError> {
        Ok(Self::with_base_url(&config.api_base_url)?.with_user_agent(&config.user_agent))
    }

    /// Override the `User-Agent` header (GitHub rejects requests without one).
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, repo.owner, repo.name, suffix
        )
    }

    fn get(&self, url: &str, accept: &str, credential: &Credential) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(ACCEPT, accept)
            .header(AUTHORIZATION, credential.authorization_header())
            .header(USER_AGENT, &self.user_agent)
            .header(API_VERSION_HEADER, API_VERSION)
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn fetch_file(&self, repo: &RepoRef, path: &str, credential: &Credential) -> FetchOutcome {
        let url = self.repo_url(repo, &format!("contents/{}", path));

        let response = match self.get(&url, RAW_MEDIA_TYPE, credential).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(repo = %repo, path, error = %e, "Contents request failed");
                return FetchOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            return match response.bytes().await {
                Ok(bytes) => FetchOutcome::Found(bytes.to_vec()),
                Err(e) => FetchOutcome::Failed(format!("Failed to read body: {}", e)),
            };
        }

        let outcome = classify_failure(status, response.headers());
        debug!(repo = %repo, path, status = %status, outcome = outcome.label(), "Contents request");
        outcome
    }

    async fn languages(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<HashMap<String, u64>, StackError> {
        let url = self.repo_url(repo, "languages");

        let response = self
            .get(&url, JSON_MEDIA_TYPE, credential)
            .timeout(LANGUAGES_TIMEOUT)
            .send()
            .await
            .map_err(|e| StackError::HostRequestFailed {
                repo: repo.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<HashMap<String, u64>>()
                .await
                .map_err(|e| StackError::HostRequestFailed {
                    repo: repo.to_string(),
                    reason: format!("Malformed languages response: {}", e),
                });
        }

        match classify_failure(status, response.headers()) {
            FetchOutcome::AuthError(reason) => Err(StackError::CredentialAuth {
                repo: repo.to_string(),
                reason,
            }),
            FetchOutcome::RateLimited { reset } => Err(StackError::RateLimited {
                repo: repo.to_string(),
                reset,
            }),
            FetchOutcome::NotFound => Err(StackError::HostRequestFailed {
                repo: repo.to_string(),
                reason: "repository not found or not visible to this credential".to_string(),
            }),
            FetchOutcome::Failed(reason) => Err(StackError::HostRequestFailed {
                repo: repo.to_string(),
                reason,
            }),
            FetchOutcome::Found(_) | FetchOutcome::TimedOut => Err(StackError::HostRequestFailed {
                repo: repo.to_string(),
                reason: status.to_string(),
            }),
        }
    }
}

/// Map a non-success response to a fetch outcome.
///
/// 429 is always a rate limit. 403 is a rate limit only when the remaining
/// quota header reads zero; any other 403 is a plain failure.
pub(crate) fn classify_failure(status: StatusCode, headers: &HeaderMap) -> FetchOutcome {
    match status {
        StatusCode::NOT_FOUND => FetchOutcome::NotFound,
        StatusCode::UNAUTHORIZED => FetchOutcome::AuthError(status.to_string()),
        StatusCode::TOO_MANY_REQUESTS => FetchOutcome::RateLimited {
            reset: header_u64(headers, RATE_LIMIT_RESET),
        },
        StatusCode::FORBIDDEN if header_u64(headers, RATE_LIMIT_REMAINING) == Some(0) => {
            FetchOutcome::RateLimited {
                reset: header_u64(headers, RATE_LIMIT_RESET),
            }
        }
        _ => FetchOutcome::Failed(status.to_string()),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
