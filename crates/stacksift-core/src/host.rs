//! Hosting-API seam: repository references, credentials, and the
//! [`RepoHost`] trait implemented by concrete clients.
//!
//! The core never talks HTTP itself. It asks a `RepoHost` for file contents
//! and language statistics and receives typed outcomes, so "the file is not
//! there" and "the credential is dead" stay distinguishable all the way up.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StackError;

// ============================================================================
// RepoRef
// ============================================================================

/// An `owner/repo` pair on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoRef {
    /// Account or organization that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Create a reference from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = StackError;

    /// Parse `owner/repo`. A trailing `.git` and surrounding slashes are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(StackError::InvalidRepoRef(s.to_string())),
        }
    }
}

// ============================================================================
// Credential
// ============================================================================

/// How a token is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScheme {
    /// `Authorization: Bearer <token>` (OAuth and fine-grained tokens).
    #[default]
    Bearer,
    /// `Authorization: token <token>` (legacy personal access tokens).
    Token,
}

impl FromStr for TokenScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bearer" => Ok(Self::Bearer),
            "token" | "legacy" => Ok(Self::Token),
            _ => Err(format!(
                "Unknown token scheme: '{}'. Use 'bearer' or 'token'.",
                s
            )),
        }
    }
}

/// A hosting-API credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    scheme: TokenScheme,
}

impl Credential {
    /// Create a credential with an explicit scheme.
    pub fn new(token: impl Into<String>, scheme: TokenScheme) -> Self {
        Self {
            token: token.into(),
            scheme,
        }
    }

    /// Create a bearer credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(token, TokenScheme::Bearer)
    }

    /// The header scheme for this credential.
    pub fn scheme(&self) -> TokenScheme {
        self.scheme
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        match self.scheme {
            TokenScheme::Bearer => format!("Bearer {}", self.token),
            TokenScheme::Token => format!("token {}", self.token),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("scheme", &self.scheme)
            .finish()
    }
}

// ============================================================================
// FetchOutcome
// ============================================================================

/// Result of asking the host for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file exists; raw bytes.
    Found(Vec<u8>),
    /// The file (or repository) does not exist. The common case.
    NotFound,
    /// The request did not finish within its timeout.
    TimedOut,
    /// The credential was rejected.
    AuthError(String),
    /// The credential's rate limit is exhausted.
    RateLimited {
        /// Epoch seconds at which the limit resets, if reported.
        reset: Option<u64>,
    },
    /// Any other failure (server error, transport error, unexpected status).
    Failed(String),
}

impl FetchOutcome {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not-found",
            Self::TimedOut => "timed-out",
            Self::AuthError(_) => "auth-error",
            Self::RateLimited { .. } => "rate-limited",
            Self::Failed(_) => "failed",
        }
    }
}

// ============================================================================
// RepoHost
// ============================================================================

/// Source-control hosting API used by detection.
///
/// Implementations should not apply their own per-file timeout; the
/// orchestrator wraps every call in an independent one.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Fetch the raw contents of `path` at the default branch of `repo`.
    async fn fetch_file(&self, repo: &RepoRef, path: &str, credential: &Credential) -> FetchOutcome;

    /// Fetch the byte count per language for `repo`.
    async fn languages(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<HashMap<String, u64>, StackError>;
}
