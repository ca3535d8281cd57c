//! Error types for stacksift-core.

use thiserror::Error;

/// Domain-specific errors for detection operations.
///
/// Only a handful of these ever cross the orchestrator boundary:
/// [`StackError::CatalogUnavailable`], [`StackError::CredentialAuth`] and
/// [`StackError::RateLimited`]. Missing manifests, timeouts and malformed
/// manifest content are absorbed locally and never become errors.
#[derive(Error, Debug)]
pub enum StackError {
    /// The tool catalog could not be loaded. Nothing can be matched without it.
    #[error("Tool catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The credential was rejected by the hosting API.
    ///
    /// Terminal for the whole detection call: retrying with the same
    /// credential cannot succeed.
    #[error("Credential rejected while reading `{repo}`: {reason}. Re-authenticate and try again.")]
    CredentialAuth {
        /// Repository being analysed when the rejection happened.
        repo: String,
        /// Reason reported by the host.
        reason: String,
    },

    /// The hosting API rate limit is exhausted for this credential.
    #[error("Hosting API rate limit reached while reading `{repo}`{}", format_reset(.reset))]
    RateLimited {
        /// Repository being analysed when the limit was hit.
        repo: String,
        /// Epoch seconds at which the limit resets, if the host reported it.
        reset: Option<u64>,
    },

    /// A hosting API request failed for a reason other than auth or absence.
    #[error("Hosting API request for `{repo}` failed: {reason}")]
    HostRequestFailed {
        /// Repository the request targeted.
        repo: String,
        /// Description of the failure.
        reason: String,
    },

    /// A repository reference could not be parsed.
    #[error("Invalid repository `{0}`: expected OWNER/REPO")]
    InvalidRepoRef(String),

    /// Configuration file is invalid.
    #[error("Config invalid: {0}")]
    InvalidConfig(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A wrapped generic error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StackError {
    /// Whether this error means the credential itself is unusable.
    ///
    /// Callers use this to ask the user to re-authenticate instead of
    /// reporting a generic failure.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::CredentialAuth { .. })
    }

    /// Whether this error aborts a single-repository detection call.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::CatalogUnavailable(_) | Self::CredentialAuth { .. } | Self::RateLimited { .. }
        )
    }
}

fn format_reset(reset: &Option<u64>) -> String {
    match reset {
        Some(epoch) => format!(" (resets at epoch {})", epoch),
        None => String::new(),
    }
}
