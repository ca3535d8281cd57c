//! Configuration types for stacksift.
//!
//! [`StacksiftConfig`] is loaded from `~/.stacksift/config.yaml` (or an
//! explicit path). A missing file means built-in defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! github:
//!   apiBaseUrl: https://api.github.com
//!   userAgent: stacksift
//! detection:
//!   fetchTimeoutMs: 500
//!   interactiveTimeoutMs: 3000
//!   batchSize: 10
//! catalog:
//!   path: /etc/stacksift/tools.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::StackError;

/// Default per-manifest timeout for bulk and opportunistic detection.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 500;

/// Default per-manifest timeout for interactive single-repository analysis.
pub const DEFAULT_INTERACTIVE_TIMEOUT_MS: u64 = 3_000;

/// Default number of repositories detected concurrently in bulk sync.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default hosting API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default `User-Agent` sent to the hosting API.
pub const DEFAULT_USER_AGENT: &str = concat!("stacksift/", env!("CARGO_PKG_VERSION"));

/// Timeouts above this are accepted but reported as a warning.
const SLOW_TIMEOUT_WARNING_MS: u64 = 30_000;

// ============================================================================
// Sections
// ============================================================================

/// Hosting API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubConfig {
    /// Base URL of the REST API.
    pub api_base_url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Detection tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionConfig {
    /// Per-manifest timeout for bulk detection, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Per-manifest timeout for interactive detection, in milliseconds.
    pub interactive_timeout_ms: u64,
    /// Repositories processed concurrently per bulk batch.
    pub batch_size: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            interactive_timeout_ms: DEFAULT_INTERACTIVE_TIMEOUT_MS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl DetectionConfig {
    /// Per-manifest timeout for bulk detection.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Per-manifest timeout for interactive detection.
    pub fn interactive_timeout(&self) -> Duration {
        Duration::from_millis(self.interactive_timeout_ms)
    }
}

/// Where the tool catalog lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogConfig {
    /// Path to a JSON or YAML catalog file.
    pub path: Option<PathBuf>,
}

// ============================================================================
// StacksiftConfig
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StacksiftConfig {
    /// Hosting API settings.
    pub github: GithubConfig,
    /// Detection tuning.
    pub detection: DetectionConfig,
    /// Catalog location.
    pub catalog: CatalogConfig,
}

impl StacksiftConfig {
    /// Load from the default location (`~/.stacksift/config.yaml`).
    ///
    /// # Errors
    ///
    /// Returns [`StackError::InvalidConfig`] if the file exists but cannot be
    /// parsed, and [`StackError::InvalidConfiguration`] if validation fails.
    pub fn load_default() -> Result<Self, StackError> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path. A missing file yields defaults.
    pub fn from_path(path: &Path) -> Result<Self, StackError> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            StackError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                StackError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };

        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Default config directory (`~/.stacksift`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".stacksift"))
    }

    /// Default config file path (`~/.stacksift/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join("config.yaml"))
    }

    /// Check values, returning non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::InvalidConfiguration`] for values that would make
    /// detection impossible.
    pub fn validate(&self) -> Result<Vec<String>, StackError> {
        let mut warnings = Vec::new();

        if self.detection.batch_size == 0 {
            return Err(StackError::InvalidConfiguration {
                message: "detection.batchSize must be greater than 0".to_string(),
                hint: format!("Remove the key to use the default ({})", DEFAULT_BATCH_SIZE),
            });
        }

        if self.detection.fetch_timeout_ms == 0 || self.detection.interactive_timeout_ms == 0 {
            return Err(StackError::InvalidConfiguration {
                message: "detection timeouts must be greater than 0".to_string(),
                hint: format!(
                    "Use e.g. fetchTimeoutMs: {} and interactiveTimeoutMs: {}",
                    DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_INTERACTIVE_TIMEOUT_MS
                ),
            });
        }

        let base = self.github.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(StackError::InvalidConfiguration {
                message: format!("github.apiBaseUrl `{}` is not an http(s) URL", base),
                hint: format!("Use {} for github.com", DEFAULT_API_BASE_URL),
            });
        }

        if self.detection.fetch_timeout_ms > SLOW_TIMEOUT_WARNING_MS {
            warnings.push(format!(
                "detection.fetchTimeoutMs is {}ms; a slow manifest will hold up each bulk batch",
                self.detection.fetch_timeout_ms
            ));
        }

        if self.detection.batch_size > 100 {
            warnings.push(format!(
                "detection.batchSize is {}; large batches are likely to hit hosting API rate limits",
                self.detection.batch_size
            ));
        }

        Ok(warnings)
    }
}
