//! Tool catalog snapshot and loading.
//!
//! The catalog is the curated list of known tools. Detection only ever reads
//! it: a [`CatalogSource`] lists the records, and a [`CatalogCache`] turns
//! that list into a shared [`AliasIndex`] that is built once per snapshot and
//! then queried by any number of concurrent detection calls.
//!
//! # Refresh policy
//!
//! A loaded snapshot stays valid for the lifetime of the cache. Callers that
//! mutate the underlying catalog call [`CatalogCache::invalidate`] (lazy
//! reload on next use) or [`CatalogCache::reload`] (eager rebuild). Rebuilds
//! construct a complete new index and then swap the shared `Arc`, so readers
//! holding the previous index keep a consistent view.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::alias_index::AliasIndex;
use crate::errors::StackError;

// ============================================================================
// Types
// ============================================================================

/// Opaque, unique identifier of a catalog tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(String);

impl ToolId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Catalog category of a tool.
///
/// Only `Language` changes matching behavior: language tools are identified
/// from byte statistics, never from declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    /// A programming language.
    Language,
    /// Frontend framework or library.
    Frontend,
    /// Backend framework or library.
    Backend,
    /// Database, driver or ORM.
    Database,
    /// Build, test or developer tooling.
    Devtool,
    /// Infrastructure and deployment.
    Infra,
    /// Anything else.
    #[serde(other)]
    Other,
}

impl ToolCategory {
    /// Whether tools of this category are excluded from package matching.
    pub fn is_language(&self) -> bool {
        matches!(self, Self::Language)
    }
}

/// One entry of the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    /// Unique identifier.
    pub id: ToolId,
    /// URL-safe unique key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Category of the tool.
    pub category: ToolCategory,
    /// Declared dependency names known to refer to this tool.
    #[serde(default)]
    pub package_aliases: Vec<String>,
}

impl ToolRecord {
    /// Create a record with no aliases.
    pub fn new(
        id: impl Into<String>,
        slug: impl Into<String>,
        name: impl Into<String>,
        category: ToolCategory,
    ) -> Self {
        Self {
            id: ToolId::new(id),
            slug: slug.into(),
            name: name.into(),
            category,
            package_aliases: Vec::new(),
        }
    }

    /// Add package aliases to the record.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.package_aliases
            .extend(aliases.into_iter().map(Into::into));
        self
    }
}

// ============================================================================
// CatalogSource
// ============================================================================

/// Read access to the persisted tool catalog.
///
/// Implementors must return either the complete list or an error; detection
/// never proceeds with a partial snapshot. An empty catalog is `Ok(vec![])`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List every tool in the catalog.
    async fn list_tools(&self) -> Result<Vec<ToolRecord>, StackError>;
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    records: Vec<ToolRecord>,
}

impl StaticCatalog {
    /// Create a catalog from a fixed list of records.
    pub fn new(records: Vec<ToolRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_tools(&self) -> Result<Vec<ToolRecord>, StackError> {
        Ok(self.records.clone())
    }
}

/// Catalog stored as a JSON or YAML file (a list of [`ToolRecord`]s).
///
/// The format is chosen from the extension: `.yaml`/`.yml` are YAML,
/// everything else is JSON.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Create a catalog reader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn list_tools(&self) -> Result<Vec<ToolRecord>, StackError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            StackError::CatalogUnavailable(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<ToolRecord> = if self.is_yaml() {
            serde_yaml::from_str(&content).map_err(|e| {
                StackError::CatalogUnavailable(format!(
                    "failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                StackError::CatalogUnavailable(format!(
                    "failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            })?
        };

        tracing::debug!(
            "Loaded {} tools from catalog {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

// ============================================================================
// CatalogCache
// ============================================================================

/// Lazily loaded, swappable alias index over a [`CatalogSource`].
///
/// Owned explicitly by whoever constructs it (typically once at startup);
/// tests build isolated instances over fixture catalogs.
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    current: RwLock<Option<Arc<AliasIndex>>>,
}

impl CatalogCache {
    /// Create an empty cache over `source`. Nothing is loaded until first use.
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
        }
    }

    /// Get the current index, loading the snapshot on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::CatalogUnavailable`] if the snapshot cannot be
    /// loaded. A failed load leaves the cache empty so the next call retries.
    pub async fn index(&self) -> Result<Arc<AliasIndex>, StackError> {
        if let Some(index) = self.current.read().await.as_ref() {
            return Ok(Arc::clone(index));
        }

        let mut slot = self.current.write().await;
        // Another caller may have loaded while we waited for the write lock.
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(self.build().await?);
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Rebuild the index from a fresh snapshot and swap it in.
    ///
    /// On failure the previous index (if any) stays in place.
    pub async fn reload(&self) -> Result<Arc<AliasIndex>, StackError> {
        let index = Arc::new(self.build().await?);
        *self.current.write().await = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Drop the cached index; the next [`index`](Self::index) call reloads.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
        tracing::debug!("Catalog cache invalidated");
    }

    /// Whether an index is currently cached.
    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    async fn build(&self) -> Result<AliasIndex, StackError> {
        let records = self.source.list_tools().await?;
        let index = AliasIndex::build(&records);
        tracing::info!(
            tools = index.tool_count(),
            aliases = index.alias_count(),
            conflicts = index.conflicts().len(),
            "Built alias index from catalog snapshot"
        );
        Ok(index)
    }
}

impl fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCache").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
