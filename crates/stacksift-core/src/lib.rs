//! # stacksift-core
//!
//! **Stack detection** engine library.
//!
//! Turns a repository's dependency manifests into a set of known developer
//! tools from a curated catalog, and ranks a repository's languages by
//! source volume. The crate performs no HTTP itself; a [`RepoHost`]
//! implementation (see `stacksift-github`) supplies file contents and
//! language statistics.
//!
//! ## Main Types
//!
//! - [`Detector`] – single and bulk detection over a host and a catalog
//! - [`CatalogCache`] – lazily built, swappable [`AliasIndex`]
//! - [`StackError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`alias_index`] – exact-match package alias index
//! - [`catalog`] – tool records and catalog sources
//! - [`config`] – configuration types (StacksiftConfig)
//! - [`detect`] – the detection orchestrator
//! - [`errors`] – error types
//! - [`host`] – repository references, credentials, hosting-API seam
//! - [`languages`] – language breakdown
//! - [`manifest`] – manifest descriptors and parsers
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stacksift_core::{CatalogCache, Credential, DetectOptions, Detector, FileCatalog};
//!
//! let cache = Arc::new(CatalogCache::new(Arc::new(FileCatalog::new("tools.json"))));
//! let detector = Detector::new(host, cache, DetectOptions::default());
//!
//! let result = detector.detect(&"acme/web".parse()?, &Credential::bearer(token)).await?;
//! for id in &result.tool_ids {
//!     println!("{}", id);
//! }
//! ```

pub mod alias_index;
pub mod catalog;
pub mod config;
pub mod detect;
pub mod errors;
pub mod host;
pub mod languages;
pub mod manifest;

pub use alias_index::{AliasConflict, AliasIndex};
pub use catalog::{
    CatalogCache, CatalogSource, FileCatalog, StaticCatalog, ToolCategory, ToolId, ToolRecord,
};
pub use config::StacksiftConfig;
pub use detect::{BulkReport, DetectOptions, DetectionResult, Detector};
pub use errors::StackError;
pub use host::{Credential, FetchOutcome, RepoHost, RepoRef, TokenScheme};
pub use languages::{fetch_language_breakdown, language_breakdown, LanguageShare};
pub use manifest::{Ecosystem, ManifestDescriptor, ParserKind, MANIFEST_DESCRIPTORS};
