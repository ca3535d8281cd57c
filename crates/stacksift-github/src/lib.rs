//! # stacksift-github
//!
//! GitHub REST client for stacksift.
//!
//! Implements [`stacksift_core::RepoHost`] over `reqwest`, keeping the HTTP
//! stack out of the core crate. Only two endpoints are used:
//!
//! - `GET /repos/{owner}/{repo}/contents/{path}` (raw media type)
//! - `GET /repos/{owner}/{repo}/languages`

use thiserror::Error;

pub mod client;

pub use client::GitHubClient;

/// Errors raised while setting up the client.
///
/// Per-request failures never use this type; they are reported as
/// [`stacksift_core::FetchOutcome`] values or [`stacksift_core::StackError`].
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid API base URL `{0}`")]
    InvalidBaseUrl(String),
}
