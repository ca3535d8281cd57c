//! Source-code volume by language.
//!
//! Independent of dependency detection: the breakdown describes how many bytes
//! of each language a repository holds, and is never merged with tool ids.

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::StackError;
use crate::host::{Credential, RepoHost, RepoRef};

/// Synthetic bucket reported by the host for unclassified files.
const OTHER_BUCKET: &str = "Other";

/// Languages under this share of the total are dropped.
const MIN_SHARE_PERCENT: f64 = 1.0;

/// Maximum number of languages returned.
const MAX_LANGUAGES: usize = 3;

/// One language's share of a repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    /// Language name as reported by the host.
    pub name: String,
    /// Bytes of source in this language.
    pub bytes: u64,
    /// `bytes / total * 100`, rounded to two decimals.
    pub percentage: f64,
}

/// Rank raw byte counts into at most three significant languages.
///
/// The total excludes the `Other` bucket and is taken before the 1% cut, so
/// percentages are relative to all classified source.
pub fn language_breakdown(raw: HashMap<String, u64>) -> Vec<LanguageShare> {
    let mut entries: Vec<(String, u64)> = raw
        .into_iter()
        .filter(|(name, _)| name != OTHER_BUCKET)
        .collect();

    let total: u64 = entries.iter().map(|(_, bytes)| *bytes).sum();
    if total == 0 {
        return Vec::new();
    }

    // Descending by bytes; name breaks ties so output is stable.
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    entries
        .into_iter()
        .map(|(name, bytes)| {
            let share = bytes as f64 / total as f64 * 100.0;
            (name, bytes, share)
        })
        .filter(|(_, _, share)| *share >= MIN_SHARE_PERCENT)
        .take(MAX_LANGUAGES)
        .map(|(name, bytes, share)| LanguageShare {
            name,
            bytes,
            percentage: (share * 100.0).round() / 100.0,
        })
        .collect()
}

/// Fetch language counts from the host and rank them.
pub async fn fetch_language_breakdown(
    host: &dyn RepoHost,
    repo: &RepoRef,
    credential: &Credential,
) -> Result<Vec<LanguageShare>, StackError> {
    let raw = host.languages(repo, credential).await?;
    let breakdown = language_breakdown(raw);
    tracing::debug!(repo = %repo, languages = breakdown.len(), "Computed language breakdown");
    Ok(breakdown)
}
