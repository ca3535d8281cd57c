//! Exact-match alias index over a catalog snapshot.
//!
//! Three lookup tables are derived from the snapshot, all keyed by
//! normalized strings (trimmed, lower-cased):
//!
//! - slug → tool
//! - display name → tool
//! - package alias → tool
//!
//! Package matching only ever consults the alias table. There is no fallback
//! to slugs or names, no prefix/substring matching and no similarity scoring:
//! a declared package matches a tool only when it is literally one of that
//! tool's registered aliases. Tools in the `language` category are kept out
//! of the alias table entirely.
//!
//! # Collisions
//!
//! When two tools register the same alias, the tool that appears first in
//! the snapshot keeps it. Every dropped claim is recorded as an
//! [`AliasConflict`] and logged.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::{ToolId, ToolRecord};

/// Tokens that show up in build files but never name a package.
const NOISE_TOKENS: &[&str] = &[
    "module", "require", "replace", "exclude", "(", ")", "[", "]", "{", "}",
];

static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+(\.\d+)*$").expect("Invalid regex"));

/// Normalize a key for insertion or lookup.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a normalized token can never be a package identifier.
fn is_rejected_token(token: &str) -> bool {
    token.is_empty()
        || token.chars().count() == 1
        || VERSION_TOKEN.is_match(token)
        || NOISE_TOKENS.contains(&token)
}

/// A package alias claimed by more than one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasConflict {
    /// Normalized alias.
    pub alias: String,
    /// Tool that kept the alias (registered first).
    pub kept: ToolId,
    /// Tool whose claim was ignored.
    pub ignored: ToolId,
}

/// Immutable lookup tables built from one catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    by_slug: HashMap<String, ToolId>,
    by_name: HashMap<String, ToolId>,
    by_alias: HashMap<String, ToolId>,
    display_names: HashMap<ToolId, String>,
    conflicts: Vec<AliasConflict>,
    tool_count: usize,
}

impl AliasIndex {
    /// Build the index from catalog records. Pure; performs no I/O.
    pub fn build(records: &[ToolRecord]) -> Self {
        let mut index = Self {
            tool_count: records.len(),
            ..Self::default()
        };

        for record in records {
            index
                .display_names
                .entry(record.id.clone())
                .or_insert_with(|| record.name.clone());

            let slug = normalize(&record.slug);
            if !slug.is_empty() {
                index
                    .by_slug
                    .entry(slug)
                    .or_insert_with(|| record.id.clone());
            }

            let name = normalize(&record.name);
            if !name.is_empty() {
                index
                    .by_name
                    .entry(name)
                    .or_insert_with(|| record.id.clone());
            }

            if record.category.is_language() {
                continue;
            }

            for alias in &record.package_aliases {
                let alias = normalize(alias);
                if alias.is_empty() {
                    continue;
                }
                match index.by_alias.get(&alias) {
                    None => {
                        index.by_alias.insert(alias, record.id.clone());
                    }
                    Some(owner) if owner == &record.id => {}
                    Some(owner) => {
                        tracing::warn!(
                            alias = %alias,
                            kept = %owner,
                            ignored = %record.id,
                            "Package alias registered by more than one tool; keeping the first"
                        );
                        index.conflicts.push(AliasConflict {
                            alias,
                            kept: owner.clone(),
                            ignored: record.id.clone(),
                        });
                    }
                }
            }
        }

        index
    }

    /// Resolve one raw package identifier to a tool.
    ///
    /// Returns `None` for blank or single-character tokens, bare version
    /// strings, build-file keywords, and anything that is not exactly a
    /// registered alias after normalization.
    pub fn match_package(&self, raw: &str) -> Option<ToolId> {
        let token = normalize(raw);
        if is_rejected_token(&token) {
            return None;
        }
        self.by_alias.get(&token).cloned()
    }

    /// Resolve many identifiers into a deduplicated set of tools.
    pub fn match_packages<I, S>(&self, identifiers: I) -> BTreeSet<ToolId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .filter_map(|raw| self.match_package(raw.as_ref()))
            .collect()
    }

    /// Look up a tool by slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<&ToolId> {
        self.by_slug.get(&normalize(slug))
    }

    /// Look up a tool by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&ToolId> {
        self.by_name.get(&normalize(name))
    }

    /// Resolve a user-supplied tool reference: slug first, then name.
    pub fn find_tool(&self, query: &str) -> Option<&ToolId> {
        self.find_by_slug(query).or_else(|| self.find_by_name(query))
    }

    /// Package aliases that resolve to `id`, sorted.
    pub fn aliases_of(&self, id: &ToolId) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .by_alias
            .iter()
            .filter(|(_, owner)| *owner == id)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Display name of a tool, for output.
    pub fn display_name(&self, id: &ToolId) -> Option<&str> {
        self.display_names.get(id).map(String::as_str)
    }

    /// Alias collisions found while building.
    pub fn conflicts(&self) -> &[AliasConflict] {
        &self.conflicts
    }

    /// Number of catalog records the index was built from.
    pub fn tool_count(&self) -> usize {
        self.tool_count
    }

    /// Number of distinct package aliases in the index.
    pub fn alias_count(&self) -> usize {
        self.by_alias.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
