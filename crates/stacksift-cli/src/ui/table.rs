//! Table rendering for CLI output using comfy-table.
//!
//! | Command | Table Function |
//! |---------|----------------|
//! | `stacksift sync` | `render_sync_table()` |
//! | `stacksift languages` | `render_languages_table()` |
//! | `stacksift catalog check` | `render_conflicts_table()` |

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};
use stacksift_core::{AliasConflict, LanguageShare};

/// One repository line of a bulk sync.
#[derive(Debug, Clone)]
pub struct SyncRow {
    /// `owner/repo`
    pub repo: String,
    /// Whether detection succeeded.
    pub ok: bool,
    /// Number of tools detected (0 on failure).
    pub tools: usize,
    /// Tool names on success, error message on failure.
    pub detail: String,
}

/// Render the per-repository result table for `stacksift sync`.
///
/// # Example Output
///
/// ```text
/// REPO          STATUS   TOOLS   DETAIL
/// acme/web      ok           2   Express, React
/// acme/legacy   err          0   Credential rejected while reading ...
/// ```
pub fn render_sync_table(rows: &[SyncRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("REPO"),
        Cell::new("STATUS"),
        Cell::new("TOOLS").set_alignment(CellAlignment::Right),
        Cell::new("DETAIL"),
    ]);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::UpperBoundary(Width::Fixed(72)),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.repo),
            Cell::new(if row.ok { "ok" } else { "err" }),
            Cell::new(row.tools).set_alignment(CellAlignment::Right),
            Cell::new(&row.detail),
        ]);
    }

    table.to_string()
}

/// Render the language breakdown for `stacksift languages`.
///
/// # Example Output
///
/// ```text
/// LANGUAGE     BYTES     SHARE
/// Rust         60000    60.00%
/// TypeScript   30000    30.00%
/// ```
pub fn render_languages_table(languages: &[LanguageShare]) -> String {
    if languages.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("LANGUAGE"),
        Cell::new("BYTES").set_alignment(CellAlignment::Right),
        Cell::new("SHARE").set_alignment(CellAlignment::Right),
    ]);

    for lang in languages {
        table.add_row(vec![
            Cell::new(&lang.name),
            Cell::new(lang.bytes).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", lang.percentage)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

/// Render alias collisions for `stacksift catalog check`.
pub fn render_conflicts_table(conflicts: &[AliasConflict]) -> String {
    if conflicts.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("ALIAS"),
        Cell::new("KEPT"),
        Cell::new("IGNORED"),
    ]);

    for conflict in conflicts {
        table.add_row(vec![
            Cell::new(&conflict.alias),
            Cell::new(conflict.kept.as_str()),
            Cell::new(conflict.ignored.as_str()),
        ]);
    }

    table.to_string()
}
