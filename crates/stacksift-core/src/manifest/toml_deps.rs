//! TOML manifests (`Cargo.toml`, `pyproject.toml`, `Pipfile`, `Anchor.toml`).
//!
//! Parsed with the `toml` crate; only dependency-table keys (or PEP 508
//! strings, for `pyproject.toml`) are read. A document that fails to parse
//! yields nothing.

use super::line_list::requirement_name;

/// Which TOML manifest layout to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TomlDialect {
    /// Rust `Cargo.toml`.
    Cargo,
    /// Python `pyproject.toml` (PEP 621 and Poetry).
    Pyproject,
    /// Pipenv `Pipfile`.
    Pipfile,
    /// Solana Anchor workspace `Anchor.toml`.
    Anchor,
}

const CARGO_SECTIONS: &[&str] = &["dependencies", "dev-dependencies", "build-dependencies"];

/// Marker emitted for every Anchor workspace.
const ANCHOR_MARKER: &str = "anchor-lang";

/// Extract package names for the given dialect.
pub fn parse(content: &str, dialect: TomlDialect) -> Vec<String> {
    let parsed: toml::Value = match toml::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Failed to parse TOML manifest ({:?}): {}", dialect, e);
            return Vec::new();
        }
    };

    match dialect {
        TomlDialect::Cargo => parse_cargo(&parsed),
        TomlDialect::Pyproject => parse_pyproject(&parsed),
        TomlDialect::Pipfile => {
            let mut names = table_keys(parsed.get("packages"));
            names.extend(table_keys(parsed.get("dev-packages")));
            names
        }
        TomlDialect::Anchor => parse_anchor(&parsed),
    }
}

fn table_keys(value: Option<&toml::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_table())
        .map(|t| t.keys().cloned().collect())
        .unwrap_or_default()
}

/// Keys of a Cargo dependency table, plus the real crate name of renamed
/// dependencies (`alias = { package = "real" }`).
fn cargo_table_names(value: Option<&toml::Value>) -> Vec<String> {
    let Some(table) = value.and_then(|v| v.as_table()) else {
        return Vec::new();
    };
    let mut names = Vec::with_capacity(table.len());
    for (name, spec) in table {
        names.push(name.clone());
        if let Some(real) = spec.get("package").and_then(|p| p.as_str()) {
            names.push(real.to_string());
        }
    }
    names
}

fn parse_cargo(parsed: &toml::Value) -> Vec<String> {
    let mut names = Vec::new();

    for section in CARGO_SECTIONS {
        names.extend(cargo_table_names(parsed.get(*section)));
    }

    // [target.'cfg(...)'.dependencies]
    if let Some(targets) = parsed.get("target").and_then(|v| v.as_table()) {
        for target_table in targets.values() {
            for section in CARGO_SECTIONS {
                names.extend(cargo_table_names(target_table.get(*section)));
            }
        }
    }

    names.extend(cargo_table_names(
        parsed.get("workspace").and_then(|w| w.get("dependencies")),
    ));

    names
}

fn parse_pyproject(parsed: &toml::Value) -> Vec<String> {
    let mut names = Vec::new();

    let pep508_array = |value: Option<&toml::Value>| -> Vec<String> {
        value
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|dep| dep.as_str())
                    .filter_map(requirement_name)
                    .collect()
            })
            .unwrap_or_default()
    };

    // PEP 621
    let project = parsed.get("project");
    names.extend(pep508_array(project.and_then(|p| p.get("dependencies"))));
    if let Some(optional) = project
        .and_then(|p| p.get("optional-dependencies"))
        .and_then(|d| d.as_table())
    {
        for group in optional.values() {
            names.extend(pep508_array(Some(group)));
        }
    }

    // Poetry
    let poetry = parsed.get("tool").and_then(|t| t.get("poetry"));
    names.extend(
        table_keys(poetry.and_then(|p| p.get("dependencies")))
            .into_iter()
            .filter(|name| name != "python"),
    );
    names.extend(table_keys(poetry.and_then(|p| p.get("dev-dependencies"))));
    if let Some(groups) = poetry
        .and_then(|p| p.get("group"))
        .and_then(|g| g.as_table())
    {
        for group in groups.values() {
            names.extend(table_keys(group.get("dependencies")));
        }
    }

    names
}

fn parse_anchor(parsed: &toml::Value) -> Vec<String> {
    let mut names = vec![ANCHOR_MARKER.to_string()];
    // [toolchain] anchor_version = "0.29.0", solana_version = "1.17.0"
    if let Some(toolchain) = parsed.get("toolchain").and_then(|t| t.as_table()) {
        names.extend(
            toolchain
                .keys()
                .filter_map(|key| key.strip_suffix("_version"))
                .map(str::to_string),
        );
    }
    names
}
