//! Dependency manifests: which files to fetch and how to read them.
//!
//! Every supported manifest is described by a [`ManifestDescriptor`]: the
//! ecosystem it belongs to, its path at the repository root, and the
//! [`ParserKind`] that extracts raw package identifiers from it. The
//! descriptor table is plain data; adding an ecosystem means adding a row
//! (and, for a new format, a variant whose handler the compiler forces into
//! [`ParserKind::parse`]).
//!
//! ## Supported Manifests
//!
//! | Ecosystem | Path | Parser |
//! |-----------|------|--------|
//! | Node | `package.json` | JSON dependency maps |
//! | Python | `requirements.txt` | line list |
//! | Python | `pyproject.toml` | TOML tables |
//! | Python | `Pipfile` | TOML tables |
//! | Go | `go.mod` | module lines |
//! | Rust | `Cargo.toml` | TOML tables |
//! | Ruby | `Gemfile` | line list |
//! | PHP | `composer.json` | JSON dependency maps |
//! | Java (Maven) | `pom.xml` | XML dependency elements |
//! | Java (Gradle) | `build.gradle`, `build.gradle.kts` | line list |
//! | Dart | `pubspec.yaml` | YAML dependency maps |
//! | Anchor | `Anchor.toml` | TOML tables |
//!
//! All parsers are total: manifest content is untrusted third-party text, so
//! malformed input yields an empty list instead of an error.

use serde::Serialize;

pub mod json_deps;
pub mod line_list;
pub mod module_lines;
pub mod toml_deps;
pub mod xml_deps;
pub mod yaml_deps;

pub use json_deps::JsonDialect;
pub use line_list::LineDialect;
pub use toml_deps::TomlDialect;

// ============================================================================
// Types
// ============================================================================

/// Package ecosystem a manifest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ecosystem {
    Node,
    Python,
    Go,
    Rust,
    Ruby,
    Php,
    JavaMaven,
    JavaGradle,
    Dart,
    Anchor,
}

impl Ecosystem {
    /// Short tag used in logs and output.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Python => "python",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::JavaMaven => "java-maven",
            Self::JavaGradle => "java-gradle",
            Self::Dart => "dart",
            Self::Anchor => "anchor",
        }
    }
}

/// How a manifest is turned into raw package identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// JSON document with dependency objects whose keys are package names.
    JsonDeps(JsonDialect),
    /// One declaration per line.
    LineList(LineDialect),
    /// Go-style `require` lines and blocks.
    ModuleLines,
    /// TOML tables whose keys are package names.
    TomlDeps(TomlDialect),
    /// YAML maps whose keys are package names.
    YamlDeps,
    /// Maven `<dependency>` elements.
    XmlDeps,
}

impl ParserKind {
    /// Extract raw package identifiers from manifest bytes.
    ///
    /// Never fails; invalid UTF-8 is decoded lossily and malformed content
    /// yields whatever could be recovered (usually nothing).
    pub fn parse(&self, bytes: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_start_matches('\u{feff}');
        match self {
            Self::JsonDeps(dialect) => json_deps::parse(text, *dialect),
            Self::LineList(dialect) => line_list::parse(text, *dialect),
            Self::ModuleLines => module_lines::parse(text),
            Self::TomlDeps(dialect) => toml_deps::parse(text, *dialect),
            Self::YamlDeps => yaml_deps::parse(text),
            Self::XmlDeps => xml_deps::parse(text),
        }
    }
}

/// A dependency-declaring file to look for at a repository root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestDescriptor {
    /// Ecosystem of the manifest.
    pub ecosystem: Ecosystem,
    /// Path relative to the repository root.
    pub path: &'static str,
    /// Parser for the file's content.
    pub parser: ParserKind,
}

impl ManifestDescriptor {
    const fn new(ecosystem: Ecosystem, path: &'static str, parser: ParserKind) -> Self {
        Self {
            ecosystem,
            path,
            parser,
        }
    }
}

// ============================================================================
// Descriptor table
// ============================================================================

/// Every manifest fetched for a repository.
pub const MANIFEST_DESCRIPTORS: &[ManifestDescriptor] = &[
    ManifestDescriptor::new(
        Ecosystem::Node,
        "package.json",
        ParserKind::JsonDeps(JsonDialect::Npm),
    ),
    ManifestDescriptor::new(
        Ecosystem::Python,
        "requirements.txt",
        ParserKind::LineList(LineDialect::Requirements),
    ),
    ManifestDescriptor::new(
        Ecosystem::Python,
        "pyproject.toml",
        ParserKind::TomlDeps(TomlDialect::Pyproject),
    ),
    ManifestDescriptor::new(
        Ecosystem::Python,
        "Pipfile",
        ParserKind::TomlDeps(TomlDialect::Pipfile),
    ),
    ManifestDescriptor::new(Ecosystem::Go, "go.mod", ParserKind::ModuleLines),
    ManifestDescriptor::new(
        Ecosystem::Rust,
        "Cargo.toml",
        ParserKind::TomlDeps(TomlDialect::Cargo),
    ),
    ManifestDescriptor::new(
        Ecosystem::Ruby,
        "Gemfile",
        ParserKind::LineList(LineDialect::Gemfile),
    ),
    ManifestDescriptor::new(
        Ecosystem::Php,
        "composer.json",
        ParserKind::JsonDeps(JsonDialect::Composer),
    ),
    ManifestDescriptor::new(Ecosystem::JavaMaven, "pom.xml", ParserKind::XmlDeps),
    ManifestDescriptor::new(
        Ecosystem::JavaGradle,
        "build.gradle",
        ParserKind::LineList(LineDialect::Gradle),
    ),
    ManifestDescriptor::new(
        Ecosystem::JavaGradle,
        "build.gradle.kts",
        ParserKind::LineList(LineDialect::Gradle),
    ),
    ManifestDescriptor::new(Ecosystem::Dart, "pubspec.yaml", ParserKind::YamlDeps),
    ManifestDescriptor::new(
        Ecosystem::Anchor,
        "Anchor.toml",
        ParserKind::TomlDeps(TomlDialect::Anchor),
    ),
];

/// Find the descriptor for a manifest path.
pub fn descriptor_for(path: &str) -> Option<&'static ManifestDescriptor> {
    MANIFEST_DESCRIPTORS.iter().find(|d| d.path == path)
}
