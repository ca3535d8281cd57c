//! JSON dependency maps (`package.json`, `composer.json`).

/// Which JSON manifest layout to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonDialect {
    /// npm/yarn/pnpm `package.json`.
    Npm,
    /// PHP Composer `composer.json`.
    Composer,
}

impl JsonDialect {
    fn sections(&self) -> &'static [&'static str] {
        match self {
            Self::Npm => &[
                "dependencies",
                "devDependencies",
                "peerDependencies",
                "optionalDependencies",
            ],
            Self::Composer => &["require", "require-dev"],
        }
    }

    /// Keys that declare a platform requirement rather than a package.
    fn is_platform_key(&self, name: &str) -> bool {
        match self {
            Self::Npm => false,
            Self::Composer => name == "php" || name.starts_with("ext-") || name.starts_with("lib-"),
        }
    }
}

/// Emit the keys of every dependency object. Missing sections are empty;
/// unparseable JSON yields nothing.
pub fn parse(content: &str, dialect: JsonDialect) -> Vec<String> {
    let json: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Failed to parse JSON manifest: {}", e);
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    for section in dialect.sections() {
        if let Some(deps) = json.get(*section).and_then(|v| v.as_object()) {
            names.extend(
                deps.keys()
                    .filter(|name| !dialect.is_platform_key(name))
                    .cloned(),
            );
        }
    }
    names
}
