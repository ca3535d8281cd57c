//! Dart `pubspec.yaml`.

const SECTIONS: &[&str] = &["dependencies", "dev_dependencies"];

/// Emit the keys of `dependencies` and `dev_dependencies`.
pub fn parse(content: &str) -> Vec<String> {
    let parsed: serde_yaml::Value = match serde_yaml::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Failed to parse YAML manifest: {}", e);
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    for section in SECTIONS {
        if let Some(deps) = parsed.get(*section).and_then(|v| v.as_mapping()) {
            names.extend(deps.keys().filter_map(|k| k.as_str()).map(str::to_string));
        }
    }
    names
}
