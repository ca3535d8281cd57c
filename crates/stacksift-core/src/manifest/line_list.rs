//! Line-oriented manifests (`requirements.txt`, `Gemfile`, Gradle scripts).
//!
//! Each line is handled independently: comments are stripped, option and
//! URL lines are skipped, and the package name is cut off before any
//! version specifier.

use std::sync::LazyLock;

use regex::Regex;

/// Which line-oriented manifest layout to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDialect {
    /// pip `requirements.txt`.
    Requirements,
    /// Bundler `Gemfile`.
    Gemfile,
    /// Gradle `build.gradle` / `build.gradle.kts`.
    Gradle,
}

// name[extras] followed by anything (version specifiers, markers)
static PEP508_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?").expect("Invalid regex")
});

// `name[extras] @ url`, the only URL form that names its package
static PEP508_URL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*@").expect("Invalid regex")
});

static EGG_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#egg=([A-Za-z0-9][A-Za-z0-9._-]*)").expect("Invalid regex"));

static GEM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^gem\s*\(?\s*['"]([^'"]+)['"]"#).expect("Invalid regex"));

// implementation 'g:a:v' / implementation("g:a:v") / testImplementation group: 'g', name: 'a'
static GRADLE_COORDINATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:implementation|api|compile|compileOnly|runtimeOnly|testImplementation|testCompile|testRuntimeOnly|annotationProcessor|kapt|ksp|classpath|debugImplementation|releaseImplementation|androidTestImplementation)\s*\(?\s*['"]([^'"]+)['"]"#,
    )
    .expect("Invalid regex")
});

static GRADLE_MAP_NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"group\s*:\s*['"]([^'"]+)['"]\s*,\s*name\s*:\s*['"]([^'"]+)['"]"#)
        .expect("Invalid regex")
});

static GRADLE_PLUGIN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^id\s*\(?\s*['"]([^'"]+)['"]"#).expect("Invalid regex"));

/// Extract package names, one line at a time.
pub fn parse(content: &str, dialect: LineDialect) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let line = strip_comment(line, dialect).trim();
            if line.is_empty() {
                return None;
            }
            Some(match dialect {
                LineDialect::Requirements => requirement_name(line).into_iter().collect(),
                LineDialect::Gemfile => gem_name(line).into_iter().collect(),
                LineDialect::Gradle => gradle_names(line),
            })
        })
        .flatten()
        .collect()
}

fn strip_comment(line: &str, dialect: LineDialect) -> &str {
    let leader = match dialect {
        // pip only starts a comment at `#` preceded by whitespace, so `#egg=` survives.
        LineDialect::Requirements => {
            let pos = line.char_indices().find(|&(i, c)| {
                c == '#' && line[..i].chars().next_back().is_none_or(char::is_whitespace)
            });
            return match pos {
                Some((i, _)) => &line[..i],
                None => line,
            };
        }
        LineDialect::Gemfile => "#",
        LineDialect::Gradle => "//",
    };
    match line.find(leader) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Name of a PEP 508 requirement, without extras, versions or markers.
///
/// Returns `None` for pip options (`-r`, `--index-url`), local paths and
/// URLs that carry neither a `name @` prefix nor an `#egg=` fragment.
pub(crate) fn requirement_name(spec: &str) -> Option<String> {
    let spec = spec.trim();
    if spec.starts_with('-') || spec.starts_with('.') || spec.starts_with('/') {
        return None;
    }
    if spec.contains("://") {
        return url_requirement_name(spec);
    }
    let spec = spec.split(';').next().unwrap_or(spec).trim();

    PEP508_NAME
        .captures(spec)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// `pendulum @ https://...` or `git+https://host/repo.git@v1#egg=requests`
fn url_requirement_name(spec: &str) -> Option<String> {
    PEP508_URL_NAME
        .captures(spec)
        .or_else(|| EGG_FRAGMENT.captures(spec))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn gem_name(line: &str) -> Option<String> {
    GEM_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `group:artifact[:version]` yields both `group:artifact` and `artifact`.
fn gradle_names(line: &str) -> Vec<String> {
    if let Some(caps) = GRADLE_PLUGIN_ID.captures(line) {
        return caps
            .get(1)
            .map(|m| vec![m.as_str().to_string()])
            .unwrap_or_default();
    }

    if let Some(caps) = GRADLE_MAP_NOTATION.captures(line) {
        if let (Some(group), Some(name)) = (caps.get(1), caps.get(2)) {
            return vec![
                format!("{}:{}", group.as_str(), name.as_str()),
                name.as_str().to_string(),
            ];
        }
    }

    let Some(coordinate) = GRADLE_COORDINATE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Vec::new();
    };

    let mut parts = coordinate.split(':');
    match (parts.next(), parts.next()) {
        (Some(group), Some(artifact)) if !group.is_empty() && !artifact.is_empty() => {
            vec![format!("{}:{}", group, artifact), artifact.to_string()]
        }
        _ => Vec::new(),
    }
}
