//! Go module files (`go.mod`).
//!
//! Only `require` directives contribute: the single-line form
//! `require path version` and every line inside a `require ( ... )` block.
//! The version suffix and `// indirect` markers are discarded. The module's
//! own `module` line, `go`/`toolchain` directives and `replace`/`exclude`
//! blocks are ignored.

/// Extract required module paths.
pub fn parse(content: &str) -> Vec<String> {
    let mut modules = Vec::new();
    let mut in_require_block = false;
    let mut in_other_block = false;

    for line in content.lines() {
        let line = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        if in_require_block || in_other_block {
            if line == ")" {
                in_require_block = false;
                in_other_block = false;
            } else if in_require_block {
                modules.extend(module_path(line));
            }
            continue;
        }

        let mut tokens = line.split_whitespace();
        let directive = tokens.next().unwrap_or_default();
        let rest: Vec<&str> = tokens.collect();

        match (directive, rest.as_slice()) {
            ("require", ["("]) => in_require_block = true,
            ("require", [path, ..]) => modules.extend(module_path(path)),
            ("replace" | "exclude" | "retract" | "tool" | "godebug", ["("]) => {
                in_other_block = true
            }
            _ => {}
        }
    }

    modules
}

/// First token of a requirement line, which is the module path.
fn module_path(line: &str) -> Option<String> {
    let path = line.split_whitespace().next()?.trim_matches('"');
    if path.is_empty() || path == "(" || path == ")" {
        return None;
    }
    Some(path.to_string())
}
