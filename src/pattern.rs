//! Shell-glob matching of file base names

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::warn;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Match a shell glob against a name.
///
/// `*` and `?` never match `/`. Classes negate with either `[!...]` or
/// `[^...]`, and a backslash makes the next character literal. Malformed
/// patterns never match.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    normalize(pattern)
        .and_then(|p| Pattern::new(&p).ok())
        .is_some_and(|p| p.matches_with(name, MATCH_OPTIONS))
}

/// Rewrite shell glob syntax into the dialect `glob::Pattern` parses.
///
/// Returns `None` for a trailing backslash, or an escaped `]` that is not
/// the first member of its class.
fn normalize(pattern: &str) -> Option<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str(&Pattern::escape(&chars.next()?.to_string())),
            '[' => {
                out.push('[');
                if chars.next_if(|&n| n == '^' || n == '!').is_some() {
                    out.push('!');
                }
                let mut first = true;
                loop {
                    let member = chars.next()?;
                    match member {
                        '\\' => match chars.next()? {
                            ']' if !first => return None,
                            escaped => out.push(escaped),
                        },
                        ']' if !first => {
                            out.push(']');
                            break;
                        }
                        other => out.push(other),
                    }
                    first = false;
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// Base name of a path, lossily converted. Empty for paths like `/` or `..`.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Include/exclude name patterns for one run.
///
/// `None` include patterns means every name is included; an empty list
/// includes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

impl NameFilter {
    pub fn new(include: Option<Vec<String>>, exclude: Option<Vec<String>>) -> Self {
        Self { include, exclude }
    }

    /// Check a path's base name against both pattern lists.
    pub fn accepts(&self, path: &Path) -> bool {
        let name = base_name(path);

        if let Some(include) = &self.include {
            if !include.iter().any(|p| glob_match(p, &name)) {
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|p| glob_match(p, &name)) {
                return false;
            }
        }

        true
    }
}

/// Whether a string contains glob metacharacters.
pub fn is_glob(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Expand a glob into the initial file set of a non-recursive run.
///
/// Returns matching paths in sorted order. Unreadable matches are logged
/// and dropped; a malformed pattern yields an empty set.
pub fn expand_glob(pattern: &str) -> Vec<PathBuf> {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            warn!("invalid glob '{}': {}", pattern, e);
            return Vec::new();
        }
    };

    let mut matched: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("cannot read '{}': {}", e.path().display(), e.error());
                None
            }
        })
        .collect();
    matched.sort();
    matched
}
