//! Compiling the text of one `.gitignore` file into a matcher

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::warn;

/// Compiled rules from a single ignore file.
///
/// Paths are interpreted relative to the directory the rules were defined
/// in. Immutable after compilation, so safe to share across threads.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    /// Compile the contents of an ignore file rooted at `dir`.
    ///
    /// Lines that fail to parse are logged and skipped; the remaining rules
    /// still apply.
    pub fn compile(dir: &Path, contents: &str) -> Self {
        let mut builder = GitignoreBuilder::new(dir);
        for line in contents.lines() {
            if let Err(e) = builder.add_line(None, line) {
                warn!("skipping ignore rule '{}' in {}: {}", line, dir.display(), e);
            }
        }

        let matcher = match builder.build() {
            Ok(gi) => gi,
            Err(e) => {
                warn!("failed to build ignore rules for {}: {}", dir.display(), e);
                Gitignore::empty()
            }
        };

        Self { matcher }
    }

    /// Check whether `relative` (relative to the defining directory) is excluded.
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        self.matcher.matched(relative, is_dir).is_ignore()
    }

    /// Number of rules compiled, including negations.
    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(contents: &str) -> IgnoreRules {
        IgnoreRules::compile(Path::new("/repo"), contents)
    }

    #[test]
    fn test_simple_glob() {
        let r = rules("*.log\n");
        assert!(r.is_excluded(Path::new("debug.log"), false));
        assert!(r.is_excluded(Path::new("nested/debug.log"), false));
        assert!(!r.is_excluded(Path::new("main.rs"), false));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let r = rules("# build output\n\n*.o\n");
        assert_eq!(r.len(), 1);
        assert!(r.is_excluded(Path::new("main.o"), false));
        assert!(!r.is_excluded(Path::new("# build output"), false));
    }

    #[test]
    fn test_negation_within_one_file() {
        let r = rules("*.log\n!keep.log\n");
        assert!(r.is_excluded(Path::new("debug.log"), false));
        assert!(!r.is_excluded(Path::new("keep.log"), false));
    }

    #[test]
    fn test_directory_only_rule() {
        let r = rules("build/\n");
        assert!(r.is_excluded(Path::new("build"), true));
        assert!(!r.is_excluded(Path::new("build"), false));
    }

    #[test]
    fn test_anchored_rule() {
        let r = rules("/target\n");
        assert!(r.is_excluded(Path::new("target"), true));
        assert!(!r.is_excluded(Path::new("sub/target"), true));
    }

    #[test]
    fn test_globstar() {
        let r = rules("docs/**/*.tmp\n");
        assert!(r.is_excluded(Path::new("docs/a/b/c.tmp"), false));
        assert!(!r.is_excluded(Path::new("src/c.tmp"), false));
    }

    #[test]
    fn test_empty_rules_exclude_nothing() {
        let r = rules("");
        assert!(r.is_empty());
        assert!(!r.is_excluded(Path::new("anything"), false));
    }
}
