//! Per-run memo of compiled ignore files, keyed by rule-file path

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::rules::IgnoreRules;

/// Name of the per-directory ignore file.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Cache of compiled ignore files.
///
/// Each distinct rule-file path is read and compiled at most once for the
/// lifetime of the cache, and every lookup of that path returns the same
/// `Arc`. `None` is cached for directories without usable rules. Entries are
/// never invalidated; the tree is assumed not to change during a scan.
#[derive(Debug, Default)]
pub struct IgnoreCache {
    entries: RwLock<HashMap<PathBuf, Option<Arc<IgnoreRules>>>>,
    compilations: AtomicUsize,
}

impl IgnoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the rules defined by the ignore file in `dir`.
    pub fn rules_for_dir(&self, dir: &Path) -> Option<Arc<IgnoreRules>> {
        self.get_or_compile(&dir.join(IGNORE_FILE_NAME))
    }

    /// Return the compiled rules of `rule_file`, reading and compiling it on
    /// first request.
    ///
    /// A missing, unreadable or rule-less file yields `None`.
    pub fn get_or_compile(&self, rule_file: &Path) -> Option<Arc<IgnoreRules>> {
        let key = cache_key(rule_file);

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = entries.get(&key) {
                return cached.clone();
            }
        }

        // Compile under the write lock: one compilation per key.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = entries.get(&key) {
            return cached.clone();
        }

        let compiled = self.load(&key);
        entries.insert(key, compiled.clone());
        compiled
    }

    /// Number of rule files read and compiled so far.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::SeqCst)
    }

    /// Number of distinct rule-file paths looked up so far.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rules are anchored at the canonical directory, never at the walk path.
    fn load(&self, rule_file: &Path) -> Option<Arc<IgnoreRules>> {
        let contents = match std::fs::read_to_string(rule_file) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("cannot read {}: {}", rule_file.display(), e);
                return None;
            }
        };

        self.compilations.fetch_add(1, Ordering::SeqCst);
        let dir = rule_file.parent().unwrap_or_else(|| Path::new("."));
        let rules = IgnoreRules::compile(dir, &contents);
        debug!("compiled {} rules from {}", rules.len(), rule_file.display());

        if rules.is_empty() {
            None
        } else {
            Some(Arc::new(rules))
        }
    }
}

/// Canonical path when the file exists, otherwise the absolute path.
fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
