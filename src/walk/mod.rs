//! Directory walking and file selection
//!
//! `FileWalker` drives a depth-first walk, consulting the ignore-rule
//! `FilterStack` and the name patterns at each entry. A root argument that
//! is a glob rather than an existing path selects from the expanded matches
//! without descending.

mod config;
mod walker;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::WalkError;
use crate::ignore::IgnoreCache;
use crate::pattern::{expand_glob, is_glob};
use crate::template::SelectionCriteria;

pub use config::WalkerConfig;
pub use walker::FileWalker;

/// Select the files for one run, in output order.
pub fn select_files(
    root: &str,
    criteria: &SelectionCriteria,
    cache: &IgnoreCache,
) -> Result<Vec<PathBuf>, WalkError> {
    let walker = FileWalker::new(WalkerConfig::from(criteria), criteria.name_filter(), cache);
    let root_path = Path::new(root);

    if !root_path.exists() && is_glob(root) {
        let expanded = expand_glob(root);
        debug!("'{}' expanded to {} paths", root, expanded.len());
        return Ok(walker.select(&expanded));
    }

    walker.walk(root_path)
}
