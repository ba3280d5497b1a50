//! FileWalker - depth-first selection of files to concatenate

use std::fs::{self, DirEntry, FileType};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::WalkError;
use crate::ignore::{FilterStack, IGNORE_FILE_NAME, IgnoreCache};
use crate::pattern::NameFilter;

use super::config::WalkerConfig;

const GIT_DIR: &str = ".git";

/// Walks a directory tree and collects the files selected for output, in
/// traversal order.
///
/// Entries within a directory are visited sorted by name. Ignore rules are
/// looked up through the shared cache as each directory is entered and are
/// dropped again when it is left.
pub struct FileWalker<'c> {
    config: WalkerConfig,
    filter: NameFilter,
    cache: &'c IgnoreCache,
}

impl<'c> FileWalker<'c> {
    pub fn new(config: WalkerConfig, filter: NameFilter, cache: &'c IgnoreCache) -> Self {
        Self {
            config,
            filter,
            cache,
        }
    }

    /// Collect the selected files below `root`.
    ///
    /// Only a root that cannot be read, or that disappears during the walk,
    /// is an error; unreadable entries below it are logged and skipped. A root that is itself a file is selected
    /// if it passes the name filter.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, WalkError> {
        let root_error = |source: io::Error| WalkError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(root).map_err(root_error)?;
        let mut files = Vec::new();

        if !metadata.is_dir() {
            if metadata.is_file() && self.filter.accepts(root) {
                files.push(root.to_path_buf());
            }
            return Ok(files);
        }

        let entries = read_sorted(root).map_err(root_error)?;
        let mut stack = FilterStack::new();
        self.visit_dir(root, root, entries, &mut stack, &mut files)?;
        Ok(files)
    }

    /// Select from an explicit list of paths without descending.
    ///
    /// Used for glob-expanded inputs; ignore rules do not apply.
    pub fn select(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|path| match fs::metadata(path) {
                Ok(meta) => meta.is_file() && self.filter.accepts(path),
                Err(e) => {
                    warn!("cannot access '{}': {}", path.display(), e);
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Visit one directory's entries, recursing into subdirectories.
    ///
    /// A subdirectory that cannot be read is skipped, unless the reason is
    /// that `root` itself has disappeared.
    fn visit_dir(
        &self,
        root: &Path,
        dir: &Path,
        entries: Vec<DirEntry>,
        stack: &mut FilterStack,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), WalkError> {
        let rules = if self.config.respect_gitignore {
            self.cache.rules_for_dir(dir)
        } else {
            None
        };
        let mut scope = stack.enter(dir, rules);

        for entry in entries {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    warn!("cannot stat '{}': {}", path.display(), e);
                    continue;
                }
            };
            let is_dir = file_type.is_dir();

            if self.config.respect_gitignore {
                let control_file = if is_dir { GIT_DIR } else { IGNORE_FILE_NAME };
                if entry.file_name() == control_file {
                    continue;
                }
                if !scope.is_allowed(&path, is_dir) {
                    debug!("excluded by ignore rules: {}", path.display());
                    continue;
                }
            }

            if is_dir {
                match read_sorted(&path) {
                    Ok(children) => self.visit_dir(root, &path, children, &mut scope, files)?,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        if let Err(source) = fs::metadata(root) {
                            return Err(WalkError::RootUnreadable {
                                path: root.to_path_buf(),
                                source,
                            });
                        }
                        warn!("directory '{}' vanished: {}", path.display(), e);
                    }
                    Err(e) => warn!("cannot read directory '{}': {}", path.display(), e),
                }
            } else if self.is_selectable(&path, file_type) && self.filter.accepts(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    /// Whether an entry counts as a regular file.
    fn is_selectable(&self, path: &Path, file_type: FileType) -> bool {
        if file_type.is_file() {
            return true;
        }
        if !file_type.is_symlink() {
            debug!("skipping special file: {}", path.display());
            return false;
        }
        if !self.config.follow_file_symlinks {
            return false;
        }
        match fs::metadata(path) {
            Ok(meta) => meta.is_file(),
            Err(e) => {
                warn!("broken symlink '{}': {}", path.display(), e);
                false
            }
        }
    }
}

/// Read a directory's entries sorted by file name.
fn read_sorted(dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("cannot read entry in '{}': {}", dir.display(), err);
                None
            }
        })
        .collect();
    entries.sort_by_key(|a| a.file_name());
    Ok(entries)
}
