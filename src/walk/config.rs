//! Configuration for file walks

use crate::template::SelectionCriteria;

/// Switches controlling traversal, separate from name patterns.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Honor `.gitignore` files found while walking. The `.gitignore` files
    /// themselves and `.git` directories are then not selected.
    pub respect_gitignore: bool,
    /// Include symlinks whose target is a regular file.
    pub(crate) follow_file_symlinks: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            follow_file_symlinks: true,
        }
    }
}

impl From<&SelectionCriteria> for WalkerConfig {
    fn from(criteria: &SelectionCriteria) -> Self {
        Self {
            respect_gitignore: criteria.respect_gitignore,
            ..Default::default()
        }
    }
}
