//! aicat - concatenate files from a directory tree, respecting .gitignore

pub mod error;
pub mod ignore;
pub mod output;
pub mod pattern;
pub mod template;
pub mod walk;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{AicatError, TemplateError, TransformError, WalkError};
pub use ignore::{FilterStack, IgnoreCache, IgnoreRules};
pub use output::{Concatenator, FileOutcome, OutputConfig, OutputSummary};
pub use pattern::{NameFilter, glob_match};
pub use template::{
    ExplicitSelection, REGULAR_FILE, SelectionCriteria, StoredTemplate, TemplateSource,
    TemplateStore,
};
pub use walk::{FileWalker, WalkerConfig, select_files};
