//! Gitignore-aware filtering for directory walks
//!
//! - `IgnoreRules`: one compiled `.gitignore`
//! - `IgnoreCache`: compile-once memo of rule files, keyed by path
//! - `FilterStack`: the rules active at the current depth of a walk

mod cache;
mod rules;
mod stack;

pub use cache::{IGNORE_FILE_NAME, IgnoreCache};
pub use rules::IgnoreRules;
pub use stack::{DirScope, FilterStack};
