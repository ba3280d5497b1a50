//! Named templates: persisted selection options usable as a file-type token

mod resolve;
mod store;

pub use resolve::{ExplicitSelection, REGULAR_FILE, SelectionCriteria};
pub use store::{StoredTemplate, TEMPLATE_DIR_ENV, TemplateSource, TemplateStore};
