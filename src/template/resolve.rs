//! Merging command-line selection options with a stored template

use tracing::debug;

use crate::error::TemplateError;
use crate::pattern::NameFilter;

use super::store::{StoredTemplate, TemplateSource};

/// File-type token selecting plain regular files without a template.
pub const REGULAR_FILE: &str = "f";

/// Selection options exactly as supplied by the caller.
///
/// `None` means the option was not given, which lets a template fill it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitSelection {
    pub file_type: Option<String>,
    pub binary: Option<bool>,
    pub patterns: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub transform: Option<String>,
    pub gitignore: Option<bool>,
    pub verbose: bool,
}

impl ExplicitSelection {
    /// The template the `store` command persists for these options.
    pub fn to_template(&self) -> StoredTemplate {
        StoredTemplate {
            file_type: self.file_type.clone(),
            binary: self.binary,
            patterns: self.patterns.clone(),
            exclude: self.exclude.clone(),
            transform: self.transform.clone(),
            gitignore: self.gitignore,
        }
    }
}

/// Fully resolved options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub file_type: String,
    pub patterns: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub transform: Option<String>,
    pub respect_gitignore: bool,
    pub binary: bool,
    pub verbose: bool,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            file_type: REGULAR_FILE.to_string(),
            patterns: None,
            exclude: None,
            transform: None,
            respect_gitignore: true,
            binary: false,
            verbose: false,
        }
    }
}

impl SelectionCriteria {
    /// Resolve the caller's options, loading a template when the file-type
    /// token is not [`REGULAR_FILE`].
    ///
    /// Explicit options always win; a template only fills options the caller
    /// left unset, and built-in defaults fill the rest.
    pub fn resolve<S: TemplateSource + ?Sized>(
        explicit: &ExplicitSelection,
        source: &S,
    ) -> Result<Self, TemplateError> {
        let file_type = explicit
            .file_type
            .clone()
            .unwrap_or_else(|| REGULAR_FILE.to_string());

        let template = if file_type == REGULAR_FILE {
            StoredTemplate::default()
        } else {
            let template = source.load(&file_type)?;
            if let Some(nested) = &template.file_type {
                if nested != REGULAR_FILE {
                    return Err(TemplateError::NestedReference {
                        name: file_type,
                        file_type: nested.clone(),
                    });
                }
            }
            debug!("using template '{}': {:?}", file_type, template);
            template
        };

        let defaults = Self::default();
        Ok(Self {
            file_type,
            patterns: explicit.patterns.clone().or(template.patterns),
            exclude: explicit.exclude.clone().or(template.exclude),
            transform: explicit.transform.clone().or(template.transform),
            respect_gitignore: explicit
                .gitignore
                .or(template.gitignore)
                .unwrap_or(defaults.respect_gitignore),
            binary: explicit
                .binary
                .or(template.binary)
                .unwrap_or(defaults.binary),
            verbose: explicit.verbose,
        })
    }

    /// Base-name filter built from the include and exclude patterns.
    pub fn name_filter(&self) -> NameFilter {
        NameFilter::new(self.patterns.clone(), self.exclude.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemorySource(HashMap<String, StoredTemplate>);

    impl TemplateSource for MemorySource {
        fn load(&self, name: &str) -> Result<StoredTemplate, TemplateError> {
            self.0.get(name).cloned().ok_or(TemplateError::NotFound {
                name: name.to_string(),
                dir: "memory".into(),
            })
        }
    }

    fn strings(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    fn source() -> MemorySource {
        let mut templates = HashMap::new();
        templates.insert(
            "configs".to_string(),
            StoredTemplate {
                patterns: strings(&["*.json", "*.yaml"]),
                binary: Some(true),
                ..Default::default()
            },
        );
        templates.insert(
            "rust".to_string(),
            StoredTemplate {
                file_type: Some(REGULAR_FILE.to_string()),
                patterns: strings(&["*.rs"]),
                exclude: strings(&["build.rs"]),
                transform: Some("rustfmt --emit stdout _path_".to_string()),
                gitignore: Some(false),
                ..Default::default()
            },
        );
        templates.insert(
            "chained".to_string(),
            StoredTemplate {
                file_type: Some("rust".to_string()),
                ..Default::default()
            },
        );
        MemorySource(templates)
    }

    fn with_type(token: &str) -> ExplicitSelection {
        ExplicitSelection {
            file_type: Some(token.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_regular_file_uses_defaults_without_lookup() {
        let empty = MemorySource(HashMap::new());
        let criteria = SelectionCriteria::resolve(&ExplicitSelection::default(), &empty).unwrap();
        assert_eq!(criteria, SelectionCriteria::default());

        let criteria = SelectionCriteria::resolve(&with_type("f"), &empty).unwrap();
        assert_eq!(criteria, SelectionCriteria::default());
    }

    #[test]
    fn test_template_fills_unset_fields() {
        let criteria = SelectionCriteria::resolve(&with_type("rust"), &source()).unwrap();
        assert_eq!(criteria.file_type, "rust");
        assert_eq!(criteria.patterns, strings(&["*.rs"]));
        assert_eq!(criteria.exclude, strings(&["build.rs"]));
        assert_eq!(
            criteria.transform.as_deref(),
            Some("rustfmt --emit stdout _path_")
        );
        assert!(!criteria.respect_gitignore);
        assert!(!criteria.binary, "template omits binary, default applies");
    }

    #[test]
    fn test_explicit_patterns_win_over_template() {
        let explicit = ExplicitSelection {
            patterns: strings(&["*.toml"]),
            binary: Some(false),
            ..with_type("configs")
        };
        let criteria = SelectionCriteria::resolve(&explicit, &source()).unwrap();
        assert_eq!(criteria.patterns, strings(&["*.toml"]));
        assert!(!criteria.binary);
    }

    #[test]
    fn test_explicit_empty_transform_is_still_explicit() {
        let explicit = ExplicitSelection {
            transform: Some(String::new()),
            ..with_type("rust")
        };
        let criteria = SelectionCriteria::resolve(&explicit, &source()).unwrap();
        assert_eq!(criteria.transform.as_deref(), Some(""));
    }

    #[test]
    fn test_unset_in_both_keeps_defaults() {
        let criteria = SelectionCriteria::resolve(&with_type("configs"), &source()).unwrap();
        assert_eq!(criteria.patterns, strings(&["*.json", "*.yaml"]));
        assert_eq!(criteria.exclude, None);
        assert_eq!(criteria.transform, None);
        assert!(criteria.respect_gitignore);
        assert!(criteria.binary);
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let result = SelectionCriteria::resolve(&with_type("missing"), &source());
        assert!(matches!(result, Err(TemplateError::NotFound { name, .. }) if name == "missing"));
    }

    #[test]
    fn test_nested_template_reference_rejected() {
        let result = SelectionCriteria::resolve(&with_type("chained"), &source());
        assert!(matches!(result, Err(TemplateError::NestedReference { .. })));
    }

    #[test]
    fn test_to_template_keeps_only_explicit_fields() {
        let explicit = ExplicitSelection {
            patterns: strings(&["*.go"]),
            verbose: true,
            ..Default::default()
        };
        assert_eq!(
            explicit.to_template(),
            StoredTemplate {
                patterns: strings(&["*.go"]),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_name_filter_from_criteria() {
        let criteria = SelectionCriteria::resolve(&with_type("rust"), &source()).unwrap();
        let filter = criteria.name_filter();
        assert!(filter.accepts(std::path::Path::new("src/lib.rs")));
        assert!(!filter.accepts(std::path::Path::new("build.rs")));
    }
}
