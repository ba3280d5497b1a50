//! JSON persistence of named templates

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TemplateError;

/// Environment variable overriding the template directory.
pub const TEMPLATE_DIR_ENV: &str = "AICAT_TEMPLATE_DIR";

const TEMPLATE_EXTENSION: &str = "json";

/// A named, persisted set of selection options.
///
/// Every field is optional; a field left out was not specified when the
/// template was stored and is omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore: Option<bool>,
}

/// Anything templates can be loaded from.
pub trait TemplateSource {
    fn load(&self, name: &str) -> Result<StoredTemplate, TemplateError>;
}

/// Directory of `<name>.json` template files.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The per-user store at `~/.aicat/templates`.
    pub fn default_location() -> Result<Self, TemplateError> {
        let home = dirs::home_dir().ok_or(TemplateError::NoHomeDir)?;
        Ok(Self::new(home.join(".aicat").join("templates")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing template `name`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, TemplateError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION)))
    }

    /// Write a template, replacing any existing one with the same name.
    pub fn store(&self, name: &str, template: &StoredTemplate) -> Result<PathBuf, TemplateError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir).map_err(|source| TemplateError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let data = serde_json::to_string_pretty(template).map_err(|source| {
            TemplateError::Malformed {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, data).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("stored template '{}' at {}", name, path.display());
        Ok(path)
    }

    /// Remove a template. Fails with `NotFound` if it does not exist.
    pub fn delete(&self, name: &str) -> Result<(), TemplateError> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).map_err(|source| self.io_error(name, path, source))
    }

    /// All readable templates, sorted by name.
    ///
    /// Malformed template files are logged and left out.
    pub fn list(&self) -> Result<Vec<(String, StoredTemplate)>, TemplateError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(TemplateError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let path = e.path();
                if path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
                    path.file_stem().map(|s| s.to_string_lossy().to_string())
                } else {
                    None
                }
            })
            .collect();
        names.sort();

        let mut templates = Vec::with_capacity(names.len());
        for name in names {
            match self.load(&name) {
                Ok(template) => templates.push((name, template)),
                Err(e) => warn!("skipping template '{}': {}", name, e),
            }
        }
        Ok(templates)
    }

    fn io_error(&self, name: &str, path: PathBuf, source: io::Error) -> TemplateError {
        if source.kind() == io::ErrorKind::NotFound {
            TemplateError::NotFound {
                name: name.to_string(),
                dir: self.dir.clone(),
            }
        } else {
            TemplateError::Io { path, source }
        }
    }
}

impl TemplateSource for TemplateStore {
    fn load(&self, name: &str) -> Result<StoredTemplate, TemplateError> {
        let path = self.path_for(name)?;
        let data = fs::read_to_string(&path).map_err(|e| self.io_error(name, path.clone(), e))?;
        serde_json::from_str(&data).map_err(|source| TemplateError::Malformed { path, source })
    }
}

fn validate_name(name: &str) -> Result<(), TemplateError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        Err(TemplateError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
