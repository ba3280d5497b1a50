//! Error types for aicat.
//!
//! Fatal conditions surface as `AicatError`. Problems with a single entry
//! during a walk (an unreadable file or subdirectory, a failing transform)
//! are logged and the entry is skipped; `TransformError` only ever reaches
//! the log.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the template store and template resolution.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{name}' not found in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("invalid template name '{0}'")]
    InvalidName(String),

    #[error("template '{name}' refers to another template '{file_type}'")]
    NestedReference { name: String, file_type: String },

    #[error("malformed template {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot access template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot determine home directory for the template store")]
    NoHomeDir,
}

/// Errors from running a transform command on one file.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("cannot run transform: {0}")]
    Spawn(#[source] io::Error),

    #[error("transform exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Errors that abort a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot access '{}': {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Top-level error for a run.
#[derive(Debug, Error)]
pub enum AicatError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),

    #[error("cannot encode template: {0}")]
    Json(#[from] serde_json::Error),
}

impl AicatError {
    /// Process exit code for this error.
    ///
    /// A closed stdout (e.g. piping into `head`) is not a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AicatError::Output(e) if e.kind() == io::ErrorKind::BrokenPipe => 0,
            _ => 1,
        }
    }
}

pub type Result<T, E = AicatError> = std::result::Result<T, E>;
