//! Writing selected files to the output stream
//!
//! Each file is emitted as a `--- FILE: <path> ---` header followed by its
//! contents (or the output of the transform command) and a blank line.

mod transform;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::template::SelectionCriteria;

pub use transform::{CONTENTS_PLACEHOLDER, PATH_PLACEHOLDER, render_command, run_transform};

/// What happened to one selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Header and content block written.
    Written,
    /// Header written; content not valid UTF-8 and binary output is off.
    SkippedBinary,
    /// Header written; the transform command failed.
    TransformFailed,
    /// Nothing written; the file could not be read.
    Unreadable,
}

/// Counts of outcomes for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Options for rendering file blocks.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Emit files whose contents are not valid UTF-8.
    pub binary: bool,
    /// Shell command run over each file; empty means none.
    pub transform: Option<String>,
}

impl From<&SelectionCriteria> for OutputConfig {
    fn from(criteria: &SelectionCriteria) -> Self {
        Self {
            binary: criteria.binary,
            transform: criteria.transform.clone(),
        }
    }
}

/// Writes file blocks to an output stream.
pub struct Concatenator<W: Write> {
    out: W,
    config: OutputConfig,
}

impl<W: Write> Concatenator<W> {
    pub fn new(out: W, config: OutputConfig) -> Self {
        Self { out, config }
    }

    /// Write every file in order.
    ///
    /// Only errors writing to the stream are returned.
    pub fn write_files(&mut self, files: &[PathBuf]) -> io::Result<OutputSummary> {
        let mut summary = OutputSummary::default();
        for file in files {
            match self.write_file(file)? {
                FileOutcome::Written => summary.written += 1,
                _ => summary.skipped += 1,
            }
        }
        self.out.flush()?;
        Ok(summary)
    }

    /// Write one file block.
    ///
    /// The transform runs before the header is written, so a header is
    /// always followed by either content or a logged skip notice.
    pub fn write_file(&mut self, path: &Path) -> io::Result<FileOutcome> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                warn!("cannot read '{}': {}, skipping", path.display(), e);
                return Ok(FileOutcome::Unreadable);
            }
        };

        if std::str::from_utf8(&bytes).is_err() && !self.config.binary {
            writeln!(self.out, "--- FILE: {} ---", path.display())?;
            warn!(
                "contents of '{}' not valid utf8, assumed binary, skipping",
                path.display()
            );
            return Ok(FileOutcome::SkippedBinary);
        }

        let block = match self.config.transform.as_deref().filter(|t| !t.is_empty()) {
            None => Ok(bytes),
            Some(command) => {
                let contents = String::from_utf8_lossy(&bytes);
                run_transform(command, path, &contents)
                    .map(String::into_bytes)
                    .map_err(|e| warn!("transform failed for '{}': {}", path.display(), e))
            }
        };

        writeln!(self.out, "--- FILE: {} ---", path.display())?;
        match block {
            Ok(content) => {
                self.out.write_all(&content)?;
                self.out.write_all(b"\n\n")?;
                Ok(FileOutcome::Written)
            }
            Err(()) => Ok(FileOutcome::TransformFailed),
        }
    }

    /// Consume the concatenator, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}
