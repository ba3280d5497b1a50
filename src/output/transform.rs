//! Running a user-supplied shell command over file contents

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::TransformError;

/// Replaced by the file's path.
pub const PATH_PLACEHOLDER: &str = "_path_";
/// Replaced by the file's contents.
pub const CONTENTS_PLACEHOLDER: &str = "_contents_";

/// Substitute the placeholders into a transform command.
///
/// The path is substituted first, so a path containing `_contents_` is left
/// alone while file contents are never rescanned for `_path_`.
pub fn render_command(command: &str, path: &Path, contents: &str) -> String {
    let path = path.to_string_lossy();
    command
        .split(CONTENTS_PLACEHOLDER)
        .map(|part| part.replace(PATH_PLACEHOLDER, &path))
        .collect::<Vec<_>>()
        .join(contents)
}

/// Run `command` through `sh -c` and return its standard output.
///
/// The child is always waited for before returning.
pub fn run_transform(command: &str, path: &Path, contents: &str) -> Result<String, TransformError> {
    let rendered = render_command(command, path, contents);
    debug!("transform for {}: sh -c {:?}", path.display(), command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(&rendered)
        .output()
        .map_err(TransformError::Spawn)?;

    if !output.status.success() {
        return Err(TransformError::Failed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
