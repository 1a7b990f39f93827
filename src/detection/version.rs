//! Async version command execution with timeout.

use crate::{DetectionError, NodeCommand};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Run a client's version command and capture its output.
///
/// # Returns
///
/// `Ok(String)` with the version output (stdout preferred, stderr fallback),
/// or a `DetectionError` on failure:
/// - `Timeout` if the command takes longer than `limit`
/// - `PermissionDenied` if the executable cannot be run due to permissions
/// - `IoError` for other I/O failures or non-zero exit codes
/// - `VersionParseFailed` if output is not valid UTF-8
pub(crate) async fn check_version(
    command: &NodeCommand,
    limit: Duration,
) -> Result<String, DetectionError> {
    debug!(program = %command.program.display(), args = ?command.args, "Running version command");

    let output = timeout(
        limit,
        Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| DetectionError::Timeout)?
    .map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            DetectionError::PermissionDenied
        } else {
            DetectionError::IoError
        }
    })?;

    if !output.status.success() {
        debug!(status = ?output.status.code(), "Version command exited unsuccessfully");
        return Err(DetectionError::IoError);
    }

    // Some clients print their version to stderr
    let out = if !output.stdout.is_empty() {
        output.stdout
    } else {
        output.stderr
    };

    String::from_utf8(out).map_err(|_| DetectionError::VersionParseFailed)
}
