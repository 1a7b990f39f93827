//! Client status types representing detection results.

use crate::ParsedVersion;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata for an installed client binary.
#[derive(Debug, Clone)]
pub struct InstalledMetadata {
    /// Path to the executable.
    pub path: PathBuf,

    /// Parsed version of the client.
    ///
    /// [`ParsedVersion::UNKNOWN`] when detection ran with `skip_version`.
    pub version: ParsedVersion,

    /// Raw output of the version command, if it was run.
    pub raw_version: Option<String>,

    /// When detection was last verified.
    pub last_verified: SystemTime,
}

/// Typed error variants for detection failures.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error types
/// in future versions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DetectionError {
    /// Timed out while running the version command.
    Timeout,

    /// Permission denied accessing the executable or its location.
    PermissionDenied,

    /// No version could be found in the version output.
    VersionParseFailed,

    /// I/O error during detection (e.g., failed to execute command).
    IoError,

    /// The version could not be checked against the support range.
    IndeterminateVersion,

    /// The client provides no version command.
    CommandUnavailable,
}

impl DetectionError {
    /// Human-readable description of the error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blockchain_client::DetectionError;
    ///
    /// let error = DetectionError::Timeout;
    /// assert_eq!(error.description(), "Detection timed out");
    /// ```
    pub fn description(&self) -> &'static str {
        match self {
            Self::Timeout => "Detection timed out",
            Self::PermissionDenied => "Permission denied",
            Self::VersionParseFailed => "Failed to parse version",
            Self::IoError => "I/O error during detection",
            Self::IndeterminateVersion => "Could not determine version support",
            Self::CommandUnavailable => "Client provides no version command",
        }
    }
}

/// Result of client detection.
///
/// - `Installed`: binary found and its version is supported
/// - `NotInstalled`: binary definitively not found
/// - `VersionMismatch`: binary found but its version is outside the range
/// - `Unknown`: detection failed with an error
///
/// # Example
///
/// ```rust
/// use blockchain_client::ClientStatus;
///
/// fn handle_status(status: ClientStatus) {
///     if status.is_usable() {
///         println!("Client ready at {:?}", status.path());
///     } else if status.is_installed() {
///         println!("Client found but version unsupported");
///     } else {
///         println!("Client not available");
///     }
/// }
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ClientStatus {
    /// Client is installed and usable.
    Installed(InstalledMetadata),

    /// Client is definitively not installed.
    NotInstalled,

    /// Client found but its version is unsupported.
    VersionMismatch {
        /// The version that was found.
        found: ParsedVersion,
        /// The declared support range.
        required: String,
        /// Path where the client was found.
        path: PathBuf,
    },

    /// Detection failed with an error.
    Unknown {
        /// Typed error variant for programmatic handling.
        error: DetectionError,
        /// Human-readable message for display.
        message: String,
    },
}

impl ClientStatus {
    /// Returns `true` only for `Installed`.
    ///
    /// ```rust
    /// use blockchain_client::ClientStatus;
    ///
    /// assert!(!ClientStatus::NotInstalled.is_usable());
    /// ```
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Installed(_))
    }

    /// Returns `true` for `Installed` and `VersionMismatch`.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed(_) | Self::VersionMismatch { .. })
    }

    /// The executable path, for `Installed` and `VersionMismatch`.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Installed(meta) => Some(&meta.path),
            Self::VersionMismatch { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The detected version, for `Installed` and `VersionMismatch`.
    pub fn version(&self) -> Option<&ParsedVersion> {
        match self {
            Self::Installed(meta) => Some(&meta.version),
            Self::VersionMismatch { found, .. } => Some(found),
            _ => None,
        }
    }
}
