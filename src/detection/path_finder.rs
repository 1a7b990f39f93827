//! PATH-based executable lookup with fallback locations.

use std::path::{Path, PathBuf};

/// System fallback paths to check if executable not found in PATH.
const FALLBACK_PATHS: &[&str] = &["/usr/local/bin", "/usr/bin"];

/// Find a client binary.
///
/// A value containing a path separator (e.g. `/opt/geth/geth` or
/// `./bin/parity`) is taken as a path and returned if it exists. A bare name
/// is looked up in PATH via the `which` crate, then in common system and
/// home-directory locations.
///
/// # Returns
///
/// `Some(PathBuf)` if the executable is found, `None` otherwise. An empty
/// name never matches, and only regular files count.
pub(crate) fn find_executable(name: &Path) -> Option<PathBuf> {
    if name.as_os_str().is_empty() {
        return None;
    }

    if name.components().count() > 1 || name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }

    if let Ok(path) = which::which(name) {
        return Some(path);
    }

    for dir in FALLBACK_PATHS {
        let path = PathBuf::from(dir).join(name);
        if path.is_file() {
            return Some(path);
        }
    }

    // User-installed node binaries
    if let Ok(home) = std::env::var("HOME") {
        let home = PathBuf::from(home);
        for dir in [".local/bin", "bin"] {
            let path = home.join(dir).join(name);
            if path.is_file() {
                return Some(path);
            }
        }
    }

    None
}
