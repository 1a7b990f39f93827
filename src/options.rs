//! Client construction and detection options.
//!
//! [`ClientOptions`] carries the caller's configuration and environment into
//! client construction. [`DetectOptions`] configures binary detection,
//! including the version-check timeout and whether to skip version parsing.

use crate::RuntimeConfig;
use std::time::Duration;

/// Environment name that implies development mode.
pub const DEVELOPMENT_ENV: &str = "development";

/// Options for constructing a client.
///
/// # Example
///
/// ```rust
/// use blockchain_client::ClientOptions;
///
/// let opts = ClientOptions::default();
/// assert_eq!(opts.env, "development");
/// assert!(opts.is_development());
///
/// let opts = ClientOptions {
///     env: "testnet".to_string(),
///     ..Default::default()
/// };
/// assert!(!opts.is_development());
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Caller-supplied configuration, before descriptor backfill.
    pub config: RuntimeConfig,

    /// Environment name (e.g. "development", "testnet").
    ///
    /// Default: "development"
    pub env: String,

    /// Force development mode regardless of `env`.
    ///
    /// Default: `false`
    pub is_dev: bool,
}

impl ClientOptions {
    /// Whether the client runs in development mode.
    pub fn is_development(&self) -> bool {
        self.is_dev || self.env == DEVELOPMENT_ENV
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            config: RuntimeConfig::default(),
            env: DEVELOPMENT_ENV.to_string(),
            is_dev: false,
        }
    }
}

/// Configuration options for client detection.
///
/// # Default Behavior
///
/// The default timeout is 5 seconds. Node binaries on slow disks or network
/// mounts may need more.
///
/// By default, version parsing is enabled (`skip_version: false`).
///
/// # Example
///
/// ```rust
/// use blockchain_client::DetectOptions;
/// use std::time::Duration;
///
/// let opts = DetectOptions {
///     timeout: Duration::from_secs(10),
///     ..Default::default()
/// };
/// assert!(!opts.skip_version);
/// ```
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Timeout for the version command.
    ///
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Skip running the version command.
    ///
    /// The resulting `InstalledMetadata` carries the `0.0.0` sentinel
    /// version and no raw output.
    ///
    /// Default: `false`
    pub skip_version: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            skip_version: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let opts = DetectOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert!(!opts.skip_version);
    }

    #[test]
    fn test_custom_timeout() {
        let opts = DetectOptions {
            timeout: Duration::from_millis(500),
            ..Default::default()
        };
        assert_eq!(opts.timeout, Duration::from_millis(500));
        assert!(!opts.skip_version);
    }

    #[test]
    fn test_default_env_is_development() {
        let opts = ClientOptions::default();
        assert_eq!(opts.env, DEVELOPMENT_ENV);
        assert!(opts.is_development());
    }

    #[test]
    fn test_is_dev_overrides_env() {
        let opts = ClientOptions {
            env: "production".to_string(),
            is_dev: true,
            ..Default::default()
        };
        assert!(opts.is_development());
    }

    #[test]
    fn test_non_development_env() {
        let opts = ClientOptions {
            env: "testnet".to_string(),
            ..Default::default()
        };
        assert!(!opts.is_development());
    }
}
