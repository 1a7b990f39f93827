//! Error types for client capabilities.
//!
//! Each variant carries an actionable fix suggestion, available through
//! [`ClientError::fix_suggestion`].

use std::time::Duration;
use thiserror::Error;

/// Errors raised by [`BlockchainClient`](crate::BlockchainClient) capabilities.
///
/// Version parsing and support checks never produce these: they degrade to
/// the `0.0.0` sentinel and [`VersionSupport::Indeterminate`](crate::VersionSupport)
/// instead.
///
/// # Example
///
/// ```rust
/// use blockchain_client::ClientError;
///
/// fn report(error: ClientError) {
///     eprintln!("Client error: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// A capability was invoked on a client that does not implement it.
    #[error("{capability} has not been implemented by {client}")]
    NotImplemented {
        /// The capability that was invoked (e.g. "is_ready").
        capability: &'static str,
        /// Name of the client it was invoked on.
        client: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A capability needs a configuration value that is not set.
    #[error("Missing configuration value: {field}")]
    MissingConfig {
        /// The configuration key (e.g. "account").
        field: &'static str,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The node reported a fatal error while starting.
    #[error("Node failed to start: {line}")]
    StartupFailed {
        /// The output line carrying the fatal marker.
        line: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Chain initialization returned an error.
    #[error("Chain initialization failed: {message}")]
    InitChainFailed {
        /// Description of the failure.
        message: String,
        /// Standard error from the init command, if available.
        stderr: Option<String>,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A client command did not finish in time.
    #[error("Client command timed out after {duration:?}")]
    Timeout {
        /// How long the command was allowed to run.
        duration: Duration,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The client binary could not be executed.
    #[error("Failed to run client binary: {message}")]
    Io {
        /// Description of the I/O failure.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The configuration names a client this crate does not provide.
    #[error("Unknown blockchain client: {name}")]
    UnknownClient {
        /// The configured client name.
        name: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The runtime configuration could not be parsed.
    #[error("Invalid client configuration: {message}")]
    ConfigParse {
        /// Description of the parse failure.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl ClientError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blockchain_client::ClientError;
    ///
    /// let error = ClientError::MissingConfig {
    ///     field: "datadir",
    ///     fix: "Set datadir in the blockchain configuration".to_string(),
    /// };
    /// assert!(error.fix_suggestion().contains("datadir"));
    /// ```
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::NotImplemented { fix, .. } => fix,
            Self::MissingConfig { fix, .. } => fix,
            Self::StartupFailed { fix, .. } => fix,
            Self::InitChainFailed { fix, .. } => fix,
            Self::Timeout { fix, .. } => fix,
            Self::Io { fix, .. } => fix,
            Self::UnknownClient { fix, .. } => fix,
            Self::ConfigParse { fix, .. } => fix,
        }
    }

    pub(crate) fn not_implemented(capability: &'static str, client: &str) -> Self {
        Self::NotImplemented {
            capability,
            client: client.to_string(),
            fix: format!(
                "Use a concrete client (geth, parity) instead of the bare {} contract",
                client
            ),
        }
    }

    pub(crate) fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig {
            field,
            fix: format!("Set {} in the blockchain configuration", field),
        }
    }

    pub(crate) fn io(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
            fix: "Check that the client binary exists and is executable".to_string(),
        }
    }
}
