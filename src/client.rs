//! The blockchain client contract.
//!
//! [`BlockchainClient`] declares the capabilities every node client provides.
//! [`BaseClient`] is the shared core concrete clients embed: it owns the
//! descriptor and the resolved [`RuntimeConfig`].

use crate::detection::{check_support, parse_version, ParsedVersion, VersionSupport};
use crate::{ClientDescriptor, ClientError, ClientOptions, RuntimeConfig};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A program and its arguments.
///
/// # Example
///
/// ```rust
/// use blockchain_client::NodeCommand;
///
/// let cmd = NodeCommand::new("geth").arg("version");
/// assert_eq!(cmd.to_string(), "geth version");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCommand {
    /// The binary to execute.
    pub program: PathBuf,

    /// Arguments to pass to the binary.
    pub args: Vec<String>,
}

impl NodeCommand {
    /// A command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a flag followed by its value.
    pub(crate) fn flag(self, flag: &str, value: impl fmt::Display) -> Self {
        self.arg(flag).arg(value.to_string())
    }

    /// Whether `flag` is present in the arguments.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// The argument following `flag`, if any.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        let idx = self.args.iter().position(|a| a == flag)?;
        self.args.get(idx + 1).map(String::as_str)
    }
}

impl fmt::Display for NodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The capability contract of a node client.
///
/// Concrete clients implement the capability methods; the identity and
/// version methods are shared and read from [`base`](Self::base).
///
/// # Example
///
/// ```rust
/// use blockchain_client::{BlockchainClient, ClientOptions, GethClient};
///
/// let geth = GethClient::new(ClientOptions::default());
/// let version = geth.parse_version("Geth\nVersion: 1.9.7-stable");
/// assert!(geth.is_supported_version(&version).is_supported());
/// ```
pub trait BlockchainClient: Send + Sync {
    /// The shared client core.
    fn base(&self) -> &BaseClient;

    /// Inspect a chunk of node output and decide whether startup finished.
    ///
    /// Returns `Err(ClientError::StartupFailed)` when the chunk carries the
    /// client's fatal marker.
    fn is_ready(&self, output: &str) -> Result<bool, ClientError>;

    /// Whether the node needs periodic synthetic activity to avoid idling.
    fn needs_keep_alive(&self) -> Result<bool, ClientError>;

    /// The mining / coinbase account identifier.
    fn miner(&self) -> Result<String, ClientError>;

    /// The command that prints the client's version.
    fn version_command(&self) -> Result<NodeCommand, ClientError>;

    /// One-time chain initialization, run before the main command.
    ///
    /// Resolves exactly once, with success or failure.
    fn init_chain(&self) -> BoxFuture<'_, Result<(), ClientError>>;

    /// The command that launches the node bound to `address`.
    fn main_command(&self, address: &str) -> Result<NodeCommand, ClientError>;

    /// Client name (e.g. "geth").
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Client display name.
    fn pretty_name(&self) -> &str {
        self.base().pretty_name()
    }

    /// The declared support range.
    fn versions_supported(&self) -> &str {
        self.base().versions_supported()
    }

    /// The resolved runtime configuration.
    fn config(&self) -> &RuntimeConfig {
        self.base().config()
    }

    /// Path of the client binary.
    fn binary_path(&self) -> &Path {
        self.base().binary_path()
    }

    /// Extract the version from the version command's output.
    ///
    /// Returns [`ParsedVersion::UNKNOWN`] when no version is found.
    fn parse_version(&self, raw_output: &str) -> ParsedVersion {
        parse_version(raw_output)
    }

    /// Check a parsed version against [`versions_supported`](Self::versions_supported).
    fn is_supported_version(&self, version: &ParsedVersion) -> VersionSupport {
        check_support(version, self.versions_supported())
    }
}

/// Shared state of every client: descriptor, mode and resolved config.
///
/// `BaseClient` also implements [`BlockchainClient`] on its own as the bare
/// capability declaration: identity and version checks work, while every
/// capability returns [`ClientError::NotImplemented`] without side effects.
///
/// # Example
///
/// ```rust
/// use blockchain_client::{BaseClient, BlockchainClient, ClientError, ClientOptions};
///
/// let base = BaseClient::bare(ClientOptions::default());
/// assert!(matches!(base.is_ready("anything"), Err(ClientError::NotImplemented { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct BaseClient {
    descriptor: ClientDescriptor,
    config: RuntimeConfig,
    env: String,
    is_dev: bool,
    binary: PathBuf,
}

impl BaseClient {
    /// Descriptor of the bare contract, with no defaults to speak of.
    pub const BARE_DESCRIPTOR: ClientDescriptor = ClientDescriptor {
        name: "baseclient",
        pretty_name: "Base blockchain client",
        bin: "",
        versions_supported: ">=0.0.1",
        network_type: Some("custom"),
        network_id: None,
        target_gas_limit: None,
        rpc_api: &[],
        ws_api: &[],
        dev_ws_api: &[],
    };

    /// Build the core, backfilling `options.config` from `descriptor`.
    pub fn new(descriptor: ClientDescriptor, options: ClientOptions) -> Self {
        let is_dev = options.is_development();
        let config = options.config.resolve(&descriptor, is_dev);
        let binary = config
            .ethereum_client_bin
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(descriptor.bin));

        Self {
            descriptor,
            config,
            env: options.env,
            is_dev,
            binary,
        }
    }

    /// A bare contract with the base descriptor.
    pub fn bare(options: ClientOptions) -> Self {
        Self::new(Self::BARE_DESCRIPTOR, options)
    }

    /// The client's descriptor.
    pub fn descriptor(&self) -> &ClientDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name
    }

    pub fn pretty_name(&self) -> &str {
        self.descriptor.pretty_name
    }

    pub fn versions_supported(&self) -> &str {
        self.descriptor.versions_supported
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The environment name the client was built for.
    pub fn env(&self) -> &str {
        &self.env
    }

    /// Whether the client runs in development mode.
    pub fn is_dev(&self) -> bool {
        self.is_dev
    }

    /// The configured `ethereum_client_bin`, else the descriptor's `bin`.
    pub fn binary_path(&self) -> &Path {
        &self.binary
    }
}

impl BlockchainClient for BaseClient {
    fn base(&self) -> &BaseClient {
        self
    }

    fn is_ready(&self, _output: &str) -> Result<bool, ClientError> {
        Err(ClientError::not_implemented("is_ready", self.name()))
    }

    fn needs_keep_alive(&self) -> Result<bool, ClientError> {
        Err(ClientError::not_implemented("needs_keep_alive", self.name()))
    }

    fn miner(&self) -> Result<String, ClientError> {
        Err(ClientError::not_implemented("miner", self.name()))
    }

    fn version_command(&self) -> Result<NodeCommand, ClientError> {
        Err(ClientError::not_implemented("version_command", self.name()))
    }

    fn init_chain(&self) -> BoxFuture<'_, Result<(), ClientError>> {
        let error = ClientError::not_implemented("init_chain", self.name());
        Box::pin(futures::future::ready(Err(error)))
    }

    fn main_command(&self, _address: &str) -> Result<NodeCommand, ClientError> {
        Err(ClientError::not_implemented("main_command", self.name()))
    }
}
