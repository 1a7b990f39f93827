//! Runtime configuration for blockchain clients.
//!
//! [`RuntimeConfig`] mirrors the blockchain section of a project's JSON
//! configuration (camelCase keys). Fields the caller leaves unset are
//! backfilled from the client's [`ClientDescriptor`] by
//! [`RuntimeConfig::resolve`].

use crate::descriptor::{to_owned_list, ClientDescriptor};
use crate::ClientError;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default RPC host.
pub const DEFAULT_RPC_HOST: &str = "localhost";
/// Default RPC port.
pub const DEFAULT_RPC_PORT: u16 = 8545;
/// Default WS host.
pub const DEFAULT_WS_HOST: &str = "localhost";
/// Default WS port.
pub const DEFAULT_WS_PORT: u16 = 8546;
/// Default p2p listening port.
pub const DEFAULT_P2P_PORT: u16 = 30303;

/// Account settings for the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeAccountSetting {
    /// Address to unlock and mine with.
    pub address: Option<String>,
    /// Number of development accounts to create.
    pub num_accounts: Option<u32>,
    /// Path to the password file used to unlock the account.
    pub password: Option<PathBuf>,
    /// Initial balance of created accounts.
    pub balance: Option<String>,
}

/// Blockchain runtime configuration.
///
/// Every field has a default so partial JSON documents deserialize. The
/// backfillable fields (`network_type`, `network_id`, `rpc_api`, `ws_api`,
/// `target_gas_limit`) are `Option` so "unset" stays distinguishable from
/// "explicitly empty" until [`resolve`](Self::resolve) runs.
///
/// # Example
///
/// ```rust
/// use blockchain_client::RuntimeConfig;
///
/// let config = RuntimeConfig::from_json_str(r#"{ "networkId": 1337, "mine": true }"#).unwrap();
/// assert_eq!(config.network_id, Some(1337));
/// assert!(config.mine);
/// assert_eq!(config.rpc_port, 8545);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// Suppress the node's output.
    pub silent: bool,
    /// Name of the client to use (e.g. "geth").
    pub client: Option<String>,
    /// Explicit path to the client binary.
    pub ethereum_client_bin: Option<PathBuf>,
    /// Network type (e.g. "custom", "dev", "testnet").
    pub network_type: Option<String>,
    /// Network id.
    pub network_id: Option<u64>,
    /// Genesis file used by chain initialization.
    ///
    /// `false` in JSON means no genesis file.
    #[serde(deserialize_with = "deserialize_genesis_block")]
    pub genesis_block: Option<PathBuf>,
    /// Data directory.
    pub datadir: Option<PathBuf>,
    /// Only mine when transactions are pending.
    pub mine_when_needed: bool,
    /// RPC listening host.
    pub rpc_host: String,
    /// RPC listening port.
    pub rpc_port: u16,
    /// Allowed CORS domains for RPC.
    pub rpc_cors_domain: Option<String>,
    /// RPC API namespaces.
    pub rpc_api: Option<Vec<String>>,
    /// p2p listening port.
    pub port: u16,
    /// Disable peer discovery.
    pub nodiscover: bool,
    /// Enable mining.
    pub mine: bool,
    /// Account settings.
    pub account: Option<NodeAccountSetting>,
    /// Enable the whisper protocol.
    pub whisper: bool,
    /// Maximum number of peers.
    pub maxpeers: Option<u32>,
    /// Comma-separated bootnode enode URLs.
    pub bootnodes: Option<String>,
    /// Enable the WS endpoint.
    #[serde(rename = "wsRPC")]
    pub ws_rpc: bool,
    /// WS listening host.
    pub ws_host: String,
    /// WS listening port.
    pub ws_port: u16,
    /// Allowed WS origins.
    ///
    /// `false` in JSON means none, `true` means any (`*`).
    #[serde(deserialize_with = "deserialize_ws_origins")]
    pub ws_origins: Option<String>,
    /// WS API namespaces.
    pub ws_api: Option<Vec<String>>,
    /// Record EVM debug information.
    pub vmdebug: bool,
    /// Target gas limit for mined blocks.
    pub target_gas_limit: Option<u64>,
    /// Sync mode (e.g. "full", "fast", "light").
    pub sync_mode: Option<String>,
    /// Log verbosity.
    pub verbosity: Option<u8>,
    /// Run behind the tooling's RPC proxy.
    pub proxy: bool,
}

/// A setting that is either a string or a boolean switch.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrBool {
    Bool(bool),
    String(String),
}

/// Any origin, used when `wsOrigins` is `true`.
pub const ANY_WS_ORIGIN: &str = "*";

fn deserialize_genesis_block<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrBool>::deserialize(deserializer)? {
        None | Some(StringOrBool::Bool(false)) => Ok(None),
        Some(StringOrBool::Bool(true)) => Err(serde::de::Error::custom(
            "genesisBlock must be a path to a genesis file or false",
        )),
        Some(StringOrBool::String(path)) => Ok(Some(PathBuf::from(path))),
    }
}

fn deserialize_ws_origins<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrBool>::deserialize(deserializer)? {
        None | Some(StringOrBool::Bool(false)) => None,
        Some(StringOrBool::Bool(true)) => Some(ANY_WS_ORIGIN.to_string()),
        Some(StringOrBool::String(origins)) => Some(origins),
    })
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            silent: false,
            client: None,
            ethereum_client_bin: None,
            network_type: None,
            network_id: None,
            genesis_block: None,
            datadir: None,
            mine_when_needed: false,
            rpc_host: DEFAULT_RPC_HOST.to_string(),
            rpc_port: DEFAULT_RPC_PORT,
            rpc_cors_domain: None,
            rpc_api: None,
            port: DEFAULT_P2P_PORT,
            nodiscover: false,
            mine: false,
            account: None,
            whisper: false,
            maxpeers: None,
            bootnodes: None,
            ws_rpc: false,
            ws_host: DEFAULT_WS_HOST.to_string(),
            ws_port: DEFAULT_WS_PORT,
            ws_origins: None,
            ws_api: None,
            vmdebug: false,
            target_gas_limit: None,
            sync_mode: None,
            verbosity: None,
            proxy: false,
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ClientError> {
        serde_json::from_str(json).map_err(|e| ClientError::ConfigParse {
            message: e.to_string(),
            fix: "Check the blockchain configuration for invalid JSON or mistyped values"
                .to_string(),
        })
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let json = std::fs::read_to_string(path).map_err(|e| ClientError::ConfigParse {
            message: format!("{}: {}", path.display(), e),
            fix: "Check that the configuration file exists and is readable".to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Backfill unset fields from the descriptor.
    ///
    /// Caller-supplied values always win. The WS API falls back to the
    /// descriptor's development set when `is_dev` is true. Network type,
    /// network id and target gas limit are only filled when the descriptor
    /// declares them.
    pub fn resolve(mut self, descriptor: &ClientDescriptor, is_dev: bool) -> Self {
        if let Some(network_type) = descriptor.network_type {
            self.network_type.get_or_insert_with(|| network_type.to_string());
        }
        if let Some(network_id) = descriptor.network_id {
            self.network_id.get_or_insert(network_id);
        }
        if let Some(gas_limit) = descriptor.target_gas_limit {
            self.target_gas_limit.get_or_insert(gas_limit);
        }
        self.rpc_api
            .get_or_insert_with(|| to_owned_list(descriptor.rpc_api));
        self.ws_api
            .get_or_insert_with(|| to_owned_list(descriptor.default_ws_api(is_dev)));

        debug!(
            client = descriptor.name,
            is_dev,
            network_type = ?self.network_type,
            network_id = ?self.network_id,
            "Resolved runtime configuration"
        );
        self
    }

    /// The configured account address, if any.
    pub fn account_address(&self) -> Option<&str> {
        self.account.as_ref()?.address.as_deref()
    }

    /// The configured password file, if any.
    pub fn account_password(&self) -> Option<&Path> {
        self.account.as_ref()?.password.as_deref()
    }

    /// RPC API namespaces, empty before resolution.
    pub fn rpc_api(&self) -> &[String] {
        self.rpc_api.as_deref().unwrap_or_default()
    }

    /// WS API namespaces, empty before resolution.
    pub fn ws_api(&self) -> &[String] {
        self.ws_api.as_deref().unwrap_or_default()
    }
}
