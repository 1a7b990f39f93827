//! Static client descriptors.

use serde::Serialize;

/// Static identity and defaults of a node-client implementation.
///
/// A descriptor is owned by the concrete client and never mutated. The
/// runtime configuration is backfilled from it once, when the client is
/// constructed (see [`RuntimeConfig::resolve`](crate::RuntimeConfig::resolve)).
///
/// # Example
///
/// ```rust
/// use blockchain_client::ClientDescriptor;
///
/// const DEV_NODE: ClientDescriptor = ClientDescriptor {
///     name: "devnode",
///     pretty_name: "Dev Node",
///     bin: "devnode",
///     versions_supported: ">=1.0.0",
///     network_type: None,
///     network_id: None,
///     target_gas_limit: None,
///     rpc_api: &["eth", "web3"],
///     ws_api: &["eth", "web3"],
///     dev_ws_api: &["eth", "web3", "debug"],
/// };
///
/// assert_eq!(DEV_NODE.dev_ws_api.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientDescriptor {
    /// Client name, used in logs and for kind checks (e.g. "geth").
    pub name: &'static str,

    /// Display name (e.g. "Go-Ethereum").
    pub pretty_name: &'static str,

    /// Default binary, used when the configuration names none.
    pub bin: &'static str,

    /// Supported version range in node-style range syntax (e.g. ">=1.9.7").
    pub versions_supported: &'static str,

    /// Default network type, if the client has one.
    pub network_type: Option<&'static str>,

    /// Default network id, if the client has one.
    pub network_id: Option<u64>,

    /// Default target gas limit, if the client has one.
    pub target_gas_limit: Option<u64>,

    /// RPC API namespaces enabled by default.
    pub rpc_api: &'static [&'static str],

    /// WS API namespaces enabled outside development mode.
    pub ws_api: &'static [&'static str],

    /// WS API namespaces enabled in development mode.
    pub dev_ws_api: &'static [&'static str],
}

impl ClientDescriptor {
    /// The WS API set for the given mode.
    pub fn default_ws_api(&self, is_dev: bool) -> &'static [&'static str] {
        if is_dev {
            self.dev_ws_api
        } else {
            self.ws_api
        }
    }
}

/// Converts a static namespace list into owned strings.
pub(crate) fn to_owned_list(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
