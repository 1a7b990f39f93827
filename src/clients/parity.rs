//! The Parity-Ethereum client.

use crate::detection::{parse_prefixed_version, parse_version, ParsedVersion};
use crate::{
    BaseClient, BlockchainClient, ClientDescriptor, ClientError, ClientOptions, NodeCommand,
};
use futures::future::BoxFuture;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn parity_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Parity(?:-Ethereum)?/v(\d+)\.(\d+)\.(\d+)").expect("Invalid regex pattern")
    })
}

/// The Parity-Ethereum (`parity`) client.
///
/// Parity takes its chain spec on the command line, so chain initialization
/// has nothing to do.
#[derive(Debug, Clone)]
pub struct ParityClient {
    base: BaseClient,
}

impl ParityClient {
    pub const DESCRIPTOR: ClientDescriptor = ClientDescriptor {
        name: "parity",
        pretty_name: "Parity-Ethereum",
        bin: "parity",
        versions_supported: ">=2.0.0",
        network_type: Some("dev"),
        network_id: Some(17),
        target_gas_limit: Some(8_000_000),
        rpc_api: &[
            "web3", "eth", "pubsub", "net", "parity", "private", "parity_pubsub", "traces", "rpc",
            "personal",
        ],
        ws_api: &[
            "web3", "eth", "pubsub", "net", "parity", "private", "parity_pubsub", "traces", "rpc",
            "shh", "shh_pubsub", "personal",
        ],
        dev_ws_api: &[
            "web3", "eth", "pubsub", "net", "parity", "private", "parity_pubsub", "traces", "rpc",
            "shh", "shh_pubsub", "personal",
        ],
    };

    const READY_MARKER: &'static str = "Public node URL:";
    const ERROR_PREFIX: &'static str = "Error";

    pub fn new(options: ClientOptions) -> Self {
        Self {
            base: BaseClient::new(Self::DESCRIPTOR, options),
        }
    }

    /// Parity's interface argument: "local" for loopback hosts.
    fn interface(host: &str) -> &str {
        match host {
            "localhost" | "127.0.0.1" => "local",
            "0.0.0.0" => "all",
            other => other,
        }
    }

    fn logging_level(verbosity: u8) -> &'static str {
        match verbosity {
            0 | 1 => "error",
            2 => "warn",
            3 => "info",
            4 => "debug",
            _ => "trace",
        }
    }
}

impl BlockchainClient for ParityClient {
    fn base(&self) -> &BaseClient {
        &self.base
    }

    fn is_ready(&self, output: &str) -> Result<bool, ClientError> {
        if let Some(line) = output
            .lines()
            .find(|l| l.trim_start().starts_with(Self::ERROR_PREFIX))
        {
            return Err(ClientError::StartupFailed {
                line: line.trim().to_string(),
                fix: "See the parity log for details".to_string(),
            });
        }
        Ok(output.contains(Self::READY_MARKER))
    }

    fn needs_keep_alive(&self) -> Result<bool, ClientError> {
        Ok(false)
    }

    fn miner(&self) -> Result<String, ClientError> {
        self.config()
            .account_address()
            .map(str::to_string)
            .ok_or_else(|| ClientError::missing_config("account"))
    }

    fn version_command(&self) -> Result<NodeCommand, ClientError> {
        Ok(NodeCommand::new(self.binary_path()).arg("--version"))
    }

    fn init_chain(&self) -> BoxFuture<'_, Result<(), ClientError>> {
        debug!("Parity needs no chain initialization");
        Box::pin(futures::future::ready(Ok(())))
    }

    fn main_command(&self, address: &str) -> Result<NodeCommand, ClientError> {
        let config = self.config();
        let mut cmd = NodeCommand::new(self.binary_path());

        // A custom network runs from the configured chain spec
        let chain = match (config.network_type.as_deref(), &config.genesis_block) {
            (Some("custom"), Some(genesis)) => genesis.display().to_string(),
            (Some("custom"), None) => {
                warn!("Custom network without a genesis block, using the dev chain");
                "dev".to_string()
            }
            (Some(network_type), _) => network_type.to_string(),
            (None, _) => "dev".to_string(),
        };
        cmd = cmd.flag("--chain", chain);

        if let Some(network_id) = config.network_id {
            cmd = cmd.flag("--network-id", network_id);
        }
        if let Some(datadir) = &config.datadir {
            cmd = cmd.flag("--base-path", datadir.display());
        }
        cmd = cmd.flag("--port", config.port);
        if config.nodiscover {
            cmd = cmd.arg("--no-discovery");
        }
        if let Some(maxpeers) = config.maxpeers {
            cmd = cmd.flag("--max-peers", maxpeers);
        }
        if let Some(bootnodes) = &config.bootnodes {
            cmd = cmd.flag("--bootnodes", bootnodes);
        }
        if let Some(verbosity) = config.verbosity {
            cmd = cmd.flag("--logging", Self::logging_level(verbosity));
        }
        if let Some(gas_limit) = config.target_gas_limit {
            cmd = cmd.flag("--gas-floor-target", gas_limit);
        }

        cmd = cmd
            .flag("--jsonrpc-interface", Self::interface(&config.rpc_host))
            .flag("--jsonrpc-port", config.rpc_port)
            .flag("--jsonrpc-apis", config.rpc_api().join(","));
        if let Some(cors) = &config.rpc_cors_domain {
            cmd = cmd.flag("--jsonrpc-cors", cors);
        }

        if config.ws_rpc {
            cmd = cmd
                .flag("--ws-interface", Self::interface(&config.ws_host))
                .flag("--ws-port", config.ws_port)
                .flag("--ws-apis", config.ws_api().join(","));
            if let Some(origins) = &config.ws_origins {
                cmd = cmd.flag("--ws-origins", origins);
            }
        } else {
            cmd = cmd.arg("--no-ws");
        }

        if config.whisper {
            cmd = cmd.arg("--whisper");
        }
        if config.mine_when_needed {
            cmd = cmd
                .flag("--reseal-on-txs", "all")
                .flag("--reseal-min-period", 0);
        }

        if !address.is_empty() {
            cmd = cmd.flag("--author", address).flag("--unlock", address);
            if let Some(password) = config.account_password() {
                cmd = cmd.flag("--password", password.display());
            }
        }

        debug!(%cmd, "Built parity main command");
        Ok(cmd)
    }

    /// Parity prints `Parity-Ethereum/vX.Y.Z`; other output falls back to
    /// the `Version:` form.
    fn parse_version(&self, raw_output: &str) -> ParsedVersion {
        let version = parse_prefixed_version(raw_output, parity_version_regex());
        if version.is_unknown() {
            parse_version(raw_output)
        } else {
            version
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeAccountSetting, RuntimeConfig, VersionSupport};
    use std::path::PathBuf;

    fn parity_with(config: RuntimeConfig) -> ParityClient {
        ParityClient::new(ClientOptions {
            config,
            ..Default::default()
        })
    }

    #[test]
    fn test_descriptor_defaults_applied() {
        let parity = ParityClient::new(ClientOptions::default());
        assert_eq!(parity.config().network_type.as_deref(), Some("dev"));
        assert_eq!(parity.config().network_id, Some(17));
        assert!(parity.config().ws_api().contains(&"shh".to_string()));
        assert!(!parity.config().rpc_api().contains(&"shh".to_string()));
    }

    #[test]
    fn test_is_ready() {
        let parity = ParityClient::new(ClientOptions::default());
        assert!(!parity.is_ready("2019-12-31 12:00:00  Starting Parity-Ethereum").unwrap());
        assert!(parity
            .is_ready("2019-12-31 12:00:01  Public node URL: enode://abc@127.0.0.1:30303")
            .unwrap());
        assert!(matches!(
            parity.is_ready("Error: Invalid node address format"),
            Err(ClientError::StartupFailed { .. })
        ));
    }

    #[test]
    fn test_never_needs_keep_alive() {
        let parity = parity_with(RuntimeConfig {
            mine_when_needed: true,
            ..Default::default()
        });
        assert!(!parity.needs_keep_alive().unwrap());
    }

    #[test]
    fn test_version_command_and_parse() {
        let parity = ParityClient::new(ClientOptions::default());
        assert_eq!(
            parity.version_command().unwrap().to_string(),
            "parity --version"
        );

        let output = "Parity Ethereum\n  version Parity-Ethereum/v2.5.13-stable-253ff3f-20191231/x86_64-linux-gnu/rustc1.40.0\nCopyright 2015-2019 Parity Technologies";
        let version = parity.parse_version(output);
        assert_eq!(version.to_string(), "2.5.13");
        assert_eq!(
            parity.is_supported_version(&version),
            VersionSupport::Supported
        );

        let old = parity.parse_version("version Parity/v1.11.11-stable");
        assert_eq!(parity.is_supported_version(&old), VersionSupport::Unsupported);
    }

    #[test]
    fn test_parse_version_fallback() {
        let parity = ParityClient::new(ClientOptions::default());
        assert_eq!(parity.parse_version("Version: 2.1.0").to_string(), "2.1.0");
        assert!(parity.parse_version("nothing").is_unknown());
    }

    #[tokio::test]
    async fn test_init_chain_noop() {
        let parity = ParityClient::new(ClientOptions::default());
        assert!(parity.init_chain().await.is_ok());
    }

    #[test]
    fn test_main_command_defaults() {
        let parity = ParityClient::new(ClientOptions::default());
        let cmd = parity.main_command("").unwrap();

        assert_eq!(cmd.value_of("--chain"), Some("dev"));
        assert_eq!(cmd.value_of("--network-id"), Some("17"));
        assert_eq!(cmd.value_of("--jsonrpc-interface"), Some("local"));
        assert_eq!(cmd.value_of("--jsonrpc-port"), Some("8545"));
        assert_eq!(cmd.value_of("--gas-floor-target"), Some("8000000"));
        assert!(cmd.has_arg("--no-ws"));
        assert!(!cmd.has_arg("--author"));
    }

    #[test]
    fn test_main_command_custom_without_genesis_uses_dev_chain() {
        let parity = parity_with(RuntimeConfig {
            network_type: Some("custom".to_string()),
            ..Default::default()
        });
        let cmd = parity.main_command("").unwrap();
        assert_eq!(cmd.value_of("--chain"), Some("dev"));
    }

    #[test]
    fn test_main_command_custom_chain() {
        let parity = parity_with(RuntimeConfig {
            network_type: Some("custom".to_string()),
            genesis_block: Some(PathBuf::from("/tmp/spec.json")),
            datadir: Some(PathBuf::from("/tmp/parity")),
            ws_rpc: true,
            ws_host: "0.0.0.0".to_string(),
            verbosity: Some(4),
            mine_when_needed: true,
            account: Some(NodeAccountSetting {
                password: Some(PathBuf::from("/tmp/parity/password")),
                ..Default::default()
            }),
            ..Default::default()
        });
        let cmd = parity.main_command("0xabc").unwrap();

        assert_eq!(cmd.value_of("--chain"), Some("/tmp/spec.json"));
        assert_eq!(cmd.value_of("--base-path"), Some("/tmp/parity"));
        assert_eq!(cmd.value_of("--ws-interface"), Some("all"));
        assert_eq!(cmd.value_of("--ws-port"), Some("8546"));
        assert!(!cmd.has_arg("--no-ws"));
        assert_eq!(cmd.value_of("--logging"), Some("debug"));
        assert_eq!(cmd.value_of("--reseal-min-period"), Some("0"));
        assert_eq!(cmd.value_of("--author"), Some("0xabc"));
        assert_eq!(cmd.value_of("--unlock"), Some("0xabc"));
        assert_eq!(cmd.value_of("--password"), Some("/tmp/parity/password"));
    }
}
