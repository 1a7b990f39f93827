//! The go-ethereum client.

use crate::{
    BaseClient, BlockchainClient, ClientDescriptor, ClientError, ClientOptions, NodeCommand,
};
use futures::future::BoxFuture;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, info_span, Instrument};

/// The go-ethereum (`geth`) client.
///
/// Builds `geth` command lines from the runtime configuration and reads its
/// startup log. Chain initialization runs `geth init` when a genesis file is
/// configured.
#[derive(Debug, Clone)]
pub struct GethClient {
    base: BaseClient,
}

impl GethClient {
    pub const DESCRIPTOR: ClientDescriptor = ClientDescriptor {
        name: "geth",
        pretty_name: "Go-Ethereum",
        bin: "geth",
        versions_supported: ">=1.9.7",
        network_type: Some("custom"),
        network_id: Some(1337),
        target_gas_limit: Some(8_000_000),
        rpc_api: &["eth", "web3", "net", "debug", "personal"],
        ws_api: &["eth", "web3", "net", "shh", "debug", "pubsub", "personal"],
        dev_ws_api: &["eth", "web3", "net", "shh", "debug", "pubsub", "personal"],
    };

    const READY_MARKERS: &'static [&'static str] = &["IPC endpoint opened", "HTTP server started"];
    const ERROR_MARKER: &'static str = "Fatal:";

    const INIT_CHAIN_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(options: ClientOptions) -> Self {
        Self {
            base: BaseClient::new(Self::DESCRIPTOR, options),
        }
    }

    /// The `geth init` command importing `genesis` into `datadir`.
    pub fn init_command(&self, genesis: &Path, datadir: &Path) -> NodeCommand {
        NodeCommand::new(self.binary_path())
            .flag("--datadir", datadir.display())
            .arg("init")
            .arg(genesis.display().to_string())
    }

    async fn run_init_chain(&self) -> Result<(), ClientError> {
        let config = self.config();
        let Some(genesis) = config.genesis_block.as_deref() else {
            debug!("No genesis file configured, skipping geth init");
            return Ok(());
        };
        let datadir = config
            .datadir
            .as_deref()
            .ok_or_else(|| ClientError::missing_config("datadir"))?;

        let command = self.init_command(genesis, datadir);
        debug!(%command, "Initializing chain");

        let output = timeout(
            Self::INIT_CHAIN_TIMEOUT,
            Command::new(&command.program)
                .args(&command.args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ClientError::Timeout {
            duration: Self::INIT_CHAIN_TIMEOUT,
            fix: "Check that the genesis file is valid and the data directory is writable"
                .to_string(),
        })?
        .map_err(ClientError::io)?;

        if !output.status.success() {
            return Err(ClientError::InitChainFailed {
                message: format!("geth init exited with code {:?}", output.status.code()),
                stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
                fix: format!(
                    "Check the genesis file {} and remove stale data in {}",
                    genesis.display(),
                    datadir.display()
                ),
            });
        }

        info!(datadir = %datadir.display(), "Chain initialized");
        Ok(())
    }
}

impl BlockchainClient for GethClient {
    fn base(&self) -> &BaseClient {
        &self.base
    }

    fn is_ready(&self, output: &str) -> Result<bool, ClientError> {
        if let Some(line) = output.lines().find(|l| l.contains(Self::ERROR_MARKER)) {
            return Err(ClientError::StartupFailed {
                line: line.trim().to_string(),
                fix: "See the geth log for details; a locked or corrupt data directory is the usual cause"
                    .to_string(),
            });
        }
        Ok(Self::READY_MARKERS.iter().any(|m| output.contains(m)))
    }

    /// Development nodes that only mine on demand go idle and need pokes.
    fn needs_keep_alive(&self) -> Result<bool, ClientError> {
        Ok(self.base.is_dev() && self.config().mine_when_needed)
    }

    fn miner(&self) -> Result<String, ClientError> {
        self.config()
            .account_address()
            .map(str::to_string)
            .ok_or_else(|| ClientError::missing_config("account"))
    }

    fn version_command(&self) -> Result<NodeCommand, ClientError> {
        Ok(NodeCommand::new(self.binary_path()).arg("version"))
    }

    fn init_chain(&self) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(
            self.run_init_chain()
                .instrument(info_span!("geth_init_chain", client = self.name())),
        )
    }

    fn main_command(&self, address: &str) -> Result<NodeCommand, ClientError> {
        let config = self.config();
        let mut cmd = NodeCommand::new(self.binary_path());

        if config.network_type.as_deref() == Some("dev") {
            cmd = cmd.arg("--dev");
        }
        if let Some(network_id) = config.network_id {
            cmd = cmd.flag("--networkid", network_id);
        }
        if let Some(datadir) = &config.datadir {
            cmd = cmd.flag("--datadir", datadir.display());
        }
        cmd = cmd.flag("--port", config.port);
        if config.nodiscover {
            cmd = cmd.arg("--nodiscover");
        }
        if let Some(maxpeers) = config.maxpeers {
            cmd = cmd.flag("--maxpeers", maxpeers);
        }
        if let Some(bootnodes) = &config.bootnodes {
            cmd = cmd.flag("--bootnodes", bootnodes);
        }
        if let Some(verbosity) = config.verbosity {
            cmd = cmd.flag("--verbosity", verbosity);
        }
        if let Some(sync_mode) = &config.sync_mode {
            cmd = cmd.flag("--syncmode", sync_mode);
        }
        if let Some(gas_limit) = config.target_gas_limit {
            cmd = cmd.flag("--miner.gastarget", gas_limit);
        }

        cmd = cmd
            .arg("--http")
            .flag("--http.addr", &config.rpc_host)
            .flag("--http.port", config.rpc_port)
            .flag("--http.api", config.rpc_api().join(","));
        if let Some(cors) = &config.rpc_cors_domain {
            cmd = cmd.flag("--http.corsdomain", cors);
        }

        if config.ws_rpc {
            cmd = cmd
                .arg("--ws")
                .flag("--ws.addr", &config.ws_host)
                .flag("--ws.port", config.ws_port)
                .flag("--ws.api", config.ws_api().join(","));
            if let Some(origins) = &config.ws_origins {
                cmd = cmd.flag("--ws.origins", origins);
            }
        }

        if config.whisper {
            cmd = cmd.arg("--shh");
        }
        if config.vmdebug {
            cmd = cmd.arg("--vmdebug");
        }

        if !address.is_empty() {
            cmd = cmd
                .flag("--unlock", address)
                .arg("--allow-insecure-unlock");
            if let Some(password) = config.account_password() {
                cmd = cmd.flag("--password", password.display());
            }
        }
        if config.mine {
            cmd = cmd.arg("--mine");
            if !address.is_empty() {
                cmd = cmd.flag("--miner.etherbase", address);
            }
        }

        debug!(%cmd, "Built geth main command");
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeAccountSetting, RuntimeConfig, VersionSupport};
    use std::path::PathBuf;

    fn geth_with(config: RuntimeConfig) -> GethClient {
        GethClient::new(ClientOptions {
            config,
            ..Default::default()
        })
    }

    #[test]
    fn test_descriptor_defaults_applied() {
        let geth = GethClient::new(ClientOptions::default());
        let config = geth.config();
        assert_eq!(config.network_type.as_deref(), Some("custom"));
        assert_eq!(config.network_id, Some(1337));
        assert_eq!(config.target_gas_limit, Some(8_000_000));
        assert_eq!(config.rpc_api().len(), 5);
        assert!(config.ws_api().contains(&"pubsub".to_string()));
        assert_eq!(geth.binary_path(), Path::new("geth"));
    }

    #[test]
    fn test_is_ready_markers() {
        let geth = GethClient::new(ClientOptions::default());
        assert!(!geth.is_ready("INFO Starting peer-to-peer node").unwrap());
        assert!(geth
            .is_ready("INFO IPC endpoint opened url=/tmp/geth.ipc")
            .unwrap());
        assert!(geth
            .is_ready("INFO HTTP server started endpoint=127.0.0.1:8545")
            .unwrap());
    }

    #[test]
    fn test_is_ready_fatal() {
        let geth = GethClient::new(ClientOptions::default());
        let result = geth.is_ready("INFO Starting\nFatal: Error starting protocol stack\n");
        match result {
            Err(ClientError::StartupFailed { line, .. }) => {
                assert_eq!(line, "Fatal: Error starting protocol stack")
            }
            other => panic!("expected StartupFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_needs_keep_alive() {
        let geth = geth_with(RuntimeConfig {
            mine_when_needed: true,
            ..Default::default()
        });
        assert!(geth.needs_keep_alive().unwrap());

        let geth = GethClient::new(ClientOptions {
            config: RuntimeConfig {
                mine_when_needed: true,
                ..Default::default()
            },
            env: "testnet".to_string(),
            is_dev: false,
        });
        assert!(!geth.needs_keep_alive().unwrap());

        assert!(!GethClient::new(ClientOptions::default())
            .needs_keep_alive()
            .unwrap());
    }

    #[test]
    fn test_miner() {
        let geth = GethClient::new(ClientOptions::default());
        assert!(matches!(
            geth.miner(),
            Err(ClientError::MissingConfig { field: "account", .. })
        ));

        let geth = geth_with(RuntimeConfig {
            account: Some(NodeAccountSetting {
                address: Some("0xdeadbeef".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(geth.miner().unwrap(), "0xdeadbeef");
    }

    #[test]
    fn test_version_command() {
        let geth = geth_with(RuntimeConfig {
            ethereum_client_bin: Some(PathBuf::from("/opt/geth/geth")),
            ..Default::default()
        });
        assert_eq!(
            geth.version_command().unwrap().to_string(),
            "/opt/geth/geth version"
        );
    }

    #[test]
    fn test_version_support() {
        let geth = GethClient::new(ClientOptions::default());
        let output = "Geth\nVersion: 1.9.7-stable\nArchitecture: amd64\nGo Version: go1.13.4";
        let version = geth.parse_version(output);
        assert_eq!(version.to_string(), "1.9.7");
        assert_eq!(geth.is_supported_version(&version), VersionSupport::Supported);

        let old = geth.parse_version("Version: 1.8.27-stable");
        assert_eq!(geth.is_supported_version(&old), VersionSupport::Unsupported);
    }

    #[test]
    fn test_main_command_defaults() {
        let geth = GethClient::new(ClientOptions::default());
        let cmd = geth.main_command("").unwrap();

        assert_eq!(cmd.program, PathBuf::from("geth"));
        assert_eq!(cmd.value_of("--networkid"), Some("1337"));
        assert_eq!(cmd.value_of("--port"), Some("30303"));
        assert_eq!(cmd.value_of("--http.addr"), Some("localhost"));
        assert_eq!(cmd.value_of("--http.port"), Some("8545"));
        assert_eq!(
            cmd.value_of("--http.api"),
            Some("eth,web3,net,debug,personal")
        );
        assert_eq!(cmd.value_of("--miner.gastarget"), Some("8000000"));
        assert!(!cmd.has_arg("--dev"));
        assert!(!cmd.has_arg("--ws"));
        assert!(!cmd.has_arg("--unlock"));
        assert!(!cmd.has_arg("--mine"));
    }

    #[test]
    fn test_main_command_full_config() {
        let geth = geth_with(RuntimeConfig {
            network_type: Some("dev".to_string()),
            datadir: Some(PathBuf::from("/tmp/chain")),
            nodiscover: true,
            maxpeers: Some(0),
            ws_rpc: true,
            ws_origins: Some("http://localhost:8000".to_string()),
            ws_api: Some(vec!["eth".to_string(), "pubsub".to_string()]),
            rpc_cors_domain: Some("*".to_string()),
            mine: true,
            sync_mode: Some("full".to_string()),
            verbosity: Some(3),
            vmdebug: true,
            account: Some(NodeAccountSetting {
                password: Some(PathBuf::from("/tmp/chain/password")),
                ..Default::default()
            }),
            ..Default::default()
        });
        let cmd = geth.main_command("0xabc").unwrap();

        assert!(cmd.has_arg("--dev"));
        assert_eq!(cmd.value_of("--datadir"), Some("/tmp/chain"));
        assert!(cmd.has_arg("--nodiscover"));
        assert_eq!(cmd.value_of("--maxpeers"), Some("0"));
        assert_eq!(cmd.value_of("--ws.port"), Some("8546"));
        assert_eq!(cmd.value_of("--ws.api"), Some("eth,pubsub"));
        assert_eq!(cmd.value_of("--ws.origins"), Some("http://localhost:8000"));
        assert_eq!(cmd.value_of("--http.corsdomain"), Some("*"));
        assert_eq!(cmd.value_of("--syncmode"), Some("full"));
        assert_eq!(cmd.value_of("--verbosity"), Some("3"));
        assert!(cmd.has_arg("--vmdebug"));
        assert_eq!(cmd.value_of("--unlock"), Some("0xabc"));
        assert!(cmd.has_arg("--allow-insecure-unlock"));
        assert_eq!(cmd.value_of("--password"), Some("/tmp/chain/password"));
        assert!(cmd.has_arg("--mine"));
        assert_eq!(cmd.value_of("--miner.etherbase"), Some("0xabc"));
    }

    #[test]
    fn test_init_command() {
        let geth = GethClient::new(ClientOptions::default());
        let cmd = geth.init_command(Path::new("/tmp/genesis.json"), Path::new("/tmp/chain"));
        assert_eq!(
            cmd.to_string(),
            "geth --datadir /tmp/chain init /tmp/genesis.json"
        );
    }

    #[tokio::test]
    async fn test_init_chain_without_genesis_is_noop() {
        let geth = GethClient::new(ClientOptions::default());
        assert!(geth.init_chain().await.is_ok());
    }

    #[tokio::test]
    async fn test_init_chain_requires_datadir() {
        let geth = geth_with(RuntimeConfig {
            genesis_block: Some(PathBuf::from("/tmp/genesis.json")),
            ..Default::default()
        });
        assert!(matches!(
            geth.init_chain().await,
            Err(ClientError::MissingConfig { field: "datadir", .. })
        ));
    }

    #[tokio::test]
    async fn test_init_chain_missing_binary() {
        let geth = geth_with(RuntimeConfig {
            ethereum_client_bin: Some(PathBuf::from("/nonexistent/path/to/geth")),
            genesis_block: Some(PathBuf::from("/tmp/genesis.json")),
            datadir: Some(PathBuf::from("/tmp/chain")),
            ..Default::default()
        });
        assert!(matches!(
            geth.init_chain().await,
            Err(ClientError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_init_chain_failure_exit() {
        // `false` ignores its arguments and exits 1
        let geth = geth_with(RuntimeConfig {
            ethereum_client_bin: Some(PathBuf::from("false")),
            genesis_block: Some(PathBuf::from("/tmp/genesis.json")),
            datadir: Some(PathBuf::from("/tmp/chain")),
            ..Default::default()
        });
        assert!(matches!(
            geth.init_chain().await,
            Err(ClientError::InitChainFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_init_chain_success_exit() {
        let geth = geth_with(RuntimeConfig {
            ethereum_client_bin: Some(PathBuf::from("true")),
            genesis_block: Some(PathBuf::from("/tmp/genesis.json")),
            datadir: Some(PathBuf::from("/tmp/chain")),
            ..Default::default()
        });
        assert!(geth.init_chain().await.is_ok());
    }
}
