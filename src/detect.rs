//! Client detection functions.

use crate::detection::{check_version, find_executable, ParsedVersion, VersionSupport};
use crate::{
    BlockchainClient, ClientKind, ClientOptions, ClientStatus, DetectOptions, DetectionError,
    InstalledMetadata,
};
use futures::future::join_all;
use std::collections::HashMap;
use std::time::SystemTime;
use tracing::{debug, instrument, warn};

/// Detect a client with default options.
///
/// # Example
///
/// ```rust,no_run
/// use blockchain_client::{detect, ClientOptions, GethClient};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let geth = GethClient::new(ClientOptions::default());
///     let status = detect(&geth).await;
///     if status.is_usable() {
///         println!("geth is available at {:?}", status.path());
///     }
/// }
/// ```
pub async fn detect(client: &dyn BlockchainClient) -> ClientStatus {
    detect_with_options(client, &DetectOptions::default()).await
}

/// Detect a client's binary and check its version.
///
/// # Detection Process
///
/// 1. Find the client binary (explicit path, PATH, fallback locations)
/// 2. Run the client's version command with `options.timeout`
/// 3. Parse the version with the client's parser
/// 4. Check it against the client's support range
///
/// A version command that times out is reported as `NotInstalled`. Output
/// without a recognizable version is `Unknown` with `VersionParseFailed`, and
/// a range that cannot be evaluated is `Unknown` with `IndeterminateVersion`.
#[instrument(level = "debug", skip_all, fields(client = client.name()))]
pub async fn detect_with_options(
    client: &dyn BlockchainClient,
    options: &DetectOptions,
) -> ClientStatus {
    let path = match find_executable(client.binary_path()) {
        Some(p) => p,
        None => {
            debug!(binary = %client.binary_path().display(), "Client binary not found");
            return ClientStatus::NotInstalled;
        }
    };

    if options.skip_version {
        return ClientStatus::Installed(InstalledMetadata {
            path,
            version: ParsedVersion::UNKNOWN,
            raw_version: None,
            last_verified: SystemTime::now(),
        });
    }

    let mut command = match client.version_command() {
        Ok(cmd) => cmd,
        Err(e) => {
            return ClientStatus::Unknown {
                error: DetectionError::CommandUnavailable,
                message: e.to_string(),
            }
        }
    };
    command.program = path.clone();

    let output = match check_version(&command, options.timeout).await {
        Ok(output) => output,
        Err(DetectionError::Timeout) => {
            warn!(%command, timeout = ?options.timeout, "Version command timed out");
            return ClientStatus::NotInstalled;
        }
        Err(e) => {
            return ClientStatus::Unknown {
                message: format!(
                    "Failed to verify {}: {}",
                    client.pretty_name(),
                    e.description()
                ),
                error: e,
            }
        }
    };

    let version = client.parse_version(&output);
    if version.is_unknown() {
        return ClientStatus::Unknown {
            error: DetectionError::VersionParseFailed,
            message: format!("Failed to parse version from: {}", output.trim()),
        };
    }

    match client.is_supported_version(&version) {
        VersionSupport::Supported => ClientStatus::Installed(InstalledMetadata {
            path,
            version,
            raw_version: Some(output),
            last_verified: SystemTime::now(),
        }),
        VersionSupport::Unsupported => {
            warn!(
                %version,
                required = client.versions_supported(),
                "Unsupported client version"
            );
            ClientStatus::VersionMismatch {
                found: version,
                required: client.versions_supported().to_string(),
                path,
            }
        }
        VersionSupport::Indeterminate => ClientStatus::Unknown {
            error: DetectionError::IndeterminateVersion,
            message: format!(
                "Could not check {} {} against {}",
                client.pretty_name(),
                version,
                client.versions_supported()
            ),
        },
    }
}

/// Detect all known clients concurrently.
///
/// Each client is built from a clone of `options`, so an explicit
/// `ethereum_client_bin` applies to every kind.
pub async fn detect_all(options: ClientOptions) -> HashMap<ClientKind, ClientStatus> {
    detect_all_with_options(options, DetectOptions::default()).await
}

/// Detect all known clients concurrently with custom detection options.
pub async fn detect_all_with_options(
    options: ClientOptions,
    detect_options: DetectOptions,
) -> HashMap<ClientKind, ClientStatus> {
    let detect_options = &detect_options;
    let futures: Vec<_> = ClientKind::all()
        .map(|kind| {
            let client = kind.client(options.clone());
            async move {
                let status = detect_with_options(client.as_ref(), detect_options).await;
                (kind, status)
            }
        })
        .collect();

    join_all(futures).await.into_iter().collect()
}
