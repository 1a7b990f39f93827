//! Client kind enum identifying supported node clients.

use crate::{
    BlockchainClient, ClientDescriptor, ClientError, ClientOptions, GethClient, ParityClient,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// The type of node client.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new clients in
/// future versions. When matching on `ClientKind`, always include a wildcard
/// pattern:
///
/// ```rust
/// use blockchain_client::ClientKind;
///
/// fn describe(kind: ClientKind) -> &'static str {
///     match kind {
///         ClientKind::Geth => "go-ethereum",
///         ClientKind::Parity => "parity",
///         _ => "unknown client",
///     }
/// }
/// ```
///
/// # Example
///
/// ```rust
/// use blockchain_client::ClientKind;
///
/// for kind in ClientKind::all() {
///     println!("{}: {}", kind.display_name(), kind.executable_name());
/// }
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ClientKind {
    /// go-ethereum (geth CLI)
    Geth,
    /// Parity-Ethereum (parity CLI)
    Parity,
}

impl ClientKind {
    /// The client's static descriptor.
    pub fn descriptor(&self) -> ClientDescriptor {
        match self {
            Self::Geth => GethClient::DESCRIPTOR,
            Self::Parity => ParityClient::DESCRIPTOR,
        }
    }

    /// The default executable name.
    ///
    /// ```rust
    /// use blockchain_client::ClientKind;
    ///
    /// assert_eq!(ClientKind::Geth.executable_name(), "geth");
    /// ```
    pub fn executable_name(&self) -> &'static str {
        self.descriptor().bin
    }

    /// Human-readable display name.
    ///
    /// ```rust
    /// use blockchain_client::ClientKind;
    ///
    /// assert_eq!(ClientKind::Parity.display_name(), "Parity-Ethereum");
    /// ```
    pub fn display_name(&self) -> &'static str {
        self.descriptor().pretty_name
    }

    /// Iterator over all known client kinds.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }

    /// Construct the concrete client for this kind.
    pub fn client(&self, options: ClientOptions) -> Box<dyn BlockchainClient> {
        match self {
            Self::Geth => Box::new(GethClient::new(options)),
            Self::Parity => Box::new(ParityClient::new(options)),
        }
    }

    /// Construct the client named by `options.config.client`.
    ///
    /// An unset name selects geth.
    ///
    /// ```rust
    /// use blockchain_client::{BlockchainClient, ClientKind, ClientOptions, RuntimeConfig};
    ///
    /// let options = ClientOptions {
    ///     config: RuntimeConfig {
    ///         client: Some("parity".to_string()),
    ///         ..Default::default()
    ///     },
    ///     ..Default::default()
    /// };
    /// let client = ClientKind::from_options(options).unwrap();
    /// assert_eq!(client.name(), "parity");
    /// ```
    pub fn from_options(options: ClientOptions) -> Result<Box<dyn BlockchainClient>, ClientError> {
        let kind = match options.config.client.as_deref() {
            Some(name) => name.parse()?,
            None => Self::Geth,
        };
        Ok(kind.client(options))
    }
}

impl FromStr for ClientKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|kind| kind.descriptor().name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClientError::UnknownClient {
                name: s.to_string(),
                fix: format!(
                    "Set client to one of: {}",
                    Self::all()
                        .map(|k| k.descriptor().name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}
