//! # blockchain-client
//!
//! Client contract, configuration and version detection for Ethereum node
//! binaries (go-ethereum, Parity-Ethereum) used by development tooling.
//!
//! This crate builds node command lines and inspects node output. Spawning
//! and supervising the node process is left to the caller.
//!
//! ## Features
//!
//! - `BlockchainClient` trait declaring the capabilities of a node client
//! - `GethClient` and `ParityClient` implementations
//! - `RuntimeConfig` backfilled from a static `ClientDescriptor`
//! - `parse_version()` / `check_support()` for fail-soft version checks
//! - `detect()` / `detect_all()` async functions for locating client binaries
//!
//! ## Example
//!
//! ```rust,no_run
//! use blockchain_client::{detect, BlockchainClient, ClientKind, ClientOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let client = ClientKind::Geth.client(ClientOptions::default());
//!
//!     let status = detect(client.as_ref()).await;
//!     if status.is_usable() {
//!         client.init_chain().await.expect("chain initialization failed");
//!         let command = client.main_command("0x5e1ee4f5d2b5b4d25b94fbcc0b1a1f4a7c3c0d15").unwrap();
//!         println!("{}", command);
//!     }
//! }
//! ```

mod client;
mod client_kind;
mod client_status;
mod clients;
mod config;
mod descriptor;
mod detect;
mod detection;
mod error;
mod options;

pub use client::{BaseClient, BlockchainClient, NodeCommand};
pub use client_kind::ClientKind;
pub use client_status::{ClientStatus, DetectionError, InstalledMetadata};
pub use clients::{GethClient, ParityClient};
pub use config::{NodeAccountSetting, RuntimeConfig};
pub use descriptor::ClientDescriptor;
pub use detect::{detect, detect_all, detect_all_with_options, detect_with_options};
pub use detection::{check_support, check_support_str, parse_version, ParsedVersion, VersionSupport};
pub use error::ClientError;
pub use options::{ClientOptions, DetectOptions, DEVELOPMENT_ENV};
