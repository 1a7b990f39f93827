//! Concrete node clients.

mod geth;
mod parity;

pub use geth::GethClient;
pub use parity::ParityClient;
