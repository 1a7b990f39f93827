//! Version detection internals.
//!
//! - `find_executable`: PATH-based executable lookup with fallbacks
//! - `check_version`: Async version command execution with timeout
//! - `parse_version`: Regex-based `Version: X.Y.Z` extraction
//! - `check_support`: Three-valued range check against a support range

mod parser;
mod path_finder;
mod support;
mod version;

pub use parser::{parse_version, ParsedVersion};
pub(crate) use parser::parse_prefixed_version;
pub(crate) use path_finder::find_executable;
pub use support::{check_support, check_support_str, VersionSupport};
pub(crate) use version::check_version;
