//! Version output parsing with regex extraction.

use regex::Regex;
use semver::Version;
use std::fmt;
use std::sync::OnceLock;

/// Pattern used to find the version in a client's version output.
///
/// Each component is a single digit, so `Version: 1.10.0` does not match.
const VERSION_PATTERN: &str = r"Version: ([0-9]\.[0-9]\.[0-9])";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("Invalid regex pattern"))
}

/// A `major.minor.patch` version parsed from client output.
///
/// `0.0.0` is the sentinel for "no version found" and must be treated as
/// unknown, not as a real release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParsedVersion(Version);

impl ParsedVersion {
    /// The `0.0.0` sentinel.
    pub const UNKNOWN: ParsedVersion = ParsedVersion(Version::new(0, 0, 0));

    /// Build a version from its components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Whether this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// The underlying semver version, without pre-release or build metadata.
    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl From<&Version> for ParsedVersion {
    fn from(version: &Version) -> Self {
        Self::new(version.major, version.minor, version.patch)
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parse the version from a client's version output.
///
/// Scans for `Version: X.Y.Z` anywhere in the text. Returns
/// [`ParsedVersion::UNKNOWN`] when nothing matches; this never fails.
///
/// - `Geth\nVersion: 1.9.7-stable\nArchitecture: amd64` -> 1.9.7
/// - `no version here` -> 0.0.0
pub fn parse_version(output: &str) -> ParsedVersion {
    version_regex()
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Version::parse(m.as_str().trim()).ok())
        .map(|v| ParsedVersion::from(&v))
        .unwrap_or(ParsedVersion::UNKNOWN)
}

/// Parse the first `vX.Y.Z` following `prefix` (e.g. `Parity-Ethereum/`).
///
/// Used by clients whose version output does not follow the `Version:` form.
/// Returns [`ParsedVersion::UNKNOWN`] when nothing matches.
pub(crate) fn parse_prefixed_version(output: &str, prefix: &Regex) -> ParsedVersion {
    prefix
        .captures(output)
        .and_then(|caps| {
            let major = caps.get(1)?.as_str().parse().ok()?;
            let minor = caps.get(2)?.as_str().parse().ok()?;
            let patch = caps.get(3)?.as_str().parse().ok()?;
            Some(ParsedVersion::new(major, minor, patch))
        })
        .unwrap_or(ParsedVersion::UNKNOWN)
}
