//! Version support checks against a declared range.

use super::ParsedVersion;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outcome of checking a version against a support range.
///
/// `Indeterminate` means the check could not be made (malformed range or
/// unparseable version), which is distinct from a known-unsupported version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionSupport {
    /// The version satisfies the range.
    Supported,
    /// The version is outside the range.
    Unsupported,
    /// The range or version could not be evaluated.
    Indeterminate,
}

impl VersionSupport {
    /// `Some(true)` / `Some(false)` for determined outcomes, `None` otherwise.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Supported => Some(true),
            Self::Unsupported => Some(false),
            Self::Indeterminate => None,
        }
    }

    /// Whether the version is known to be supported.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Supported)
    }
}

/// Comparator operators, longest first so `>=` wins over `>`.
const OPERATORS: &[&str] = &[">=", "<=", "~>", ">", "<", "=", "~", "^"];

/// Check a parsed version against a range such as `>=1.3.0`.
///
/// Ranges use node-style syntax: comparators separated by whitespace must all
/// hold, `||` separates alternatives, a bare version is an exact match,
/// `A - B` is inclusive on both ends and `x`/`*` are wildcards. Commas are
/// accepted as separators. The version is compared as plain
/// `major.minor.patch`. A range that cannot be parsed yields `Indeterminate`.
pub fn check_support(version: &ParsedVersion, range: &str) -> VersionSupport {
    let alternatives = match parse_range(range) {
        Ok(alternatives) => alternatives,
        Err(err) => {
            warn!(range, %err, "Could not parse supported version range");
            return VersionSupport::Indeterminate;
        }
    };

    let supported = alternatives
        .iter()
        .any(|requirement| requirement.matches(version.as_semver()));
    debug!(%version, range, supported, "Checked version support");
    if supported {
        VersionSupport::Supported
    } else {
        VersionSupport::Unsupported
    }
}

/// Parse a node-style range into one requirement per `||` alternative.
fn parse_range(range: &str) -> Result<Vec<VersionReq>, String> {
    range.split("||").map(parse_alternative).collect()
}

fn parse_alternative(alternative: &str) -> Result<VersionReq, String> {
    let tokens = tokenize(alternative);

    let comparators = match tokens.as_slice() {
        [from, dash, to] if dash == "-" => [
            translate_comparator(&format!(">={}", from))?,
            translate_comparator(&format!("<={}", to))?,
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>(),
        _ => tokens
            .iter()
            .map(|token| translate_comparator(token))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect(),
    };

    if comparators.is_empty() {
        return Ok(VersionReq::STAR);
    }
    VersionReq::parse(&comparators.join(", ")).map_err(|e| e.to_string())
}

/// Split on whitespace and commas, rejoining operators written apart from
/// their version (`>= 1.2.3`).
fn tokenize(alternative: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op = String::new();

    for token in alternative
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            pending_op.push_str(token);
            continue;
        }
        tokens.push(format!("{}{}", std::mem::take(&mut pending_op), token));
    }
    if !pending_op.is_empty() {
        tokens.push(pending_op);
    }
    tokens
}

/// Translate one node-style comparator into `semver` requirement syntax.
///
/// Returns `None` for comparators that match every version (`*`, `>=x`).
fn translate_comparator(token: &str) -> Result<Option<String>, String> {
    let (op, version) = OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token));
    let op = match op {
        "" => "=",
        "~>" => "~",
        op => op,
    };
    let version = version.strip_prefix('v').unwrap_or(version);
    let version = strip_wildcards(version);

    if version.is_empty() {
        return match op {
            "<" | ">" => Err(format!("comparator {:?} matches no version", token)),
            _ => Ok(None),
        };
    }
    Ok(Some(format!("{}{}", op, version)))
}

/// The components of `version` before the first wildcard.
fn strip_wildcards(version: &str) -> &str {
    let mut kept = 0;
    let mut offset = 0;
    for part in version.split('.') {
        if matches!(part, "x" | "X" | "*") {
            break;
        }
        kept = offset + part.len();
        offset = kept + 1;
    }
    &version[..kept]
}

/// Check a textual version (e.g. `1.9.7-stable`) against a range.
///
/// Pre-release and build metadata are dropped before comparison. Text that is
/// not a semver version yields `Indeterminate`.
pub fn check_support_str(version: &str, range: &str) -> VersionSupport {
    match Version::parse(version.trim()) {
        Ok(v) => check_support(&ParsedVersion::from(&v), range),
        Err(err) => {
            warn!(version, %err, "Could not parse version");
            VersionSupport::Indeterminate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_at_lower_bound() {
        assert_eq!(
            check_support(&ParsedVersion::new(1, 3, 0), ">=1.3.0"),
            VersionSupport::Supported
        );
    }

    #[test]
    fn test_unsupported_below_lower_bound() {
        assert_eq!(
            check_support(&ParsedVersion::new(1, 2, 9), ">=1.3.0"),
            VersionSupport::Unsupported
        );
    }

    #[test]
    fn test_sentinel_is_unsupported() {
        assert_eq!(
            check_support(&ParsedVersion::UNKNOWN, ">=1.3.0"),
            VersionSupport::Unsupported
        );
    }

    #[test]
    fn test_space_separated_range() {
        let range = ">=1.8.0 <2.0.0";
        assert!(check_support(&ParsedVersion::new(1, 9, 7), range).is_supported());
        assert_eq!(
            check_support(&ParsedVersion::new(2, 0, 0), range),
            VersionSupport::Unsupported
        );
        assert!(check_support(&ParsedVersion::new(1, 9, 7), ">=1.8.0, <2.0.0").is_supported());
        assert!(check_support(&ParsedVersion::new(1, 9, 7), ">= 1.8.0 < 2.0.0").is_supported());
    }

    #[test]
    fn test_bare_version_is_exact() {
        assert_eq!(
            check_support(&ParsedVersion::new(1, 9, 7), "1.3.0"),
            VersionSupport::Unsupported
        );
        assert!(check_support(&ParsedVersion::new(1, 3, 0), "1.3.0").is_supported());
        assert!(check_support(&ParsedVersion::new(1, 3, 0), "v1.3.0").is_supported());
    }

    #[test]
    fn test_alternatives() {
        let range = "1.x || >=2.5.0";
        assert!(check_support(&ParsedVersion::new(1, 9, 7), range).is_supported());
        assert!(check_support(&ParsedVersion::new(2, 7, 2), range).is_supported());
        assert_eq!(
            check_support(&ParsedVersion::new(2, 1, 0), range),
            VersionSupport::Unsupported
        );
    }

    #[test]
    fn test_hyphen_range_is_inclusive() {
        let range = "1.8.0 - 2.0.0";
        assert!(check_support(&ParsedVersion::new(1, 8, 0), range).is_supported());
        assert!(check_support(&ParsedVersion::new(2, 0, 0), range).is_supported());
        assert_eq!(
            check_support(&ParsedVersion::new(2, 0, 1), range),
            VersionSupport::Unsupported
        );
    }

    #[test]
    fn test_tilde_and_caret() {
        assert!(check_support(&ParsedVersion::new(1, 9, 9), "~1.9.7").is_supported());
        assert_eq!(
            check_support(&ParsedVersion::new(1, 10, 0), "~1.9.7"),
            VersionSupport::Unsupported
        );
        assert!(check_support(&ParsedVersion::new(1, 10, 0), "^1.9.7").is_supported());
    }

    #[test]
    fn test_wildcard_and_empty_match_everything() {
        for range in ["*", "x", ""] {
            assert!(
                check_support(&ParsedVersion::new(0, 1, 0), range).is_supported(),
                "range {:?}",
                range
            );
        }
    }

    #[test]
    fn test_malformed_range_is_indeterminate() {
        for range in ["not a range", ">=>1.0", "<*", "1.8.0 - "] {
            assert_eq!(
                check_support(&ParsedVersion::new(1, 3, 0), range),
                VersionSupport::Indeterminate,
                "range {:?}",
                range
            );
        }
    }

    #[test]
    fn test_str_prerelease_normalized() {
        // 1.3.0-beta would not satisfy >=1.3.0 under semver pre-release rules.
        assert_eq!(
            check_support_str("1.3.0-beta.1", ">=1.3.0"),
            VersionSupport::Supported
        );
    }

    #[test]
    fn test_str_invalid_version_is_indeterminate() {
        assert_eq!(
            check_support_str("garbage", ">=1.3.0"),
            VersionSupport::Indeterminate
        );
        assert_eq!(
            check_support_str("1.3", ">=1.3.0"),
            VersionSupport::Indeterminate
        );
    }

    #[test]
    fn test_as_bool() {
        assert_eq!(VersionSupport::Supported.as_bool(), Some(true));
        assert_eq!(VersionSupport::Unsupported.as_bool(), Some(false));
        assert_eq!(VersionSupport::Indeterminate.as_bool(), None);
    }
}
