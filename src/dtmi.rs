//! DTMI parsing, comparison, and repository path conventions.
//!
//! A DTMI (Digital Twin Model Identifier) is a versioned, colon-delimited
//! identifier such as `dtmi:com:example:Thermostat;1`. Identifiers compare
//! case-insensitively; repository paths derived from them are always
//! lower-case.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static DTMI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^dtmi:[A-Za-z](?:[A-Za-z0-9_]*[A-Za-z0-9])?(?::[A-Za-z](?:[A-Za-z0-9_]*[A-Za-z0-9])?)*;[1-9][0-9]{0,8}$",
    )
    .expect("DTMI pattern is valid")
});

/// Error returned when a string is not a well-formed DTMI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid DTMI \"{0}\"")]
pub struct InvalidDtmiError(String);

/// A parsed, validated Digital Twin Model Identifier.
///
/// The original casing is preserved for display while comparisons and
/// hashing use the case-folded form, so `dtmi:com:example:Thermostat;1`
/// and `dtmi:com:example:thermostat;1` are the same key.
#[derive(Debug, Clone)]
pub struct Dtmi {
    raw: String,
    normalized: String,
    version: u32,
}

impl Dtmi {
    /// Parse and validate a DTMI string.
    pub fn parse(value: &str) -> Result<Self, InvalidDtmiError> {
        if !DTMI_REGEX.is_match(value) {
            return Err(InvalidDtmiError(value.to_string()));
        }
        let version = value
            .rsplit_once(';')
            .and_then(|(_, version)| version.parse::<u32>().ok())
            .ok_or_else(|| InvalidDtmiError(value.to_string()))?;

        Ok(Self {
            raw: value.to_string(),
            normalized: value.to_ascii_lowercase(),
            version,
        })
    }

    /// The identifier exactly as it was parsed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The case-folded form used for comparison and path mapping.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Model version, the digits after the `;` separator.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Identifier segments between the `dtmi:` scheme and the version.
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        // Shape is guaranteed by the parse regex.
        let body = self
            .normalized
            .strip_prefix("dtmi:")
            .and_then(|rest| rest.rsplit_once(';'))
            .map(|(body, _)| body)
            .unwrap_or("");
        body.split(':')
    }

    /// Repository-relative path of the model document.
    ///
    /// `dtmi:com:example:Thermostat;1` maps to
    /// `dtmi/com/example/thermostat-1.json`.
    pub fn to_path(&self) -> String {
        format!("{}.json", self.path_stem())
    }

    /// Repository-relative path of the expanded document, which bundles the
    /// model together with its entire dependency closure.
    pub fn to_expanded_path(&self) -> String {
        format!("{}.expanded.json", self.path_stem())
    }

    fn path_stem(&self) -> String {
        self.normalized.replace(':', "/").replace(';', "-")
    }
}

impl PartialEq for Dtmi {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for Dtmi {}

impl Hash for Dtmi {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl fmt::Display for Dtmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Dtmi {
    type Err = InvalidDtmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Dtmi {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
