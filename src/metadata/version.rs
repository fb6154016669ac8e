//! Component versions and version ranges.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A `major.minor.micro[.qualifier]` component version.
///
/// Numeric segments compare numerically; the qualifier compares as a string,
/// and an empty qualifier sorts first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u32,
    minor: u32,
    micro: u32,
    qualifier: String,
}

impl Version {
    /// The lowest version, `0.0.0`.
    pub const ZERO: Self = Self {
        major: 0,
        minor: 0,
        micro: 0,
        qualifier: String::new(),
    };

    /// Creates a version without qualifier.
    #[must_use]
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    /// Returns a copy with the given qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// The qualifier segment (empty if absent).
    #[must_use]
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Returns `true` if major, minor, and micro match `other`.
    #[must_use]
    pub fn same_base(&self, other: &Self) -> bool {
        (self.major, self.minor, self.micro) == (other.major, other.minor, other.micro)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.micro)
            .cmp(&(other.major, other.minor, other.micro))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Config("empty version".into()));
        }
        let mut parts = s.splitn(4, '.');
        let mut numeric = [0u32; 3];
        for slot in &mut numeric {
            match parts.next() {
                Some(part) => {
                    *slot = part
                        .parse()
                        .map_err(|_| Error::Config(format!("invalid version '{s}'")))?;
                }
                None => break,
            }
        }
        let qualifier = parts.next().unwrap_or_default().to_string();
        Ok(Self {
            major: numeric[0],
            minor: numeric[1],
            micro: numeric[2],
            qualifier,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

/// An interval of versions, e.g. `[1.0.0,2.0.0)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    min: Version,
    min_inclusive: bool,
    max: Option<Version>,
    max_inclusive: bool,
}

impl VersionRange {
    /// Matches every version.
    #[must_use]
    pub fn any() -> Self {
        Self::at_least(Version::ZERO)
    }

    /// Matches `version` and everything above it.
    #[must_use]
    pub fn at_least(version: Version) -> Self {
        Self {
            min: version,
            min_inclusive: true,
            max: None,
            max_inclusive: false,
        }
    }

    /// Matches exactly `version`.
    #[must_use]
    pub fn exactly(version: Version) -> Self {
        Self {
            min: version.clone(),
            min_inclusive: true,
            max: Some(version),
            max_inclusive: true,
        }
    }

    /// Returns `true` if `version` lies in the range.
    #[must_use]
    pub fn contains(&self, version: &Version) -> bool {
        let above = if self.min_inclusive { version >= &self.min } else { version > &self.min };
        let below = match &self.max {
            None => true,
            Some(max) if self.max_inclusive => version <= max,
            Some(max) => version < max,
        };
        above && below
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.max {
            None if self.min_inclusive => write!(f, "{}", self.min),
            None => write!(f, "({},)", self.min),
            Some(max) => write!(
                f,
                "{}{},{}{}",
                if self.min_inclusive { '[' } else { '(' },
                self.min,
                max,
                if self.max_inclusive { ']' } else { ')' }
            ),
        }
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(open) = s.chars().next() else {
            return Ok(Self::any());
        };
        if open != '[' && open != '(' {
            return Ok(Self::at_least(s.parse()?));
        }
        let invalid = || Error::Config(format!("invalid version range '{s}'"));
        let close = s.chars().last().ok_or_else(invalid)?;
        if s.len() < 2 || (close != ']' && close != ')') {
            return Err(invalid());
        }
        let inner = &s[1..s.len() - 1];
        let (lo, hi) = inner.split_once(',').ok_or_else(invalid)?;
        let max = if hi.trim().is_empty() { None } else { Some(hi.parse()?) };
        Ok(Self {
            min: lo.parse()?,
            min_inclusive: open == '[', max, max_inclusive: close == ']',
        })
    }
}

impl TryFrom<String> for VersionRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionRange> for String {
    fn from(value: VersionRange) -> Self {
        value.to_string()
    }
}
