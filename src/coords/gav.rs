//! Maven-style group/artifact/version coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Immutable `(group, artifact, version)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gav {
    group: String,
    artifact: String,
    version: String,
}

impl Gav {
    /// Creates a new coordinate triple.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Group id, e.g. `org.example`.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Artifact id.
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Version string, kept verbatim (e.g. `1.0.0-SNAPSHOT`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for Gav {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(g), Some(a), Some(v), None)
                if !g.is_empty() && !a.is_empty() && !v.is_empty() =>
            {
                Ok(Self::new(g, a, v))
            }
            _ => Err(Error::Config(format!(
                "invalid coordinates '{s}', expected group:artifact:version"
            ))),
        }
    }
}
