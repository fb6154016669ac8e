//! Crate-wide error type.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while resolving, loading, or publishing.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed configuration, target definition, or coordinate request.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A repository location could not be read.
    #[error("Repository unavailable: {location}: {reason}")]
    RepositoryUnavailable {
        /// The repository location that failed.
        location: String,
        /// Why it failed.
        reason: String,
    },

    /// A metadata document could not be read or parsed.
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// The caller broke a contract of the component (signals a defect).
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// A requirement could not be satisfied by any visible unit.
    #[error("Unsatisfied requirement in {environment}: {requirement}")]
    Unsatisfied {
        /// Environment in which resolution failed.
        environment: String,
        /// The requirement that could not be met.
        requirement: String,
    },

    /// Two incompatible versions of a singleton unit were selected.
    #[error("Conflicting dependencies in {environment}: {first} vs {second}")]
    Conflict {
        /// Environment in which resolution failed.
        environment: String,
        /// The unit that was selected first.
        first: String,
        /// The unit that clashed with it.
        second: String,
    },

    /// Dependencies of the module could not be resolved.
    #[error("Could not resolve project dependencies: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),

    /// The publisher engine reported a failure.
    #[error("Publish error: {0}")]
    Publish(String),

    /// Underlying I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps a port failure as an unavailable repository.
    pub fn unavailable(location: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::RepositoryUnavailable {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for errors that callers may downgrade to a warning.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RepositoryUnavailable { .. } | Self::Metadata(_))
    }
}
