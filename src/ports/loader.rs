//! Loader port for external provisioning-format repositories.

use crate::error::PortError;
use crate::metadata::Unit;

/// Loads the units published in a provisioning-format repository.
pub trait RepositoryLoader: Send + Sync {
    /// Loads all units of the repository at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be reached or parsed.
    fn load_units(&self, url: &str) -> Result<Vec<Unit>, PortError>;
}
