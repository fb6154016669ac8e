//! Solver port: the black-box constraint solver.

use crate::error::Result;
use crate::metadata::{Requirement, Unit};
use crate::platform::TargetEnvironment;

/// Selects units satisfying a set of root requirements.
///
/// Implementations must be deterministic: the same inputs in the same order
/// yield the same selection. Ties between candidates break by highest
/// version, then by position in `available`.
pub trait Solver: Send + Sync {
    /// Resolves `roots` against `available` for one environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unsatisfied`] when a required capability has
    /// no candidate, or [`crate::Error::Conflict`] when two versions of a
    /// singleton unit would be selected.
    fn resolve(
        &self,
        available: &[Unit],
        roots: &[Requirement],
        environment: &TargetEnvironment,
    ) -> Result<Vec<Unit>>;

    /// Collects every unit reachable from `roots` without environment
    /// filtering or conflict checks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unsatisfied`] when a required capability has
    /// no candidate at all.
    fn collect(&self, available: &[Unit], roots: &[Requirement]) -> Result<Vec<Unit>>;
}
