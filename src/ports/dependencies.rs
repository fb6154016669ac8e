//! Transitive dependency closure of ordinary dependency declarations.

use std::path::PathBuf;

use crate::coords::Gav;
use crate::error::PortError;
use crate::metadata::Unit;

/// One artifact of a dependency closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureArtifact {
    /// Coordinates of the artifact.
    pub gav: Gav,
    /// Local file of the artifact, `None` if it could not be resolved.
    pub file: Option<PathBuf>,
    /// Provisioning units describing the artifact.
    pub units: Vec<Unit>,
}

/// Computes the compile-scope closure of a module's declared dependencies.
pub trait DependencyClosure: Send + Sync {
    /// Returns every artifact in the closure, resolved or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the closure cannot be computed at all.
    fn compile_closure(
        &self,
        module: &Gav,
        declared: &[Gav],
    ) -> Result<Vec<ClosureArtifact>, PortError>;
}
