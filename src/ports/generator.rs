//! Generator port for a module's own dependency metadata.

use crate::error::PortError;
use crate::metadata::Unit;
use crate::platform::TargetEnvironment;
use crate::resolver::ReactorModule;

/// What the generated metadata describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorRole {
    /// Units and requirements of the module itself.
    DependencyOnly,
    /// The source bundle attached to the module.
    SourceBundle,
}

/// Derives provisioning units from a module's build descriptors.
pub trait DependencyMetadataGenerator: Send + Sync {
    /// Generates the units of `module` for the given environments.
    ///
    /// # Errors
    ///
    /// Returns an error if the module's descriptors cannot be read.
    fn generate(
        &self,
        module: &ReactorModule,
        environments: &[TargetEnvironment],
        role: GeneratorRole,
    ) -> Result<Vec<Unit>, PortError>;
}
