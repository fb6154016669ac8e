//! Ordered references to the repositories a step may read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::module::ModuleArtifactDescriptor;

/// Ordered repository locations visible to one resolution or publish step.
///
/// Earlier entries take precedence. Nothing is deduplicated, so callers
/// control precedence through the order of their calls.
#[derive(Debug, Clone, Default)]
pub struct RepositoryReferences {
    metadata: Vec<String>,
    artifacts: Vec<String>,
    modules: BTreeMap<PathBuf, ModuleArtifactDescriptor>,
}

impl RepositoryReferences {
    /// Creates an empty reference list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a metadata repository.
    pub fn add_metadata_repository(&mut self, location: impl Into<String>) {
        self.metadata.push(location.into());
    }

    /// Appends an artifact repository.
    pub fn add_artifact_repository(&mut self, location: impl Into<String>) {
        self.artifacts.push(location.into());
    }

    /// Appends a module's build output as artifact repository and
    /// remembers its classifier table by location.
    pub fn add_module_artifact_repository(&mut self, descriptor: ModuleArtifactDescriptor) {
        self.artifacts.push(descriptor.uri());
        self.modules.insert(descriptor.location.clone(), descriptor);
    }

    /// Metadata repositories in insertion order.
    #[must_use]
    pub fn metadata_repositories(&self) -> &[String] {
        &self.metadata
    }

    /// Artifact repositories in insertion order, module repositories included.
    #[must_use]
    pub fn artifact_repositories(&self) -> &[String] {
        &self.artifacts
    }

    /// Module descriptors by repository location.
    #[must_use]
    pub fn modules(&self) -> &BTreeMap<PathBuf, ModuleArtifactDescriptor> {
        &self.modules
    }

    /// Descriptor of the module repository at `location`.
    #[must_use]
    pub fn module_descriptor(&self, location: &Path) -> Option<&ModuleArtifactDescriptor> {
        self.modules.get(location)
    }
}
