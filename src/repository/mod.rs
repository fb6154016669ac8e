//! Repository views over the two physical layouts and the ordered
//! references that compose them.

mod artifact;
mod factory;
mod metadata;
mod module;
mod references;
mod visible;

pub use artifact::{ArtifactFetch, FetchStatus, FullLayoutArtifactRepository};
pub use factory::{
    create_module_repository, load_module_artifact_repository, load_module_metadata_repository,
    LoadFlags,
};
pub use metadata::MetadataRepository;
pub use module::{ClassifierMapLocator, ModuleArtifactDescriptor, ModuleArtifactRepository};
pub use references::RepositoryReferences;
pub use visible::{
    visible_repositories, VisibilityFlags, PUBLISHER_REPOSITORY, TARGET_PLATFORM_REPOSITORY,
};

use std::path::{Path, PathBuf};

/// Converts a directory into a `file:` URI.
#[must_use]
pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Directory of a `file:` URI, `None` for any other scheme.
#[must_use]
pub fn as_file(location: &str) -> Option<PathBuf> {
    location.strip_prefix("file://").map(PathBuf::from)
}
