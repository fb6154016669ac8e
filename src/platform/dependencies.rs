//! External dependency declarations derived from a resolved platform.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use super::multi::PlatformView;
use super::target::PlatformArtifact;
use crate::coords::{synthetic_gav, Gav};
use crate::metadata::ArtifactDescriptor;
use crate::ports::FileSystem;
use crate::resolver::ReactorModule;

/// Scope of a dependency declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    /// Ordinary compile dependency.
    Compile,
    /// Supplied by the build itself.
    Provided,
    /// Pinned to a file on disk.
    System,
}

/// A dependency as an ordinary build tool understands it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDeclaration {
    /// Coordinates.
    pub gav: Gav,
    /// Packaging type, if not the default.
    pub kind: Option<String>,
    /// Classifier, if any.
    pub classifier: Option<String>,
    /// Scope.
    pub scope: DependencyScope,
    /// File for [`DependencyScope::System`].
    pub system_path: Option<PathBuf>,
}

impl DependencyDeclaration {
    /// Compile-scope declaration of an artifact descriptor.
    ///
    /// Returns `None` unless the descriptor embeds complete Maven
    /// coordinates.
    #[must_use]
    pub fn from_descriptor(descriptor: &ArtifactDescriptor) -> Option<Self> {
        Some(Self {
            gav: descriptor.gav()?,
            kind: None,
            classifier: descriptor.classifier().map(str::to_string),
            scope: DependencyScope::Compile,
            system_path: None,
        })
    }
}

/// Converts a resolved platform into dependency declarations for `module`.
///
/// Reactor artifacts become `provided` dependencies on their module, the
/// module itself excluded. Other artifacts become `system` dependencies with
/// a `p2.<kind>` group pinned to their file; locations that are not
/// readable files cannot be declared and are skipped with a warning.
#[must_use]
pub fn dependency_declarations(
    view: &PlatformView,
    module: &Gav,
    reactor: &[ReactorModule],
    fs: &dyn FileSystem,
) -> Vec<DependencyDeclaration> {
    let mut declarations: Vec<DependencyDeclaration> = Vec::new();
    for artifact in view.artifacts() {
        let declaration = match artifact {
            PlatformArtifact::Reactor { module: gav, .. } => {
                if gav == module {
                    continue;
                }
                DependencyDeclaration {
                    gav: gav.clone(),
                    kind: reactor
                        .iter()
                        .find(|m| m.gav() == gav)
                        .map(|m| m.packaging().to_string()),
                    classifier: None,
                    scope: DependencyScope::Provided,
                    system_path: None,
                }
            }
            PlatformArtifact::File { key, path, .. } => {
                if !fs.is_file(path) {
                    warn!(
                        location = %path.display(),
                        "dependency has no declaration form, only resolution-aware steps see it"
                    );
                    continue;
                }
                DependencyDeclaration {
                    gav: synthetic_gav(&key.kind, &key.id, &key.version.to_string()),
                    kind: None,
                    classifier: None,
                    scope: DependencyScope::System,
                    system_path: Some(path.clone()),
                }
            }
        };
        if !declarations.contains(&declaration) {
            declarations.push(declaration);
        }
    }
    declarations
}
