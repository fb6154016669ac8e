//! Repositories a module's publishing steps may read from.

use std::collections::HashSet;

use tracing::debug;

use super::references::RepositoryReferences;
use crate::context::ServiceContext;
use crate::coords::{layout, Gav};
use crate::error::{Error, Result};
use crate::metadata::Unit;
use crate::platform::{PlatformArtifact, PlatformView};
use crate::resolver::{BuildSession, ReactorModule};

/// Build directory child holding the module's own published output.
pub const PUBLISHER_REPOSITORY: &str = "publisherRepository";
/// Build directory child holding the materialized target platform.
pub const TARGET_PLATFORM_REPOSITORY: &str = "targetPlatformRepository";

/// Options of [`visible_repositories`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityFlags {
    /// Also expose what the module itself has published so far.
    pub include_self_module: bool,
}

/// Collects the repositories visible to `module`, in precedence order.
///
/// Order: the module's own publisher repository (if requested), the
/// reactor plug-in and feature modules its platform references in build
/// order, then the materialized target platform and the local repository. The target
/// platform's non-reactor units are written to
/// `<build>/targetPlatformRepository/content.xml` on the way.
///
/// # Errors
///
/// Returns [`Error::Metadata`] if a referenced module has not produced its
/// metadata document, or an I/O error if the target platform cannot be
/// written.
pub fn visible_repositories(
    ctx: &ServiceContext,
    session: &BuildSession,
    module: &ReactorModule,
    platform: &PlatformView,
    flags: VisibilityFlags,
) -> Result<RepositoryReferences> {
    let mut references = RepositoryReferences::new();
    let build_dir = module.build_dir();

    if flags.include_self_module {
        let own = super::file_uri(&build_dir.join(PUBLISHER_REPOSITORY));
        references.add_metadata_repository(own.clone());
        references.add_artifact_repository(own);
    }

    let referenced: HashSet<&Gav> = platform
        .artifacts()
        .into_iter()
        .filter_map(|artifact| match artifact {
            PlatformArtifact::Reactor { module: gav, .. } => Some(gav),
            PlatformArtifact::File { .. } => None,
        })
        .collect();
    let in_build_order = session.modules.iter().filter(|m| {
        m.gav() != module.gav()
            && referenced.contains(m.gav())
            && m.packaging().publishes_module_repository()
    });
    for dependency in in_build_order {
        let metadata = dependency.metadata_file().ok_or_else(|| {
            Error::Metadata(format!(
                "{} has no {} artifact; it must be built before {}",
                dependency.gav(),
                layout::CLASSIFIER_P2_METADATA,
                module.gav()
            ))
        })?;
        let dir = metadata.parent().unwrap_or(dependency.build_dir());
        references.add_metadata_repository(super::file_uri(dir));
        references.add_module_artifact_repository(dependency.artifact_descriptor());
    }

    let target_dir = build_dir.join(TARGET_PLATFORM_REPOSITORY);
    let units: Vec<Unit> = platform.non_reactor_units().into_iter().cloned().collect();
    let document = ctx.codec.write_units(&units).map_err(|e| Error::Metadata(e.to_string()))?;
    let content = target_dir.join(layout::FILE_NAME_CONTENT);
    ctx.fs
        .create_dir_all(&target_dir)
        .and_then(|()| ctx.fs.write(&content, &document))
        .map_err(|e| Error::Io(std::io::Error::other(format!("{}: {e}", content.display()))))?;
    debug!(path = %content.display(), units = units.len(), "wrote target platform repository");
    references.add_metadata_repository(super::file_uri(&target_dir));
    references.add_artifact_repository(super::file_uri(&session.local_repository));

    Ok(references)
}
