//! Per-operation publisher state.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::context::BuildContext;
use crate::repository::RepositoryReferences;

/// Isolated state of one publish operation.
///
/// Each runtime owns its configuration area, so concurrent builds in one
/// process never see each other's publisher state. Handed to the
/// [`crate::ports::PublisherEngine`] on every call.
#[derive(Debug)]
pub struct PublisherRuntime {
    configuration_area: PathBuf,
    target_repository: PathBuf,
    context_repositories: RepositoryReferences,
    build: BuildContext,
    compress: bool,
    released: AtomicBool,
}

impl PublisherRuntime {
    pub(super) fn new(
        configuration_area: PathBuf,
        target_repository: PathBuf,
        context_repositories: RepositoryReferences,
        build: BuildContext,
        compress: bool,
    ) -> Self {
        Self {
            configuration_area,
            target_repository,
            context_repositories,
            build,
            compress,
            released: AtomicBool::new(false),
        }
    }

    /// Private configuration area, `<target>/p2agent-<id>`.
    #[must_use]
    pub fn configuration_area(&self) -> &Path {
        &self.configuration_area
    }

    /// Repository receiving the published units.
    #[must_use]
    pub fn target_repository(&self) -> &Path {
        &self.target_repository
    }

    /// Read-only repositories consulted for cross-references.
    #[must_use]
    pub fn context_repositories(&self) -> &RepositoryReferences {
        &self.context_repositories
    }

    /// The build this runtime publishes for.
    #[must_use]
    pub fn build(&self) -> &BuildContext {
        &self.build
    }

    /// Whether the target repository is written compressed.
    #[must_use]
    pub fn compress(&self) -> bool {
        self.compress
    }

    /// Returns `true` once [`Self::release`] ran.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Releases the runtime. Idempotent.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            debug!(area = %self.configuration_area.display(), "released publisher runtime");
        }
    }
}
