//! Build facts handed to publisher actions.

use std::path::{Path, PathBuf};

use crate::platform::TargetEnvironment;
use crate::ports::Clock;

/// Facts about the running build that publisher actions need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    qualifier: String,
    target_dir: PathBuf,
    environments: Vec<TargetEnvironment>,
}

impl BuildContext {
    /// Creates a context whose qualifier is the current time as `yyyyMMddHHmm`.
    #[must_use]
    pub fn new(
        clock: &dyn Clock,
        target_dir: impl Into<PathBuf>,
        environments: Vec<TargetEnvironment>,
    ) -> Self {
        Self {
            qualifier: clock.now().format("%Y%m%d%H%M").to_string(),
            target_dir: target_dir.into(),
            environments,
        }
    }

    /// Replaces the generated qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Build qualifier.
    #[must_use]
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Build output directory.
    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Environments the build targets.
    #[must_use]
    pub fn environments(&self) -> &[TargetEnvironment] {
        &self.environments
    }

    /// Environments as `ws.os.arch` configuration strings.
    #[must_use]
    pub fn configurations(&self) -> Vec<String> {
        self.environments.iter().map(TargetEnvironment::configuration).collect()
    }
}
