//! Target platforms for several environments at once.

use serde::Serialize;

use super::environment::TargetEnvironment;
use super::target::{PlatformArtifact, TargetPlatform};
use crate::metadata::Unit;

/// Target platforms keyed by environment, in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiEnvironmentPlatform {
    platforms: Vec<(TargetEnvironment, TargetPlatform)>,
}

impl MultiEnvironmentPlatform {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the platform of one environment, replacing an earlier one.
    pub fn add_platform(&mut self, environment: TargetEnvironment, platform: TargetPlatform) {
        if let Some(slot) = self.platforms.iter_mut().find(|(e, _)| e == &environment) {
            slot.1 = platform;
        } else {
            self.platforms.push((environment, platform));
        }
    }

    /// Platform of one environment.
    #[must_use]
    pub fn platform(&self, environment: &TargetEnvironment) -> Option<&TargetPlatform> {
        self.platforms.iter().find(|(e, _)| e == environment).map(|(_, p)| p)
    }

    /// Environments in configured order.
    pub fn environments(&self) -> impl Iterator<Item = &TargetEnvironment> {
        self.platforms.iter().map(|(e, _)| e)
    }

    /// `(environment, platform)` pairs in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&TargetEnvironment, &TargetPlatform)> {
        self.platforms.iter().map(|(e, p)| (e, p))
    }
}

/// Result of resolving a module: per environment, or one merged platform
/// when conflicts are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PlatformView {
    /// One platform per environment.
    Multi {
        /// The per-environment platforms.
        platforms: MultiEnvironmentPlatform,
    },
    /// A single platform valid for all environments.
    Merged {
        /// The merged platform.
        platform: TargetPlatform,
    },
}

impl PlatformView {
    /// Platform applying to `environment`.
    #[must_use]
    pub fn for_environment(&self, environment: &TargetEnvironment) -> Option<&TargetPlatform> {
        match self {
            Self::Multi { platforms } => platforms.platform(environment),
            Self::Merged { platform } => Some(platform),
        }
    }

    fn platforms(&self) -> Vec<&TargetPlatform> {
        match self {
            Self::Multi { platforms } => platforms.iter().map(|(_, p)| p).collect(),
            Self::Merged { platform } => vec![platform],
        }
    }

    /// Union of all artifacts, without duplicates, in first-seen order.
    #[must_use]
    pub fn artifacts(&self) -> Vec<&PlatformArtifact> {
        let mut artifacts: Vec<&PlatformArtifact> = Vec::new();
        for artifact in self.platforms().into_iter().flat_map(TargetPlatform::artifacts) {
            if !artifacts.contains(&artifact) {
                artifacts.push(artifact);
            }
        }
        artifacts
    }

    /// Union of the non-reactor units, without duplicates, in first-seen order.
    #[must_use]
    pub fn non_reactor_units(&self) -> Vec<&Unit> {
        let mut units: Vec<&Unit> = Vec::new();
        for unit in self.platforms().into_iter().flat_map(TargetPlatform::non_reactor_units) {
            if !units.iter().any(|u| u.identity() == unit.identity()) {
                units.push(unit);
            }
        }
        units
    }
}
