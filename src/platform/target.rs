//! Resolved target platform of one environment.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::coords::Gav;
use crate::metadata::{ComponentKey, Unit, Version};

/// One artifact of a resolved target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum PlatformArtifact {
    /// Built by a module of the same build; read from that module's output.
    Reactor {
        /// Component identity.
        key: ComponentKey,
        /// Classifier within the module, `None` for the main artifact.
        classifier: Option<String>,
        /// The producing module.
        module: Gav,
        /// Directory of the producing module.
        location: PathBuf,
    },
    /// A file obtained from a repository.
    File {
        /// Component identity.
        key: ComponentKey,
        /// Classifier, if any.
        classifier: Option<String>,
        /// Location of the file.
        path: PathBuf,
    },
}

impl PlatformArtifact {
    /// Component identity.
    #[must_use]
    pub fn key(&self) -> &ComponentKey {
        match self {
            Self::Reactor { key, .. } | Self::File { key, .. } => key,
        }
    }

    /// Classifier, if any.
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        match self {
            Self::Reactor { classifier, .. } | Self::File { classifier, .. } => {
                classifier.as_deref()
            }
        }
    }

    /// Module directory or file path.
    #[must_use]
    pub fn location(&self) -> &Path {
        match self {
            Self::Reactor { location, .. } => location,
            Self::File { path, .. } => path,
        }
    }
}

/// Resolved artifacts and units visible to a module in one environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetPlatform {
    artifacts: Vec<PlatformArtifact>,
    non_reactor_units: Vec<Unit>,
    sites: Vec<PathBuf>,
}

impl TargetPlatform {
    /// Creates an empty platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artifact built by a reactor module.
    pub fn add_reactor_artifact(
        &mut self,
        key: ComponentKey,
        module: &Gav,
        location: &Path,
        classifier: Option<String>,
    ) {
        self.artifacts.push(PlatformArtifact::Reactor {
            key,
            classifier,
            module: module.clone(),
            location: location.to_path_buf(),
        });
    }

    /// Adds an artifact file.
    pub fn add_artifact_file(
        &mut self,
        key: ComponentKey,
        path: PathBuf,
        classifier: Option<String>,
    ) {
        self.artifacts.push(PlatformArtifact::File {
            key,
            classifier,
            path,
        });
    }

    /// Records units that did not come from the reactor.
    pub fn add_non_reactor_units(&mut self, units: impl IntoIterator<Item = Unit>) {
        self.non_reactor_units.extend(units);
    }

    /// Adds a site the artifacts were drawn from.
    pub fn add_site(&mut self, site: PathBuf) {
        if !self.sites.contains(&site) {
            self.sites.push(site);
        }
    }

    /// Artifacts in resolution order.
    #[must_use]
    pub fn artifacts(&self) -> &[PlatformArtifact] {
        &self.artifacts
    }

    /// Units not produced by the reactor.
    #[must_use]
    pub fn non_reactor_units(&self) -> &[Unit] {
        &self.non_reactor_units
    }

    /// Sites backing the platform.
    #[must_use]
    pub fn sites(&self) -> &[PathBuf] {
        &self.sites
    }

    /// Looks up an artifact; without a version the highest one wins.
    #[must_use]
    pub fn artifact(
        &self,
        kind: &str,
        id: &str,
        version: Option<&Version>,
    ) -> Option<&PlatformArtifact> {
        let mut matches = self.artifacts.iter().filter(|a| {
            let key = a.key();
            key.kind == kind && key.id == id && version.map_or(true, |v| &key.version == v)
        });
        let first = matches.next()?;
        Some(matches.fold(first, |best, a| {
            if a.key().version > best.key().version {
                a
            } else {
                best
            }
        }))
    }

    /// Reactor modules referenced by the platform, in first-use order.
    #[must_use]
    pub fn reactor_modules(&self) -> Vec<&Gav> {
        let mut modules: Vec<&Gav> = Vec::new();
        for artifact in &self.artifacts {
            if let PlatformArtifact::Reactor { module, .. } = artifact {
                if !modules.contains(&module) {
                    modules.push(module);
                }
            }
        }
        modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::KIND_BUNDLE;

    fn key(id: &str, version: &str) -> ComponentKey {
        ComponentKey::new(KIND_BUNDLE, id, version.parse().unwrap())
    }

    #[test]
    fn lookup_prefers_highest_version() {
        let mut platform = TargetPlatform::new();
        platform.add_artifact_file(key("lib", "1.0.0"), "/m2/lib-1.jar".into(), None);
        platform.add_artifact_file(key("lib", "2.0.0"), "/m2/lib-2.jar".into(), None);
        platform.add_artifact_file(key("lib", "1.5.0"), "/m2/lib-15.jar".into(), None);

        let best = platform.artifact(KIND_BUNDLE, "lib", None).unwrap();
        assert_eq!(best.location(), Path::new("/m2/lib-2.jar"));
        let one = "1.0.0".parse().unwrap();
        let pinned = platform.artifact(KIND_BUNDLE, "lib", Some(&one)).unwrap();
        assert_eq!(pinned.location(), Path::new("/m2/lib-1.jar"));
        assert!(platform.artifact(KIND_BUNDLE, "missing", None).is_none());
    }

    #[test]
    fn reactor_modules_are_listed_once() {
        let gav = Gav::new("g", "a", "1");
        let mut platform = TargetPlatform::new();
        platform.add_reactor_artifact(key("a", "1.0.0"), &gav, Path::new("/ws/a"), None);
        let sources = Some("sources".to_string());
        platform.add_reactor_artifact(key("a.source", "1.0.0"), &gav, Path::new("/ws/a"), sources);
        assert_eq!(platform.reactor_modules(), vec![&gav]);
        assert_eq!(platform.artifacts()[1].classifier(), Some("sources"));
    }
}
