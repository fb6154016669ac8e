//! Reactor modules and the build session they share.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coords::{layout, Gav};
use crate::error::Error;
use crate::index::IndexCache;
use crate::metadata::{Unit, KIND_BINARY, KIND_BUNDLE, KIND_FEATURE};
use crate::repository::ModuleArtifactDescriptor;

/// Packaging type of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Packaging {
    /// A plug-in bundle.
    #[serde(rename = "eclipse-plugin")]
    Plugin,
    /// A test plug-in bundle.
    #[serde(rename = "eclipse-test-plugin")]
    TestPlugin,
    /// A feature.
    #[serde(rename = "eclipse-feature")]
    Feature,
    /// An update site assembled from features.
    #[serde(rename = "eclipse-update-site")]
    UpdateSite,
    /// A repository with categories and products.
    #[serde(rename = "eclipse-repository")]
    Repository,
    /// Anything else.
    #[serde(rename = "pom")]
    Other,
}

impl Packaging {
    /// Artifact kind of the module's main artifact.
    #[must_use]
    pub fn artifact_kind(self) -> &'static str {
        match self {
            Self::Plugin | Self::TestPlugin => KIND_BUNDLE,
            Self::Feature => KIND_FEATURE,
            Self::UpdateSite | Self::Repository | Self::Other => KIND_BINARY,
        }
    }

    /// Returns `true` for modules producing a bundle.
    #[must_use]
    pub fn is_bundle(self) -> bool {
        matches!(self, Self::Plugin | Self::TestPlugin)
    }

    /// Returns `true` for modules whose build output other modules read
    /// as a repository.
    #[must_use]
    pub fn publishes_module_repository(self) -> bool {
        matches!(self, Self::Plugin | Self::TestPlugin | Self::Feature)
    }

    /// Returns `true` for aggregator modules that may deliberately bundle
    /// conflicting versions.
    #[must_use]
    pub fn may_tolerate_conflicts(self) -> bool {
        matches!(self, Self::Feature | Self::UpdateSite)
    }
}

impl FromStr for Packaging {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s.trim())
            .map_err(|_| Error::Config(format!("unknown packaging '{s}'")))
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plugin => "eclipse-plugin",
            Self::TestPlugin => "eclipse-test-plugin",
            Self::Feature => "eclipse-feature",
            Self::UpdateSite => "eclipse-update-site",
            Self::Repository => "eclipse-repository",
            Self::Other => "pom",
        })
    }
}

/// A module of the current build, as seen by modules built after it.
///
/// Exposes the module's artifact-by-classifier table and the dependency
/// metadata computed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorModule {
    gav: Gav,
    packaging: Packaging,
    basedir: PathBuf,
    build_dir: PathBuf,
    artifacts: BTreeMap<Option<String>, PathBuf>,
    dependency_metadata: BTreeMap<Option<String>, Vec<Unit>>,
}

impl ReactorModule {
    /// Creates a module building into `<basedir>/target`.
    #[must_use]
    pub fn new(gav: Gav, packaging: Packaging, basedir: impl Into<PathBuf>) -> Self {
        let basedir = basedir.into();
        Self {
            build_dir: basedir.join("target"),
            gav,
            packaging,
            basedir,
            artifacts: BTreeMap::new(),
            dependency_metadata: BTreeMap::new(),
        }
    }

    /// Overrides the build directory.
    #[must_use]
    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    /// Coordinates.
    #[must_use]
    pub fn gav(&self) -> &Gav {
        &self.gav
    }

    /// Packaging.
    #[must_use]
    pub fn packaging(&self) -> Packaging {
        self.packaging
    }

    /// Module directory.
    #[must_use]
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Build output directory.
    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Records a produced artifact; `None` is the main artifact.
    pub fn attach_artifact(&mut self, classifier: Option<&str>, file: impl Into<PathBuf>) {
        self.artifacts.insert(classifier.map(str::to_string), file.into());
    }

    /// Produced artifacts by classifier.
    #[must_use]
    pub fn artifacts(&self) -> &BTreeMap<Option<String>, PathBuf> {
        &self.artifacts
    }

    /// Sets the dependency metadata of one classifier.
    pub fn set_dependency_metadata(&mut self, classifier: Option<&str>, units: Vec<Unit>) {
        self.dependency_metadata.insert(classifier.map(str::to_string), units);
    }

    /// Dependency metadata by classifier.
    #[must_use]
    pub fn dependency_metadata(&self) -> &BTreeMap<Option<String>, Vec<Unit>> {
        &self.dependency_metadata
    }

    /// All units of the module across classifiers.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.dependency_metadata.values().flatten()
    }

    /// File of the module's metadata document, if produced.
    #[must_use]
    pub fn metadata_file(&self) -> Option<&Path> {
        self.artifacts
            .get(&Some(layout::CLASSIFIER_P2_METADATA.to_string()))
            .map(PathBuf::as_path)
    }

    /// The module's build output as a repository descriptor.
    #[must_use]
    pub fn artifact_descriptor(&self) -> ModuleArtifactDescriptor {
        ModuleArtifactDescriptor::new(&self.build_dir, self.gav.clone(), self.artifacts.clone())
    }
}

/// Settings and shared state of one build.
pub struct BuildSession {
    /// Mandatory local repository.
    pub local_repository: PathBuf,
    /// Skip remote repositories.
    pub offline: bool,
    /// Modules of the build, in build order.
    pub modules: Vec<ReactorModule>,
    /// Indexes of remote repositories, loaded once per session.
    pub index_cache: Arc<IndexCache>,
}

impl BuildSession {
    /// Creates a session without modules.
    #[must_use]
    pub fn new(local_repository: impl Into<PathBuf>) -> Self {
        Self {
            local_repository: local_repository.into(),
            offline: false,
            modules: Vec::new(),
            index_cache: Arc::new(IndexCache::new()),
        }
    }

    /// Module with the given coordinates.
    #[must_use]
    pub fn module(&self, gav: &Gav) -> Option<&ReactorModule> {
        self.modules.iter().find(|m| m.gav() == gav)
    }

    /// Module whose directory is `location`.
    #[must_use]
    pub fn module_at(&self, location: &Path) -> Option<&ReactorModule> {
        self.modules.iter().find(|m| m.basedir() == location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaging_round_trips_through_its_name() {
        let parsed: Packaging = serde_yaml::from_str("eclipse-update-site").unwrap();
        assert_eq!(parsed, Packaging::UpdateSite);
        assert_eq!(parsed.to_string(), "eclipse-update-site");
        assert!(parsed.may_tolerate_conflicts());
        assert_eq!("eclipse-feature".parse::<Packaging>().unwrap(), Packaging::Feature);
        assert!("war".parse::<Packaging>().is_err());
        assert!(!Packaging::Plugin.may_tolerate_conflicts());
        assert_eq!(Packaging::TestPlugin.artifact_kind(), KIND_BUNDLE);
    }

    #[test]
    fn descriptor_exposes_classifier_table() {
        let mut module = ReactorModule::new(Gav::new("g", "a", "1"), Packaging::Plugin, "/ws/a");
        module.attach_artifact(None, "/ws/a/target/a.jar");
        module.attach_artifact(Some("p2metadata"), "/ws/a/target/p2content.xml");

        let descriptor = module.artifact_descriptor();
        assert_eq!(descriptor.location, PathBuf::from("/ws/a/target"));
        assert_eq!(descriptor.artifacts.len(), 2);
        assert_eq!(module.metadata_file(), Some(Path::new("/ws/a/target/p2content.xml")));
    }

    #[test]
    fn session_finds_modules_by_gav_and_location() {
        let mut session = BuildSession::new("/m2");
        let gav = Gav::new("g", "a", "1");
        session.modules.push(ReactorModule::new(gav, Packaging::Feature, "/ws/a"));
        assert!(session.module(&Gav::new("g", "a", "1")).is_some());
        assert!(session.module_at(Path::new("/ws/a")).is_some());
        assert!(session.module_at(Path::new("/ws/b")).is_none());
    }
}
