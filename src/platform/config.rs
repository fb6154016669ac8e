//! Target platform configuration of one module, read from YAML.
//!
//! ```yaml
//! environments:
//!   - { os: linux, ws: gtk, arch: x86_64 }
//!   - { os: win32, ws: win32, arch: x86 }
//! pom_dependencies: consider
//! repositories:
//!   - { id: galileo, url: "https://download.example.org/releases/galileo", layout: p2 }
//! target:
//!   locations:
//!     - type: InstallableUnit
//!       repositories: [{ location: "https://download.example.org/orbit" }]
//!       units: [{ id: org.junit, version: 4.8.1 }]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::environment::TargetEnvironment;
use crate::error::{Error, Result};
use crate::ports::FileSystem;

/// Which resolver computes the target platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverStrategy {
    /// Reactor, declared repositories, and target definition.
    #[default]
    P2,
    /// Reactor and the local repository only.
    Local,
}

/// Whether ordinary dependency declarations join the target platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomDependencies {
    /// Ignore them.
    #[default]
    Ignore,
    /// Add their compile-scope closure.
    Consider,
}

/// Physical layout of a declared repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryLayout {
    /// Maven layout with an index of published modules.
    #[default]
    Default,
    /// Provisioning-format repository.
    P2,
}

/// A repository declared by the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository id.
    pub id: String,
    /// Repository URL.
    pub url: String,
    /// Physical layout.
    #[serde(default)]
    pub layout: RepositoryLayout,
}

/// A mirror replacing repositories by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Mirror id.
    pub id: String,
    /// Id of the mirrored repository, or `*` for all.
    pub mirror_of: String,
    /// Mirror URL.
    pub url: String,
}

/// Kind of an explicit dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    /// A plug-in bundle.
    #[serde(rename = "eclipse-plugin")]
    Plugin,
    /// A feature.
    #[serde(rename = "eclipse-feature")]
    Feature,
    /// Any unit by id.
    #[serde(rename = "p2-installable-unit")]
    InstallableUnit,
}

/// An explicit dependency on a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Kind of the component.
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    /// Component id.
    pub id: String,
    /// Exact version; absent or `0.0.0` means any.
    #[serde(default)]
    pub version: Option<String>,
}

/// A repository inside a target definition location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRepository {
    /// Optional id, used for mirror lookup.
    #[serde(default)]
    pub id: Option<String>,
    /// Repository URL.
    pub location: String,
}

/// A unit pinned by a target definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUnit {
    /// Unit id.
    pub id: String,
    /// Exact version.
    pub version: String,
}

/// One location of a target definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLocation {
    /// Location type; only `InstallableUnit` is supported.
    #[serde(rename = "type")]
    pub kind: String,
    /// Repositories of the location.
    #[serde(default)]
    pub repositories: Vec<TargetRepository>,
    /// Units required from them.
    #[serde(default)]
    pub units: Vec<TargetUnit>,
}

impl TargetLocation {
    /// Returns `true` for locations the resolver understands.
    #[must_use]
    pub fn is_installable_unit(&self) -> bool {
        self.kind.eq_ignore_ascii_case("InstallableUnit")
    }
}

/// External target definition: repositories plus pinned units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Locations in declaration order.
    #[serde(default)]
    pub locations: Vec<TargetLocation>,
}

impl TargetDefinition {
    /// Parses a target definition document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("malformed target definition: {e}")))
    }
}

/// Build settings that shape a module's target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetPlatformConfiguration {
    /// Environments to resolve for, in order.
    pub environments: Vec<TargetEnvironment>,
    /// Single-environment form, superseded by `environments`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<TargetEnvironment>,
    /// Resolver selection.
    pub resolver: ResolverStrategy,
    /// Treatment of ordinary dependency declarations.
    pub pom_dependencies: PomDependencies,
    /// Conflict tolerance, honoured for aggregator modules only.
    pub allow_conflicting_dependencies: Option<bool>,
    /// Skip Maven-layout repositories when collecting inputs.
    pub ignore_maven_repositories: bool,
    /// Declared repositories in precedence order.
    pub repositories: Vec<RepositoryConfig>,
    /// Repository mirrors.
    pub mirrors: Vec<MirrorConfig>,
    /// Explicit component dependencies.
    pub dependencies: Vec<DependencySpec>,
    /// Ordinary dependency declarations, considered with `pom_dependencies: consider`.
    pub pom_dependency_list: Vec<String>,
    /// Whether the module attaches a source bundle.
    pub source_bundle: bool,
    /// Inline target definition.
    pub target: Option<TargetDefinition>,
    /// Target definition file, relative to the module directory.
    pub target_file: Option<PathBuf>,
    #[serde(skip)]
    implicit_environment: bool,
}

impl Default for TargetPlatformConfiguration {
    fn default() -> Self {
        Self {
            environments: Vec::new(),
            environment: None,
            resolver: ResolverStrategy::default(),
            pom_dependencies: PomDependencies::default(),
            allow_conflicting_dependencies: None,
            ignore_maven_repositories: true,
            repositories: Vec::new(),
            mirrors: Vec::new(),
            dependencies: Vec::new(),
            pom_dependency_list: Vec::new(),
            source_bundle: false,
            target: None,
            target_file: None,
            implicit_environment: false,
        }
    }
}

impl TargetPlatformConfiguration {
    /// Parses a configuration and applies defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML or when both
    /// `environment` and `environments` are given.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("malformed target platform configuration: {e}")))?;
        config.normalized()
    }

    /// Loads a configuration file, resolving `target_file` against its
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    pub fn load(path: &Path, fs: &dyn FileSystem) -> Result<Self> {
        let text = fs
            .read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::from_yaml(&text)?;
        if let Some(file) = config.target_file.take() {
            let file = path.parent().map_or(file.clone(), |dir| dir.join(&file));
            let text = fs
                .read_to_string(&file)
                .map_err(|e| {
                    Error::Config(format!("cannot read target definition {}: {e}", file.display()))
                })?;
            config.target = Some(TargetDefinition::from_yaml(&text)?);
        }
        Ok(config)
    }

    /// Applies the environment defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when both environment forms are given.
    pub fn normalized(mut self) -> Result<Self> {
        if let Some(environment) = self.environment.take() {
            if !self.environments.is_empty() {
                return Err(Error::Config(
                    "'environment' must not be combined with 'environments'".to_string(),
                ));
            }
            warn!("'environment' is deprecated, use 'environments' instead");
            self.environments.push(environment);
        }
        self.implicit_environment = self.environments.is_empty();
        if self.implicit_environment {
            warn!(
                "No explicit target runtime environment configuration. Build is platform dependent."
            );
            self.environments.push(TargetEnvironment::host());
        }
        Ok(self)
    }

    /// Environments to resolve for; never empty after normalization.
    #[must_use]
    pub fn environments(&self) -> &[TargetEnvironment] {
        &self.environments
    }

    /// Returns `true` if the host environment was substituted.
    #[must_use]
    pub fn is_implicit_environment(&self) -> bool {
        self.implicit_environment
    }

    /// URL to use for a repository, honouring mirrors.
    #[must_use]
    pub fn mirror_url(&self, id: &str, url: &str) -> String {
        self.mirrors
            .iter()
            .find(|m| m.mirror_of == id)
            .or_else(|| self.mirrors.iter().find(|m| m.mirror_of == "*"))
            .map_or_else(|| url.to_string(), |m| m.url.clone())
    }
}
