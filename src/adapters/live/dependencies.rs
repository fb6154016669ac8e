//! Dependency closure walked through the POMs of the local repository.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::coords::{layout, relative_path, Gav};
use crate::error::PortError;
use crate::ports::{ClosureArtifact, DependencyClosure, FileSystem, MetadataCodec};

/// Walks declared dependencies and the compile-scope dependencies their
/// POMs record in the local repository.
///
/// Versions left to a parent or to dependency management are not
/// resolved; such edges end the walk.
pub struct LocalRepositoryClosure {
    local_repository: PathBuf,
    fs: Arc<dyn FileSystem>,
    codec: Arc<dyn MetadataCodec>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Pom {
    #[serde(rename = "groupId")]
    group_id: Option<String>,
    version: Option<String>,
    parent: Option<PomParent>,
    dependencies: PomDependencies,
}

#[derive(Deserialize)]
struct PomParent {
    #[serde(rename = "groupId")]
    group_id: Option<String>,
    version: Option<String>,
}

#[derive(Deserialize, Default)]
struct PomDependencies {
    #[serde(rename = "dependency", default)]
    dependency: Vec<PomDependency>,
}

#[derive(Deserialize)]
struct PomDependency {
    #[serde(rename = "groupId")]
    group_id: String,
    #[serde(rename = "artifactId")]
    artifact_id: String,
    version: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
}

impl Pom {
    /// Compile-scope edges with a concrete version, in declaration order.
    fn compile_dependencies(&self, owner: &Gav) -> Vec<Gav> {
        let parent = self.parent.as_ref();
        let project_group = self
            .group_id
            .as_deref()
            .or_else(|| parent.and_then(|p| p.group_id.as_deref()))
            .unwrap_or(owner.group());
        let project_version = self
            .version
            .as_deref()
            .or_else(|| parent.and_then(|p| p.version.as_deref()))
            .unwrap_or(owner.version());
        let expand = |value: &str| match value.trim() {
            "${project.groupId}" | "${pom.groupId}" => Some(project_group.to_string()),
            "${project.version}" | "${pom.version}" => Some(project_version.to_string()),
            v if v.contains("${") => None,
            v => Some(v.to_string()),
        };

        self.dependencies
            .dependency
            .iter()
            .filter(|d| matches!(d.scope.as_deref().map(str::trim), None | Some("compile")))
            .filter(|d| d.optional.as_deref().map(str::trim) != Some("true"))
            .filter_map(|d| {
                let group = expand(&d.group_id);
                let version = d.version.as_deref().and_then(expand);
                match (group, version) {
                    (Some(group), Some(version)) => {
                        Some(Gav::new(group, d.artifact_id.trim(), version))
                    }
                    _ => {
                        debug!(%owner, artifact = %d.artifact_id, "unresolved dependency version");
                        None
                    }
                }
            })
            .collect()
    }
}

impl LocalRepositoryClosure {
    /// Creates a closure over the repository at `local_repository`.
    #[must_use]
    pub fn new(
        local_repository: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        codec: Arc<dyn MetadataCodec>,
    ) -> Self {
        Self {
            local_repository: local_repository.into(),
            fs,
            codec,
        }
    }

    fn file(&self, gav: &Gav, classifier: Option<&str>, extension: Option<&str>) -> PathBuf {
        self.local_repository.join(relative_path(gav, classifier, extension))
    }

    fn artifact(&self, gav: &Gav) -> Result<ClosureArtifact, PortError> {
        let file = self.file(gav, None, None);
        let metadata = self.file(
            gav,
            Some(layout::CLASSIFIER_P2_METADATA),
            Some(layout::EXTENSION_P2_METADATA),
        );
        let units = if self.fs.is_file(&metadata) {
            self.codec.read_units(&self.fs.read(&metadata)?)?
        } else {
            Vec::new()
        };
        Ok(ClosureArtifact {
            gav: gav.clone(),
            file: self.fs.is_file(&file).then_some(file),
            units,
        })
    }

    fn dependencies_of(&self, gav: &Gav) -> Result<Vec<Gav>, PortError> {
        let pom = self.file(gav, None, Some("pom"));
        if !self.fs.is_file(&pom) {
            return Ok(Vec::new());
        }
        let text = String::from_utf8(self.fs.read(&pom)?)?;
        let parsed: Pom = quick_xml::de::from_str(&text)
            .map_err(|e| format!("{}: {e}", pom.display()))?;
        Ok(parsed.compile_dependencies(gav))
    }
}

impl DependencyClosure for LocalRepositoryClosure {
    fn compile_closure(
        &self,
        module: &Gav,
        declared: &[Gav],
    ) -> Result<Vec<ClosureArtifact>, PortError> {
        let mut seen: HashSet<Gav> = HashSet::from([module.clone()]);
        let mut queue: VecDeque<Gav> =
            declared.iter().filter(|g| seen.insert((*g).clone())).cloned().collect();
        let mut closure = Vec::new();

        while let Some(gav) = queue.pop_front() {
            let artifact = self.artifact(&gav)?;
            if artifact.file.is_some() {
                for next in self.dependencies_of(&gav)? {
                    if seen.insert(next.clone()) {
                        queue.push_back(next);
                    }
                }
            }
            closure.push(artifact);
        }
        debug!(%module, artifacts = closure.len(), "computed dependency closure");
        Ok(closure)
    }
}
