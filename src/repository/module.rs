//! Repositories backed by a module's build output directory.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::artifact::{ArtifactFetch, FetchStatus};
use crate::coords::{layout, parse_relative_path, Gav};
use crate::error::{Error, PortError, Result};
use crate::metadata::{ArtifactDescriptor, ComponentKey};
use crate::ports::{ContentLocator, FileSystem, MetadataCodec};

/// Layout of one module's build output: classifier to file.
///
/// The `None` classifier is the main artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArtifactDescriptor {
    /// Logical location of the repository, usually the build directory.
    pub location: PathBuf,
    /// Coordinates of the module.
    pub gav: Gav,
    /// Files of the module's artifacts by classifier.
    pub artifacts: BTreeMap<Option<String>, PathBuf>,
}

impl ModuleArtifactDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(
        location: impl Into<PathBuf>,
        gav: Gav,
        artifacts: BTreeMap<Option<String>, PathBuf>,
    ) -> Self {
        Self {
            location: location.into(),
            gav,
            artifacts,
        }
    }

    /// Repository location as a `file:` URI.
    #[must_use]
    pub fn uri(&self) -> String {
        super::file_uri(&self.location)
    }
}

/// Serves exactly one module's artifacts from its classifier table.
pub struct ClassifierMapLocator {
    descriptor: ModuleArtifactDescriptor,
    fs: Arc<dyn FileSystem>,
}

impl ClassifierMapLocator {
    /// Creates a locator over `descriptor`.
    #[must_use]
    pub fn new(descriptor: ModuleArtifactDescriptor, fs: Arc<dyn FileSystem>) -> Self {
        Self { descriptor, fs }
    }

    /// File of the module's artifact with `classifier`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] when `gav` is not this module's,
    /// or when the classifier is not in the table.
    pub fn file_for(&self, gav: &Gav, classifier: Option<&str>) -> Result<&Path> {
        if gav != &self.descriptor.gav {
            return Err(Error::ContractViolation(format!(
                "artifact repository of module {} cannot contain artifact {gav}:{}",
                self.descriptor.gav,
                classifier.unwrap_or_default()
            )));
        }
        self.descriptor
            .artifacts
            .get(&classifier.map(str::to_string))
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                Error::ContractViolation(format!(
                    "classifier {} is missing in descriptor of module {}",
                    classifier.unwrap_or("<main>"),
                    self.descriptor.gav
                ))
            })
    }
}

impl ContentLocator for ClassifierMapLocator {
    fn location(&self) -> String {
        self.descriptor.uri()
    }

    fn fetch(&self, relative_path: &str) -> std::result::Result<Vec<u8>, PortError> {
        let parsed = parse_relative_path(relative_path)
            .ok_or_else(|| format!("not a repository path: {relative_path}"))?;
        self.contents(&parsed.gav, parsed.classifier.as_deref(), Some(&parsed.extension))
    }

    fn contents(
        &self,
        gav: &Gav,
        classifier: Option<&str>,
        _extension: Option<&str>,
    ) -> std::result::Result<Vec<u8>, PortError> {
        let file = self.file_for(gav, classifier)?;
        self.fs.read(file)
    }
}

/// A module's build output exposed as a read-only artifact repository.
pub struct ModuleArtifactRepository {
    locator: ClassifierMapLocator,
    descriptors: Vec<ArtifactDescriptor>,
}

impl ModuleArtifactRepository {
    /// Opens the repository, reading the module's artifact index document.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact index is missing or unreadable.
    pub fn open(
        descriptor: ModuleArtifactDescriptor,
        fs: Arc<dyn FileSystem>,
        codec: &dyn MetadataCodec,
    ) -> Result<Self> {
        let gav = descriptor.gav.clone();
        let locator = ClassifierMapLocator::new(descriptor, fs);
        let index_file = locator.file_for(&gav, Some(layout::CLASSIFIER_P2_ARTIFACTS))?;
        let bytes = locator
            .fs
            .read(index_file)
            .map_err(|e| Error::unavailable(index_file.display(), e))?;
        let descriptors = codec
            .read_artifacts(&bytes)
            .map_err(|e| Error::Metadata(format!("artifact index of {gav}: {e}")))?;
        debug!(%gav, artifacts = descriptors.len(), "opened module artifact repository");
        Ok(Self {
            locator,
            descriptors,
        })
    }

    /// Coordinates of the module.
    #[must_use]
    pub fn gav(&self) -> &Gav {
        &self.locator.descriptor.gav
    }

    /// Artifact descriptors listed in the module's artifact index.
    #[must_use]
    pub fn descriptors(&self) -> &[ArtifactDescriptor] {
        &self.descriptors
    }

    /// Returns `true` if the module publishes an artifact with `key`.
    #[must_use]
    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.descriptors.iter().any(|d| &d.key == key)
    }
}

impl ArtifactFetch for ModuleArtifactRepository {
    fn location(&self) -> String {
        self.locator.location()
    }

    fn fetch(&self, descriptor: &ArtifactDescriptor, sink: &mut dyn Write) -> Result<FetchStatus> {
        let Some(gav) = descriptor.gav() else {
            return Ok(FetchStatus::Error(format!(
                "Maven coordinates in artifact {} are missing",
                descriptor.key
            )));
        };
        let file = self.locator.file_for(&gav, descriptor.classifier())?;
        let copied = self
            .locator
            .fs
            .read(file)
            .and_then(|bytes| sink.write_all(&bytes).map_err(Into::into));
        Ok(match copied {
            Ok(()) => FetchStatus::Ok,
            Err(e) => FetchStatus::Error(format!(
                "I/O exception while reading artifact {}: {e}",
                descriptor.key
            )),
        })
    }

    fn location_of(&self, descriptor: &ArtifactDescriptor) -> Result<Option<String>> {
        let Some(gav) = descriptor.gav() else { return Ok(None) };
        let file = self.locator.file_for(&gav, descriptor.classifier())?;
        Ok(Some(file.display().to_string()))
    }
}
