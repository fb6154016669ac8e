//! Artifact repository over a Maven-layout repository.

use std::io::Write;

use crate::coords::{layout, relative_path};
use crate::error::{Error, Result};
use crate::metadata::ArtifactDescriptor;
use crate::ports::ContentLocator;

/// Outcome of fetching one artifact.
///
/// Provisioning engines expect a status per artifact, so ordinary failures
/// are reported here instead of as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// The artifact was written to the sink.
    Ok,
    /// The artifact could not be provided.
    Error(String),
}

impl FetchStatus {
    /// Returns `true` for [`FetchStatus::Ok`].
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Read-only access to artifact bytes.
pub trait ArtifactFetch: Send + Sync {
    /// Location of the repository.
    fn location(&self) -> String;

    /// Copies the artifact described by `descriptor` into `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error only for contract violations; unavailable artifacts
    /// yield [`FetchStatus::Error`].
    fn fetch(&self, descriptor: &ArtifactDescriptor, sink: &mut dyn Write) -> Result<FetchStatus>;

    /// Where the artifact is stored, if it can be determined.
    ///
    /// # Errors
    ///
    /// Returns an error for contract violations.
    fn location_of(&self, descriptor: &ArtifactDescriptor) -> Result<Option<String>>;

    /// Opens a sink for writing an artifact. Repositories are read-only.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::ContractViolation`].
    fn output_stream(&self, descriptor: &ArtifactDescriptor) -> Result<Box<dyn Write>> {
        Err(Error::ContractViolation(format!(
            "repository {} is read-only, cannot write {}",
            self.location(),
            descriptor.key
        )))
    }
}

/// Artifacts stored in a full repository tree, addressed by the Maven
/// coordinates embedded in their descriptors.
pub struct FullLayoutArtifactRepository<L> {
    locator: L,
}

impl<L: ContentLocator> FullLayoutArtifactRepository<L> {
    /// Wraps a locator.
    #[must_use]
    pub fn new(locator: L) -> Self {
        Self { locator }
    }

    fn path_of(descriptor: &ArtifactDescriptor) -> Option<String> {
        let gav = descriptor.gav()?;
        let path = if descriptor.is_packed() {
            relative_path(&gav, Some(layout::CLASSIFIER_PACKED), Some(layout::EXTENSION_PACKED))
        } else {
            relative_path(&gav, descriptor.classifier(), None)
        };
        Some(path)
    }
}

fn missing_coordinates(descriptor: &ArtifactDescriptor) -> FetchStatus {
    FetchStatus::Error(format!("Maven coordinates in artifact {} are missing", descriptor.key))
}

impl<L: ContentLocator> ArtifactFetch for FullLayoutArtifactRepository<L> {
    fn location(&self) -> String {
        self.locator.location()
    }

    fn fetch(&self, descriptor: &ArtifactDescriptor, sink: &mut dyn Write) -> Result<FetchStatus> {
        let Some(path) = Self::path_of(descriptor) else {
            return Ok(missing_coordinates(descriptor));
        };
        let written = self
            .locator
            .fetch(&path)
            .and_then(|bytes| sink.write_all(&bytes).map_err(Into::into));
        Ok(match written {
            Ok(()) => FetchStatus::Ok,
            Err(e) => {
                FetchStatus::Error(format!("could not read artifact {}: {e}", descriptor.key))
            }
        })
    }

    fn location_of(&self, descriptor: &ArtifactDescriptor) -> Result<Option<String>> {
        Ok(Self::path_of(descriptor).map(|path| format!("{}/{path}", self.locator.location())))
    }
}
