//! Metadata codec port for reading and writing provisioning documents.

use crate::error::PortError;
use crate::metadata::{ArtifactDescriptor, Unit};

/// Converts between metadata documents and in-memory descriptors.
///
/// The document schema belongs to the provisioning system; implementations
/// only have to round-trip what they write.
pub trait MetadataCodec: Send + Sync {
    /// Parses a unit document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid unit document.
    fn read_units(&self, bytes: &[u8]) -> Result<Vec<Unit>, PortError>;

    /// Serializes units into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn write_units(&self, units: &[Unit]) -> Result<Vec<u8>, PortError>;

    /// Parses an artifact index document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid artifact index.
    fn read_artifacts(&self, bytes: &[u8]) -> Result<Vec<ArtifactDescriptor>, PortError>;

    /// Serializes artifact descriptors into an index document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn write_artifacts(&self, artifacts: &[ArtifactDescriptor]) -> Result<Vec<u8>, PortError>;
}
