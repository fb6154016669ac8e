//! Loading of module-scoped repositories by location.

use std::sync::Arc;

use super::metadata::MetadataRepository;
use super::module::ModuleArtifactRepository;
use super::references::RepositoryReferences;
use crate::coords::layout;
use crate::error::{Error, Result};
use crate::ports::{FileSystem, MetadataCodec};

/// How a repository is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadFlags {
    /// The caller wants to write to the repository.
    pub modifiable: bool,
}

/// Creating module repositories is not supported.
///
/// # Errors
///
/// Always returns [`Error::ContractViolation`].
pub fn create_module_repository(kind: &str, location: &str) -> Result<()> {
    Err(Error::ContractViolation(format!(
        "Cannot create repositories of type {kind} at {location}"
    )))
}

fn verify_read_only(flags: LoadFlags, kind: &str) -> Result<()> {
    if flags.modifiable {
        return Err(Error::ContractViolation(format!(
            "Cannot create writable repositories of type {kind}"
        )));
    }
    Ok(())
}

/// Loads the metadata repository of a module's build directory.
///
/// Returns `Ok(None)` for locations that are not `file:` URIs or that hold
/// no metadata document.
///
/// # Errors
///
/// Returns an error if a writable repository is requested or the document
/// cannot be read.
pub fn load_module_metadata_repository(
    location: &str,
    flags: LoadFlags,
    fs: &dyn FileSystem,
    codec: &dyn MetadataCodec,
) -> Result<Option<MetadataRepository>> {
    let Some(dir) = super::as_file(location) else { return Ok(None) };
    let document = dir.join(layout::FILE_NAME_P2_METADATA);
    if !fs.is_file(&document) {
        return Ok(None);
    }
    verify_read_only(flags, "ModuleMetadataRepository")?;
    let bytes = fs.read(&document).map_err(|e| Error::unavailable(document.display(), e))?;
    let units = codec
        .read_units(&bytes)
        .map_err(|e| Error::Metadata(format!("{}: {e}", document.display())))?;
    Ok(Some(MetadataRepository::from_units(location, units)))
}

/// Loads the artifact repository of a module registered in `references`.
///
/// Returns `Ok(None)` for locations that are not `file:` URIs or that no
/// module registered.
///
/// # Errors
///
/// Returns an error if a writable repository is requested or the module's
/// artifact index cannot be read.
pub fn load_module_artifact_repository(
    location: &str,
    flags: LoadFlags,
    references: &RepositoryReferences,
    fs: Arc<dyn FileSystem>,
    codec: &dyn MetadataCodec,
) -> Result<Option<ModuleArtifactRepository>> {
    let Some(dir) = super::as_file(location) else { return Ok(None) };
    let Some(descriptor) = references.module_descriptor(&dir) else { return Ok(None) };
    verify_read_only(flags, "ModuleArtifactRepository")?;
    ModuleArtifactRepository::open(descriptor.clone(), fs, codec).map(Some)
}
