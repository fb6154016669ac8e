//! Reactor manifests: the modules of a build as read from disk.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use super::module::{Packaging, ReactorModule};
use crate::coords::{layout, Gav};
use crate::error::{Error, Result};
use crate::ports::FileSystem;

/// One module entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleEntry {
    /// Coordinates as `group:artifact:version`.
    pub gav: String,
    /// Packaging type.
    pub packaging: Packaging,
    /// Module directory.
    pub basedir: PathBuf,
    /// Build directory, `<basedir>/target` if absent.
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
}

/// The modules of a build in build order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReactorManifest {
    /// Module entries.
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

impl ReactorManifest {
    /// Parses a manifest document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("malformed reactor manifest: {e}")))
    }

    /// Builds the listed modules, reading each one's artifact table from
    /// its build directory.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed coordinates or artifact tables.
    pub fn modules(&self, fs: &dyn FileSystem) -> Result<Vec<ReactorModule>> {
        self.modules
            .iter()
            .map(|entry| {
                let gav: Gav = entry.gav.parse()?;
                let mut module = ReactorModule::new(gav, entry.packaging, &entry.basedir);
                if let Some(build_dir) = &entry.build_dir {
                    module = module.with_build_dir(entry.basedir.join(build_dir));
                }
                read_local_artifacts(&mut module, fs)?;
                Ok(module)
            })
            .collect()
    }
}

/// Attaches the artifacts listed in `<build>/local-artifacts.properties`.
///
/// `artifact.main` names the main artifact and `artifact.attached.<c>`
/// the artifact with classifier `c`. Relative paths are resolved against
/// the build directory. A module without the file has no artifacts yet.
///
/// # Errors
///
/// Returns [`Error::Metadata`] if the file cannot be read or a line is
/// not a `key=value` pair.
pub fn read_local_artifacts(module: &mut ReactorModule, fs: &dyn FileSystem) -> Result<()> {
    let file = module.build_dir().join(layout::FILE_NAME_LOCAL_ARTIFACTS);
    if !fs.is_file(&file) {
        return Ok(());
    }
    let text = fs
        .read_to_string(&file)
        .map_err(|e| Error::Metadata(format!("{}: {e}", file.display())))?;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')) {
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| {
                Error::Metadata(format!("{}: malformed line '{line}'", file.display()))
            })?;
        let path = module.build_dir().join(value.trim());
        match key.trim() {
            layout::KEY_ARTIFACT_MAIN => module.attach_artifact(None, path),
            key => match key.strip_prefix(layout::KEY_ARTIFACT_ATTACHED) {
                Some(classifier) => module.attach_artifact(Some(classifier), path),
                None => debug!(key, file = %file.display(), "ignoring unknown artifact key"),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::testing::MemFs;

    #[test]
    fn reads_modules_with_their_artifacts() {
        let fs = MemFs::new();
        fs.put(
            "/ws/bundle/target/local-artifacts.properties",
            "# written by the build\n\
             artifact.main=/ws/bundle/target/bundle-1.0.0.jar\n\
             artifact.attached.p2metadata=p2content.xml\n",
        );
        let manifest = ReactorManifest::from_yaml(
            "modules:\n\
             \x20 - gav: 'org.example:bundle:1.0.0'\n\
             \x20   packaging: eclipse-plugin\n\
             \x20   basedir: /ws/bundle\n\
             \x20 - gav: 'org.example:site:1.0.0'\n\
             \x20   packaging: eclipse-repository\n\
             \x20   basedir: /ws/site\n\
             \x20   build_dir: out\n",
        )
        .unwrap();

        let modules = manifest.modules(&fs).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].artifacts().len(), 2);
        assert_eq!(modules[0].metadata_file(), Some(Path::new("/ws/bundle/target/p2content.xml")));
        assert_eq!(modules[1].build_dir(), Path::new("/ws/site/out"));
        assert!(modules[1].artifacts().is_empty());
    }

    #[test]
    fn malformed_artifact_table_is_rejected() {
        let fs = MemFs::new();
        fs.put("/ws/a/target/local-artifacts.properties", "artifact.main\n");
        let mut module = ReactorModule::new(Gav::new("g", "a", "1"), Packaging::Plugin, "/ws/a");
        assert!(matches!(read_local_artifacts(&mut module, &fs), Err(Error::Metadata(_))));
    }
}
