//! Dependency metadata read from a module's build output.

use std::sync::Arc;

use crate::coords::layout;
use crate::error::PortError;
use crate::metadata::Unit;
use crate::platform::TargetEnvironment;
use crate::ports::{DependencyMetadataGenerator, FileSystem, GeneratorRole, MetadataCodec};
use crate::resolver::ReactorModule;

/// Reads `<build dir>/p2content.xml`, written by the module's
/// manifest-processing step, and keeps the units that apply to at least
/// one configured environment.
///
/// A module without the document has no dependency metadata.
pub struct BuildOutputMetadataGenerator {
    fs: Arc<dyn FileSystem>,
    codec: Arc<dyn MetadataCodec>,
}

impl BuildOutputMetadataGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, codec: Arc<dyn MetadataCodec>) -> Self {
        Self { fs, codec }
    }
}

impl DependencyMetadataGenerator for BuildOutputMetadataGenerator {
    fn generate(
        &self,
        module: &ReactorModule,
        environments: &[TargetEnvironment],
        role: GeneratorRole,
    ) -> Result<Vec<Unit>, PortError> {
        let path = module.build_dir().join(layout::FILE_NAME_P2_METADATA);
        if !self.fs.is_file(&path) {
            return Ok(Vec::new());
        }
        let units = self.codec.read_units(&self.fs.read(&path)?)?;
        let properties: Vec<_> = environments.iter().map(TargetEnvironment::properties).collect();
        Ok(units
            .into_iter()
            .filter(|unit| {
                let is_source = unit.maven_classifier() == Some(layout::CLASSIFIER_SOURCES);
                match role {
                    GeneratorRole::DependencyOnly => !is_source,
                    GeneratorRole::SourceBundle => is_source,
                }
            })
            .filter(|unit| properties.is_empty() || properties.iter().any(|p| unit.applies_to(p)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::xml::XmlMetadataCodec;
    use crate::coords::Gav;
    use crate::resolver::Packaging;
    use crate::testing::MemFs;

    #[test]
    fn splits_units_by_role_and_environment() {
        let fs = Arc::new(MemFs::new());
        let units = vec![
            Unit::new("bundle", "1.0.0".parse().unwrap()),
            Unit::new("bundle.source", "1.0.0".parse().unwrap())
                .with_property(layout::PROP_CLASSIFIER, layout::CLASSIFIER_SOURCES),
            Unit::new("bundle.win32", "1.0.0".parse().unwrap())
                .with_filter("(osgi.os=win32)".parse().unwrap()),
        ];
        fs.put("/ws/bundle/target/p2content.xml", XmlMetadataCodec.write_units(&units).unwrap());
        let generator = BuildOutputMetadataGenerator::new(fs, Arc::new(XmlMetadataCodec));
        let module =
            ReactorModule::new(Gav::new("g", "bundle", "1.0.0"), Packaging::Plugin, "/ws/bundle");
        let linux = [TargetEnvironment::new("linux", "gtk", "x86_64")];

        let main = generator.generate(&module, &linux, GeneratorRole::DependencyOnly).unwrap();
        assert_eq!(main.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(), ["bundle"]);
        let sources = generator.generate(&module, &linux, GeneratorRole::SourceBundle).unwrap();
        assert_eq!(sources[0].id, "bundle.source");
    }

    #[test]
    fn missing_document_means_no_metadata() {
        let generator =
            BuildOutputMetadataGenerator::new(Arc::new(MemFs::new()), Arc::new(XmlMetadataCodec));
        let module = ReactorModule::new(Gav::new("g", "a", "1"), Packaging::Plugin, "/ws/a");
        let units = generator.generate(&module, &[], GeneratorRole::DependencyOnly).unwrap();
        assert!(units.is_empty());
    }
}
