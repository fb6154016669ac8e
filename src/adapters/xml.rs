//! XML implementation of the `MetadataCodec` port.
//!
//! Unit documents look like:
//!
//! ```text
//! <units size="1">
//!   <unit id="org.example.core" version="1.0.0" singleton="true">
//!     <properties size="1">
//!       <property name="maven-groupId" value="org.example"/>
//!     </properties>
//!     <provides size="1">
//!       <provided namespace="java.package" name="org.example" version="1.0.0"/>
//!     </provides>
//!     <requires size="1">
//!       <required namespace="org.eclipse.equinox.p2.iu" name="dep" range="[1.0.0,2.0.0)"/>
//!     </requires>
//!     <filter>(osgi.os=linux)</filter>
//!     <artifacts size="1">
//!       <artifact classifier="osgi.bundle" id="org.example.core" version="1.0.0"/>
//!     </artifacts>
//!   </unit>
//! </units>
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PortError;
use crate::metadata::{ArtifactDescriptor, Capability, ComponentKey, Requirement, Unit};
use crate::ports::MetadataCodec;

/// Reads and writes metadata documents as XML.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlMetadataCodec;

#[derive(Serialize, Deserialize)]
#[serde(rename = "units")]
struct UnitsDoc {
    #[serde(rename = "@size", default)]
    size: usize,
    #[serde(rename = "unit", default)]
    units: Vec<UnitXml>,
}

#[derive(Serialize, Deserialize)]
struct UnitXml {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@version")]
    version: String,
    #[serde(rename = "@singleton", default)]
    singleton: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<PropertiesXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provides: Option<ProvidesXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requires: Option<RequiresXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifacts: Option<ArtifactKeysXml>,
}

#[derive(Serialize, Deserialize)]
struct PropertiesXml {
    #[serde(rename = "@size", default)]
    size: usize,
    #[serde(rename = "property", default)]
    entries: Vec<PropertyXml>,
}

#[derive(Serialize, Deserialize)]
struct PropertyXml {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Serialize, Deserialize)]
struct ProvidesXml {
    #[serde(rename = "@size", default)]
    size: usize,
    #[serde(rename = "provided", default)]
    entries: Vec<ProvidedXml>,
}

#[derive(Serialize, Deserialize)]
struct ProvidedXml {
    #[serde(rename = "@namespace")]
    namespace: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@version")]
    version: String,
}

#[derive(Serialize, Deserialize)]
struct RequiresXml {
    #[serde(rename = "@size", default)]
    size: usize,
    #[serde(rename = "required", default)]
    entries: Vec<RequiredXml>,
}

#[derive(Serialize, Deserialize)]
struct RequiredXml {
    #[serde(rename = "@namespace")]
    namespace: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@range", default)]
    range: String,
    #[serde(rename = "@optional", default)]
    optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ArtifactKeysXml {
    #[serde(rename = "@size", default)]
    size: usize,
    #[serde(rename = "artifact", default)]
    entries: Vec<ArtifactKeyXml>,
}

#[derive(Serialize, Deserialize)]
struct ArtifactKeyXml {
    #[serde(rename = "@classifier")]
    classifier: String,
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@version")]
    version: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "artifacts")]
struct ArtifactsDoc {
    #[serde(rename = "@size", default)]
    size: usize,
    #[serde(rename = "artifact", default)]
    artifacts: Vec<ArtifactXml>,
}

#[derive(Serialize, Deserialize)]
struct ArtifactXml {
    #[serde(rename = "@classifier")]
    classifier: String,
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@version")]
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<PropertiesXml>,
}

fn properties_to_xml(properties: &BTreeMap<String, String>) -> Option<PropertiesXml> {
    if properties.is_empty() {
        return None;
    }
    Some(PropertiesXml {
        size: properties.len(),
        entries: properties
            .iter()
            .map(|(name, value)| PropertyXml {
                name: name.clone(),
                value: value.clone(),
            })
            .collect(),
    })
}

fn properties_from_xml(properties: Option<PropertiesXml>) -> BTreeMap<String, String> {
    properties
        .map(|p| p.entries.into_iter().map(|e| (e.name, e.value)).collect())
        .unwrap_or_default()
}

fn key_to_xml(key: &ComponentKey) -> ArtifactKeyXml {
    ArtifactKeyXml {
        classifier: key.kind.clone(),
        id: key.id.clone(),
        version: key.version.to_string(),
    }
}

fn unit_to_xml(unit: &Unit) -> UnitXml {
    UnitXml {
        id: unit.id.clone(),
        version: unit.version.to_string(),
        singleton: unit.singleton,
        properties: properties_to_xml(&unit.properties),
        provides: (!unit.provides.is_empty()).then(|| ProvidesXml {
            size: unit.provides.len(),
            entries: unit
                .provides
                .iter()
                .map(|c| ProvidedXml {
                    namespace: c.namespace.clone(),
                    name: c.name.clone(),
                    version: c.version.to_string(),
                })
                .collect(),
        }),
        requires: (!unit.requires.is_empty()).then(|| RequiresXml {
            size: unit.requires.len(),
            entries: unit
                .requires
                .iter()
                .map(|r| RequiredXml {
                    namespace: r.namespace.clone(),
                    name: r.name.clone(),
                    range: r.range.to_string(),
                    optional: r.optional,
                    filter: r.filter.as_ref().map(ToString::to_string),
                })
                .collect(),
        }),
        filter: unit.filter.as_ref().map(ToString::to_string),
        artifacts: (!unit.artifacts.is_empty()).then(|| ArtifactKeysXml {
            size: unit.artifacts.len(),
            entries: unit.artifacts.iter().map(key_to_xml).collect(),
        }),
    }
}

fn unit_from_xml(xml: UnitXml) -> Result<Unit, PortError> {
    let provides = xml
        .provides
        .map(|p| p.entries)
        .unwrap_or_default()
        .into_iter()
        .map(|c| {
            Ok(Capability {
                namespace: c.namespace,
                name: c.name,
                version: c.version.parse()?,
            })
        })
        .collect::<Result<Vec<_>, PortError>>()?;
    let requires = xml
        .requires
        .map(|r| r.entries)
        .unwrap_or_default()
        .into_iter()
        .map(|r| {
            Ok(Requirement {
                namespace: r.namespace,
                name: r.name,
                range: r.range.parse()?,
                optional: r.optional,
                filter: r.filter.map(|f| f.parse()).transpose()?,
            })
        })
        .collect::<Result<Vec<_>, PortError>>()?;
    let artifacts = xml
        .artifacts
        .map(|a| a.entries)
        .unwrap_or_default()
        .into_iter()
        .map(|a| Ok(ComponentKey::new(a.classifier, a.id, a.version.parse()?)))
        .collect::<Result<Vec<_>, PortError>>()?;

    Ok(Unit {
        id: xml.id,
        version: xml.version.parse()?,
        singleton: xml.singleton,
        properties: properties_from_xml(xml.properties),
        provides,
        requires,
        filter: xml.filter.map(|f| f.parse()).transpose()?,
        artifacts,
    })
}

impl MetadataCodec for XmlMetadataCodec {
    fn read_units(&self, bytes: &[u8]) -> Result<Vec<Unit>, PortError> {
        let doc: UnitsDoc = quick_xml::de::from_str(std::str::from_utf8(bytes)?)?;
        doc.units.into_iter().map(unit_from_xml).collect()
    }

    fn write_units(&self, units: &[Unit]) -> Result<Vec<u8>, PortError> {
        let doc = UnitsDoc {
            size: units.len(),
            units: units.iter().map(unit_to_xml).collect(),
        };
        Ok(quick_xml::se::to_string(&doc)?.into_bytes())
    }

    fn read_artifacts(&self, bytes: &[u8]) -> Result<Vec<ArtifactDescriptor>, PortError> {
        let doc: ArtifactsDoc = quick_xml::de::from_str(std::str::from_utf8(bytes)?)?;
        doc.artifacts
            .into_iter()
            .map(|a| {
                Ok(ArtifactDescriptor {
                    key: ComponentKey::new(a.classifier, a.id, a.version.parse()?),
                    properties: properties_from_xml(a.properties),
                })
            })
            .collect()
    }

    fn write_artifacts(&self, artifacts: &[ArtifactDescriptor]) -> Result<Vec<u8>, PortError> {
        let doc = ArtifactsDoc {
            size: artifacts.len(),
            artifacts: artifacts
                .iter()
                .map(|a| ArtifactXml {
                    classifier: a.key.kind.clone(),
                    id: a.key.id.clone(),
                    version: a.key.version.to_string(),
                    properties: properties_to_xml(&a.properties),
                })
                .collect(),
        };
        Ok(quick_xml::se::to_string(&doc)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Gav;
    use crate::metadata::{VersionRange, KIND_BUNDLE};

    fn sample_unit() -> Unit {
        Unit::new("org.example.core", "1.0.0.v2010".parse().unwrap())
            .singleton()
            .with_gav(&Gav::new("org.example", "core", "1.0.0-SNAPSHOT"))
            .with_capability("java.package", "org.example.api", "1.0.0".parse().unwrap())
            .with_requirement(
                Requirement::unit("org.example.dep", "[1.0.0,2.0.0)".parse().unwrap())
                    .with_filter("(osgi.os=linux)".parse().unwrap()),
            )
            .with_requirement(Requirement::unit("org.example.opt", VersionRange::any()).optional())
            .with_filter("(&(osgi.os=linux)(osgi.ws=gtk))".parse().unwrap())
            .with_artifact(KIND_BUNDLE)
    }

    #[test]
    fn units_survive_write_then_read() {
        let codec = XmlMetadataCodec;
        let bytes = codec.write_units(&[sample_unit()]).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("<units"));
        assert!(text.contains("org.example.core"));

        let units = codec.read_units(&bytes).unwrap();
        assert_eq!(units, vec![sample_unit()]);
    }

    #[test]
    fn reads_hand_written_document() {
        let xml = r#"<units size="2">
            <unit id="a" version="1.0.0"/>
            <unit id="b" version="2.0.0">
              <requires size="1">
                <required namespace="org.eclipse.equinox.p2.iu" name="a" range="[1.0.0,1.0.0]"/>
              </requires>
            </unit>
        </units>"#;
        let units = XmlMetadataCodec.read_units(xml.as_bytes()).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].requires[0].name, "a");
        assert!(!units[1].requires[0].optional);
    }

    #[test]
    fn rejects_garbage() {
        assert!(XmlMetadataCodec.read_units(b"<units><unit id=").is_err());
        assert!(XmlMetadataCodec.read_units(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn artifact_index_keeps_properties() {
        let descriptor = ArtifactDescriptor::new(ComponentKey::new(
            KIND_BUNDLE,
            "org.example.core",
            "1.0.0".parse().unwrap(),
        ))
        .with_gav(&Gav::new("org.example", "core", "1.0.0"), Some("sources"));

        let bytes = XmlMetadataCodec.write_artifacts(std::slice::from_ref(&descriptor)).unwrap();
        let read = XmlMetadataCodec.read_artifacts(&bytes).unwrap();
        assert_eq!(read, vec![descriptor]);
    }
}
