//! Component descriptors ("units") and artifact descriptors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::filter::Filter;
use super::version::{Version, VersionRange};
use crate::coords::{layout, Gav};

/// Namespace under which every unit provides its own identity.
pub const IU_NAMESPACE: &str = "org.eclipse.equinox.p2.iu";
/// Artifact kind of plug-in bundles.
pub const KIND_BUNDLE: &str = "osgi.bundle";
/// Artifact kind of features.
pub const KIND_FEATURE: &str = "org.eclipse.update.feature";
/// Artifact kind of opaque binaries.
pub const KIND_BINARY: &str = "binary";

/// A capability offered by a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    /// Capability namespace.
    pub namespace: String,
    /// Capability name.
    pub name: String,
    /// Provided version.
    pub version: Version,
}

/// A requirement on a capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    /// Capability namespace.
    pub namespace: String,
    /// Capability name.
    pub name: String,
    /// Acceptable versions.
    pub range: VersionRange,
    /// Whether resolution may proceed without it.
    #[serde(default)]
    pub optional: bool,
    /// Environments in which the requirement applies.
    #[serde(default)]
    pub filter: Option<Filter>,
}

impl Requirement {
    /// Requirement on a unit by id.
    #[must_use]
    pub fn unit(id: impl Into<String>, range: VersionRange) -> Self {
        Self {
            namespace: IU_NAMESPACE.to_string(),
            name: id.into(),
            range,
            optional: false,
            filter: None,
        }
    }

    /// Marks the requirement optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Restricts the requirement to matching environments.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Returns `true` if the requirement applies under the given properties.
    #[must_use]
    pub fn applies_to(&self, properties: &BTreeMap<String, String>) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(properties))
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.namespace, self.name, self.range)
    }
}

/// Identity of an artifact in the p2 coordinate system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentKey {
    /// Artifact kind, e.g. [`KIND_BUNDLE`].
    pub kind: String,
    /// Component id.
    pub id: String,
    /// Component version.
    pub version: Version,
}

impl ComponentKey {
    /// Creates a key.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>, version: Version) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            version,
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.kind, self.id, self.version)
    }
}

/// A provisioning unit: id, version, capabilities, requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit id.
    pub id: String,
    /// Unit version.
    pub version: Version,
    /// Whether at most one version may be resolved.
    #[serde(default)]
    pub singleton: bool,
    /// Free-form properties (may embed Maven coordinates).
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Capabilities beyond the implicit identity capability.
    #[serde(default)]
    pub provides: Vec<Capability>,
    /// Requirements on other capabilities.
    #[serde(default)]
    pub requires: Vec<Requirement>,
    /// Environments in which the unit is installable.
    #[serde(default)]
    pub filter: Option<Filter>,
    /// Artifacts that back this unit.
    #[serde(default)]
    pub artifacts: Vec<ComponentKey>,
}

impl Unit {
    /// Creates a unit with no requirements.
    #[must_use]
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
            singleton: false,
            properties: BTreeMap::new(),
            provides: Vec::new(),
            requires: Vec::new(),
            filter: None,
            artifacts: Vec::new(),
        }
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds a requirement.
    #[must_use]
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    /// Adds a provided capability.
    #[must_use]
    pub fn with_capability(mut self, namespace: &str, name: &str, version: Version) -> Self {
        self.provides.push(Capability {
            namespace: namespace.to_string(),
            name: name.to_string(),
            version,
        });
        self
    }

    /// Restricts the unit to matching environments.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Marks the unit as singleton.
    #[must_use]
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Adds a backing artifact of the given kind with the unit's id and version.
    #[must_use]
    pub fn with_artifact(mut self, kind: &str) -> Self {
        self.artifacts.push(ComponentKey::new(kind, self.id.clone(), self.version.clone()));
        self
    }

    /// Embeds Maven coordinates as properties.
    #[must_use]
    pub fn with_gav(self, gav: &Gav) -> Self {
        self.with_property(layout::PROP_GROUP_ID, gav.group())
            .with_property(layout::PROP_ARTIFACT_ID, gav.artifact())
            .with_property(layout::PROP_VERSION, gav.version())
    }

    /// Maven coordinates embedded in the properties, if complete.
    #[must_use]
    pub fn gav(&self) -> Option<Gav> {
        layout::extract_gav(&self.properties)
    }

    /// Maven classifier embedded in the properties.
    #[must_use]
    pub fn maven_classifier(&self) -> Option<&str> {
        self.properties.get(layout::PROP_CLASSIFIER).map(String::as_str)
    }

    /// Returns `true` if this unit provides a capability satisfying `req`.
    #[must_use]
    pub fn satisfies(&self, req: &Requirement) -> bool {
        if req.namespace == IU_NAMESPACE
            && req.name == self.id
            && req.range.contains(&self.version)
        {
            return true;
        }
        self.provides.iter().any(|cap| {
            cap.namespace == req.namespace
                && cap.name == req.name
                && req.range.contains(&cap.version)
        })
    }

    /// Returns `true` if the unit is installable under the given properties.
    #[must_use]
    pub fn applies_to(&self, properties: &BTreeMap<String, String>) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(properties))
    }

    /// `(id, version)` identity used for de-duplication.
    #[must_use]
    pub fn identity(&self) -> (&str, &Version) {
        (&self.id, &self.version)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

/// Binds a component key and properties to an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// The artifact's p2 identity.
    pub key: ComponentKey,
    /// Descriptor properties, optionally with Maven coordinates.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ArtifactDescriptor {
    /// Creates a descriptor without properties.
    #[must_use]
    pub fn new(key: ComponentKey) -> Self {
        Self {
            key,
            properties: BTreeMap::new(),
        }
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Embeds Maven coordinates and an optional classifier.
    #[must_use]
    pub fn with_gav(self, gav: &Gav, classifier: Option<&str>) -> Self {
        let descriptor = self
            .with_property(layout::PROP_GROUP_ID, gav.group())
            .with_property(layout::PROP_ARTIFACT_ID, gav.artifact())
            .with_property(layout::PROP_VERSION, gav.version());
        match classifier {
            Some(classifier) => descriptor.with_property(layout::PROP_CLASSIFIER, classifier),
            None => descriptor,
        }
    }

    /// Maven coordinates, present only if all three properties are set.
    #[must_use]
    pub fn gav(&self) -> Option<Gav> {
        layout::extract_gav(&self.properties)
    }

    /// Maven classifier property.
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.properties.get(layout::PROP_CLASSIFIER).map(String::as_str)
    }

    /// Returns `true` for the compressed storage format.
    #[must_use]
    pub fn is_packed(&self) -> bool {
        self.properties.get(layout::PROP_FORMAT).map(String::as_str) == Some(layout::FORMAT_PACKED)
    }
}
