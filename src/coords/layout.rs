//! Repository layout conventions shared by every repository view.
//!
//! Artifacts live at
//! `<group-dots-as-slashes>/<artifact>/<version>/<artifact>-<version>[-<classifier>].<extension>`.

use std::collections::BTreeMap;

use super::gav::Gav;

/// Property holding the Maven group id of an artifact or unit.
pub const PROP_GROUP_ID: &str = "maven-groupId";
/// Property holding the Maven artifact id.
pub const PROP_ARTIFACT_ID: &str = "maven-artifactId";
/// Property holding the Maven version.
pub const PROP_VERSION: &str = "maven-version";
/// Property holding the Maven classifier.
pub const PROP_CLASSIFIER: &str = "maven-classifier";
/// Artifact descriptor property naming the storage format.
pub const PROP_FORMAT: &str = "format";
/// Value of [`PROP_FORMAT`] for compressed artifacts.
pub const FORMAT_PACKED: &str = "packed";

/// Classifier of a module's metadata document.
pub const CLASSIFIER_P2_METADATA: &str = "p2metadata";
/// Extension of a module's metadata document.
pub const EXTENSION_P2_METADATA: &str = "xml";
/// File name of the metadata document in a module's build directory.
pub const FILE_NAME_P2_METADATA: &str = "p2content.xml";
/// Classifier of a module's artifact index document.
pub const CLASSIFIER_P2_ARTIFACTS: &str = "p2artifacts";
/// Extension of a module's artifact index document.
pub const EXTENSION_P2_ARTIFACTS: &str = "xml";
/// File name of the artifact index in a module's build directory.
pub const FILE_NAME_P2_ARTIFACTS: &str = "p2artifacts.xml";
/// File name mapping classifiers to files in a module's build directory.
pub const FILE_NAME_LOCAL_ARTIFACTS: &str = "local-artifacts.properties";
/// Key of the main artifact in [`FILE_NAME_LOCAL_ARTIFACTS`].
pub const KEY_ARTIFACT_MAIN: &str = "artifact.main";
/// Key prefix of attached artifacts in [`FILE_NAME_LOCAL_ARTIFACTS`].
pub const KEY_ARTIFACT_ATTACHED: &str = "artifact.attached.";
/// Unit document of a provisioning-format repository.
pub const FILE_NAME_CONTENT: &str = "content.xml";
/// Classifier of source variants.
pub const CLASSIFIER_SOURCES: &str = "sources";

/// Extension used when none is given.
pub const DEFAULT_EXTENSION: &str = "jar";
/// Classifier used for the compressed variant of an archive.
pub const CLASSIFIER_PACKED: &str = "pack200";
/// Extension used for the compressed variant of an archive.
pub const EXTENSION_PACKED: &str = "jar.pack.gz";

/// Computes the canonical relative path of an artifact.
#[must_use]
pub fn relative_path(gav: &Gav, classifier: Option<&str>, extension: Option<&str>) -> String {
    let mut path = String::new();
    for segment in gav.group().split('.').filter(|s| !s.is_empty()) {
        path.push_str(segment);
        path.push('/');
    }
    path.push_str(gav.artifact());
    path.push('/');
    path.push_str(gav.version());
    path.push('/');

    path.push_str(gav.artifact());
    path.push('-');
    path.push_str(gav.version());
    if let Some(classifier) = classifier {
        path.push('-');
        path.push_str(classifier);
    }
    path.push('.');
    path.push_str(extension.unwrap_or(DEFAULT_EXTENSION));
    path
}

/// Coordinates recovered from a canonical relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// The artifact coordinates.
    pub gav: Gav,
    /// Classifier, if the file name carries one.
    pub classifier: Option<String>,
    /// File extension (possibly multi-part, e.g. `jar.pack.gz`).
    pub extension: String,
}

/// Parses a path produced by [`relative_path`] back into its coordinates.
///
/// Returns `None` when the path does not follow the layout convention.
#[must_use]
pub fn parse_relative_path(path: &str) -> Option<ParsedPath> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    if segments.len() < 4 {
        return None;
    }
    let (dirs, rest) = segments.split_at(segments.len() - 3);
    let (artifact, version, file_name) = (rest[0], rest[1], rest[2]);
    if dirs.iter().any(|s| s.is_empty()) {
        return None;
    }

    let stem = format!("{artifact}-{version}");
    let tail = file_name.strip_prefix(&stem)?;
    let (classifier, extension) = if let Some(tail) = tail.strip_prefix('-') {
        let (classifier, extension) = tail.split_once('.')?;
        (Some(classifier.to_string()), extension)
    } else {
        (None, tail.strip_prefix('.')?)
    };
    if extension.is_empty() || classifier.as_deref() == Some("") {
        return None;
    }

    Some(ParsedPath {
        gav: Gav::new(dirs.join("."), artifact, version),
        classifier,
        extension: extension.to_string(),
    })
}

/// Extracts Maven coordinates from artifact or unit properties.
///
/// Returns `None` unless group, artifact, and version are all present, so
/// that artifacts without Maven coordinates are never given made-up ones.
#[must_use]
pub fn extract_gav(properties: &BTreeMap<String, String>) -> Option<Gav> {
    let group = properties.get(PROP_GROUP_ID)?;
    let artifact = properties.get(PROP_ARTIFACT_ID)?;
    let version = properties.get(PROP_VERSION)?;
    Some(Gav::new(group.as_str(), artifact.as_str(), version.as_str()))
}

/// Builds pseudo coordinates for an artifact known only to a p2 repository.
///
/// The group is `p2.<classifier>`, e.g. `p2.osgi.bundle`.
#[must_use]
pub fn synthetic_gav(classifier: &str, id: &str, version: &str) -> Gav {
    Gav::new(format!("p2.{classifier}"), id, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gav() -> Gav {
        Gav::new("org.example.tools", "bundle", "1.2.3-SNAPSHOT")
    }

    #[test]
    fn main_artifact_uses_default_extension() {
        assert_eq!(
            relative_path(&gav(), None, None),
            "org/example/tools/bundle/1.2.3-SNAPSHOT/bundle-1.2.3-SNAPSHOT.jar"
        );
    }

    #[test]
    fn classifier_and_extension_are_appended() {
        assert_eq!(
            relative_path(&gav(), Some(CLASSIFIER_P2_METADATA), Some(EXTENSION_P2_METADATA)),
            "org/example/tools/bundle/1.2.3-SNAPSHOT/bundle-1.2.3-SNAPSHOT-p2metadata.xml"
        );
    }

    #[test]
    fn parsing_recovers_coordinates() {
        for (classifier, extension) in
            [(None, "jar"), (Some("sources"), "jar"), (Some(CLASSIFIER_PACKED), EXTENSION_PACKED)]
        {
            let path = relative_path(&gav(), classifier, Some(extension));
            let parsed = parse_relative_path(&path).unwrap();
            assert_eq!(parsed.gav, gav());
            assert_eq!(parsed.classifier.as_deref(), classifier);
            assert_eq!(parsed.extension, extension);
        }
    }

    #[test]
    fn parsing_rejects_foreign_paths() {
        assert!(parse_relative_path("bundle/1.0/bundle-1.0.jar").is_none());
        assert!(parse_relative_path("org/bundle/1.0/other-1.0.jar").is_none());
        assert!(parse_relative_path("org/bundle/1.0/bundle-1.0").is_none());
    }

    #[test]
    fn extract_gav_requires_all_three_properties() {
        let mut props = BTreeMap::new();
        props.insert(PROP_GROUP_ID.to_string(), "g".to_string());
        props.insert(PROP_ARTIFACT_ID.to_string(), "a".to_string());
        assert_eq!(extract_gav(&props), None);

        props.insert(PROP_VERSION.to_string(), "1".to_string());
        assert_eq!(extract_gav(&props), Some(Gav::new("g", "a", "1")));
    }

    #[test]
    fn synthetic_gav_uses_p2_group() {
        let gav = synthetic_gav("osgi.bundle", "org.junit", "4.8.1");
        assert_eq!(gav.to_string(), "p2.osgi.bundle:org.junit:4.8.1");
        assert_eq!(
            relative_path(&gav, None, None),
            "p2/osgi/bundle/org.junit/4.8.1/org.junit-4.8.1.jar"
        );
    }
}
