//! Metadata repository over a Maven-layout repository index.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::coords::{layout, Gav};
use crate::index::RepositoryIndex;
use crate::metadata::{Requirement, Unit, Version};
use crate::ports::{ContentLocator, MetadataCodec};

/// Units aggregated from the per-module metadata documents of a repository.
///
/// Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct MetadataRepository {
    location: String,
    units: Vec<Unit>,
    by_gav: Vec<(Gav, Vec<Unit>)>,
}

impl MetadataRepository {
    /// Loads the metadata document of every GAV listed in `index`.
    ///
    /// A GAV whose document cannot be fetched or parsed is logged and
    /// skipped; loading continues with the remaining entries.
    pub fn load(
        location: impl Into<String>,
        index: &dyn RepositoryIndex,
        locator: &dyn ContentLocator,
        codec: &dyn MetadataCodec,
    ) -> Self {
        let mut repository = Self {
            location: location.into(),
            ..Self::default()
        };
        let mut seen: HashSet<(String, Version)> = HashSet::new();

        for gav in index.gavs() {
            let units = locator
                .contents(
                    gav,
                    Some(layout::CLASSIFIER_P2_METADATA),
                    Some(layout::EXTENSION_P2_METADATA),
                )
                .and_then(|bytes| codec.read_units(&bytes));
            let units = match units {
                Ok(units) => units,
                Err(e) => {
                    warn!(
                        %gav,
                        location = %repository.location,
                        error = %e,
                        "could not read metadata, skipping"
                    );
                    continue;
                }
            };
            debug!(%gav, count = units.len(), "loaded metadata");
            for unit in &units {
                if seen.insert((unit.id.clone(), unit.version.clone())) {
                    repository.units.push(unit.clone());
                }
            }
            repository.by_gav.push((gav.clone(), units));
        }
        repository
    }

    /// A repository of units that did not come from an indexed layout.
    #[must_use]
    pub fn from_units(location: impl Into<String>, units: Vec<Unit>) -> Self {
        let mut seen = HashSet::new();
        let units = units
            .into_iter()
            .filter(|u| seen.insert((u.id.clone(), u.version.clone())))
            .collect();
        Self {
            location: location.into(),
            units,
            by_gav: Vec::new(),
        }
    }

    /// Where the repository was loaded from.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// All units, in index order, without duplicates.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Units loaded for one GAV, `None` if it was not loaded.
    #[must_use]
    pub fn units_of(&self, gav: &Gav) -> Option<&[Unit]> {
        self.by_gav.iter().find(|(g, _)| g == gav).map(|(_, units)| units.as_slice())
    }

    /// GAVs whose metadata was loaded, in index order.
    pub fn loaded_gavs(&self) -> impl Iterator<Item = &Gav> {
        self.by_gav.iter().map(|(gav, _)| gav)
    }

    /// Units satisfying `requirement`.
    #[must_use]
    pub fn query(&self, requirement: &Requirement) -> Vec<&Unit> {
        self.units.iter().filter(|u| u.satisfies(requirement)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::xml::XmlMetadataCodec;
    use crate::index::MemoryRepositoryIndex;
    use crate::metadata::VersionRange;
    use crate::testing::MemLocator;

    fn publish(locator: &MemLocator, gav: &Gav, units: &[Unit]) {
        let bytes = XmlMetadataCodec.write_units(units).unwrap();
        locator.put(gav, Some("p2metadata"), Some("xml"), &bytes);
    }

    #[test]
    fn unreadable_entry_is_skipped() {
        let good = Gav::new("org.example", "good", "1.0");
        let missing = Gav::new("org.example", "missing", "1.0");
        let corrupt = Gav::new("org.example", "corrupt", "1.0");
        let locator = MemLocator::named("repo");
        publish(
            &locator,
            &good,
            &[
                Unit::new("good", "1.0.0".parse().unwrap()),
                Unit::new("good.util", "1.0.0".parse().unwrap()),
            ],
        );
        locator.put(&corrupt, Some("p2metadata"), Some("xml"), b"<units><unit");
        let mut index = MemoryRepositoryIndex::new();
        for gav in [&missing, &good, &corrupt] {
            index.add(gav.clone()).unwrap();
        }

        let repository = MetadataRepository::load("repo", &index, &locator, &XmlMetadataCodec);

        assert_eq!(repository.units().len(), 2);
        assert_eq!(repository.units_of(&good).map(<[Unit]>::len), Some(2));
        assert_eq!(repository.units_of(&missing), None);
        let total: usize = repository
            .loaded_gavs()
            .filter_map(|g| repository.units_of(g))
            .map(<[Unit]>::len)
            .sum();
        assert_eq!(total, repository.units().len());
    }

    #[test]
    fn query_matches_identity_capability() {
        let repository = MetadataRepository::from_units(
            "mem",
            vec![
                Unit::new("a", "1.0.0".parse().unwrap()),
                Unit::new("a", "2.0.0".parse().unwrap()),
                Unit::new("a", "1.0.0".parse().unwrap()),
            ],
        );
        assert_eq!(repository.units().len(), 2);
        let range: VersionRange = "[2.0.0,3.0.0)".parse().unwrap();
        let hits = repository.query(&Requirement::unit("a", range));
        assert_eq!(hits.len(), 1);
    }
}
