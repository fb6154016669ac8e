//! Publisher services and the factory that creates them.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::context::BuildContext;
use super::runtime::PublisherRuntime;
use crate::context::ServiceContext;
use crate::coords::layout::FILE_NAME_CONTENT;
use crate::error::{Error, Result};
use crate::metadata::Unit;
use crate::ports::{FileSystem, IdGenerator, MetadataCodec, PublisherEngine};
use crate::repository::RepositoryReferences;

/// Options of [`PublisherFactory::create_publisher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublisherFlags {
    /// Write the target repository compressed.
    pub compress: bool,
}

/// Creates publisher services, one runtime each.
pub struct PublisherFactory {
    fs: Arc<dyn FileSystem>,
    codec: Arc<dyn MetadataCodec>,
    id_gen: Arc<dyn IdGenerator>,
    engine: Arc<dyn PublisherEngine>,
}

impl PublisherFactory {
    /// Creates a factory running `engine` with the context's ports.
    #[must_use]
    pub fn new(ctx: &ServiceContext, engine: Arc<dyn PublisherEngine>) -> Self {
        Self {
            fs: Arc::clone(&ctx.fs),
            codec: Arc::clone(&ctx.codec),
            id_gen: Arc::clone(&ctx.id_gen),
            engine,
        }
    }

    /// Creates a service publishing into `target_repository`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the runtime's configuration area or the
    /// target repository cannot be created. The runtime is released first.
    pub fn create_publisher(
        &self,
        target_repository: &Path,
        context_repositories: RepositoryReferences,
        build: &BuildContext,
        flags: PublisherFlags,
    ) -> Result<PublisherService> {
        let area = build
            .target_dir()
            .join(format!("p2agent-{}", self.id_gen.generate_id()));
        let runtime = PublisherRuntime::new(
            area,
            target_repository.to_path_buf(),
            context_repositories,
            build.clone(),
            flags.compress,
        );
        let prepared = self
            .fs
            .create_dir_all(runtime.configuration_area())
            .and_then(|()| self.fs.create_dir_all(target_repository));
        if let Err(e) = prepared {
            runtime.release();
            return Err(Error::Io(std::io::Error::other(format!(
                "cannot prepare publisher for {}: {e}",
                target_repository.display()
            ))));
        }
        debug!(area = %runtime.configuration_area().display(), "created publisher runtime");
        Ok(PublisherService {
            runtime: Some(Arc::new(runtime)),
            fs: Arc::clone(&self.fs),
            codec: Arc::clone(&self.codec),
            engine: Arc::clone(&self.engine),
        })
    }

    /// Runs `f` with a fresh publisher and stops it afterwards, also when
    /// `f` fails.
    ///
    /// # Errors
    ///
    /// Returns the creation error or the error returned by `f`.
    pub fn with_publisher<T>(
        &self,
        target_repository: &Path,
        context_repositories: RepositoryReferences,
        build: &BuildContext,
        flags: PublisherFlags,
        f: impl FnOnce(&PublisherService) -> Result<T>,
    ) -> Result<T> {
        let mut service =
            self.create_publisher(target_repository, context_repositories, build, flags)?;
        let outcome = f(&service);
        service.stop();
        outcome
    }
}

/// Publishes build descriptors into a target repository.
///
/// Usable until [`Self::stop`]; afterwards every call fails.
pub struct PublisherService {
    runtime: Option<Arc<PublisherRuntime>>,
    fs: Arc<dyn FileSystem>,
    codec: Arc<dyn MetadataCodec>,
    engine: Arc<dyn PublisherEngine>,
}

impl PublisherService {
    fn running(&self) -> Result<&PublisherRuntime> {
        self.runtime.as_deref().ok_or_else(stopped)
    }

    /// Shared handle on the runtime this service publishes through.
    ///
    /// The handle outlives the service and reports its release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] after [`Self::stop`].
    pub fn runtime(&self) -> Result<Arc<PublisherRuntime>> {
        self.runtime.clone().ok_or_else(stopped)
    }

    /// Publishes a category definition and returns every unit produced.
    ///
    /// The engine does not tell category units from the units they
    /// reference, so the result contains both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] after [`Self::stop`], and
    /// [`Error::Publish`] if the engine fails.
    pub fn publish_categories(&self, category_definition: &Path) -> Result<Vec<Unit>> {
        let runtime = self.running()?;
        let units = self
            .engine
            .publish_categories(runtime, category_definition)
            .map_err(|e| Error::Publish(format!("{}: {e}", category_definition.display())))?;
        self.append(runtime, &units)?;
        info!(
            definition = %category_definition.display(),
            units = units.len(),
            "published categories"
        );
        Ok(units)
    }

    /// Publishes a product definition and returns its product unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] after [`Self::stop`], and
    /// [`Error::Publish`] if the engine fails or produces no unit with the
    /// product's id.
    pub fn publish_product(
        &self,
        product_definition: &Path,
        launcher_binaries: &Path,
        flavor: &str,
    ) -> Result<Unit> {
        let runtime = self.running()?;
        let publication = self
            .engine
            .publish_product(runtime, product_definition, launcher_binaries, flavor)
            .map_err(|e| Error::Publish(format!("{}: {e}", product_definition.display())))?;
        self.append(runtime, &publication.units)?;
        let product_id = publication.product_id;
        publication
            .units
            .into_iter()
            .find(|u| u.id == product_id)
            .ok_or_else(|| {
                Error::Publish(format!(
                    "product publication did not produce product unit {product_id}"
                ))
            })
    }

    /// Adds `units` to the target repository's unit document, keeping what
    /// is already there.
    fn append(&self, runtime: &PublisherRuntime, units: &[Unit]) -> Result<()> {
        let document = runtime.target_repository().join(FILE_NAME_CONTENT);
        let mut merged = if self.fs.is_file(&document) {
            let bytes = self
                .fs
                .read(&document)
                .map_err(|e| Error::unavailable(document.display(), e))?;
            self.codec
                .read_units(&bytes)
                .map_err(|e| Error::Metadata(format!("{}: {e}", document.display())))?
        } else {
            Vec::new()
        };
        for unit in units {
            if !merged.iter().any(|u| u.identity() == unit.identity()) {
                merged.push(unit.clone());
            }
        }
        let bytes = self
            .codec
            .write_units(&merged)
            .map_err(|e| Error::Metadata(e.to_string()))?;
        self.fs.write(&document, &bytes).map_err(|e| {
            Error::Io(std::io::Error::other(format!("{}: {e}", document.display())))
        })
    }

    /// Releases the runtime. Later calls fail; stopping twice is harmless.
    pub fn stop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.release();
        }
    }

    /// Returns `true` once stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.runtime.is_none()
    }
}

impl Drop for PublisherService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn stopped() -> Error {
    Error::ContractViolation("Attempt to access stopped publisher service".to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::error::PortError;
    use crate::platform::TargetEnvironment;
    use crate::ports::ProductPublication;
    use crate::testing::{Fakes, FixedClock};

    #[derive(Default)]
    struct FakeEngine {
        areas: Mutex<Vec<PathBuf>>,
        product_id: Option<String>,
    }

    impl PublisherEngine for FakeEngine {
        fn publish_categories(
            &self,
            runtime: &PublisherRuntime,
            _definition: &Path,
        ) -> std::result::Result<Vec<Unit>, PortError> {
            self.areas.lock().unwrap().push(runtime.configuration_area().to_path_buf());
            Ok(vec![
                Unit::new("category.main", "1.0.0".parse().unwrap()),
                Unit::new("org.example.feature.group", "1.0.0".parse().unwrap()),
            ])
        }

        fn publish_product(
            &self,
            runtime: &PublisherRuntime,
            _definition: &Path,
            _launcher: &Path,
            _flavor: &str,
        ) -> std::result::Result<ProductPublication, PortError> {
            self.areas.lock().unwrap().push(runtime.configuration_area().to_path_buf());
            let Some(product_id) = self.product_id.clone() else {
                return Err("broken product file".into());
            };
            Ok(ProductPublication {
                product_id,
                units: vec![
                    Unit::new("tooling.config", "1.0.0".parse().unwrap()),
                    Unit::new("org.example.product", "1.0.0".parse().unwrap()),
                ],
            })
        }
    }

    fn build() -> BuildContext {
        let linux = TargetEnvironment::new("linux", "gtk", "x86_64");
        BuildContext::new(&FixedClock, "/ws/site/target", vec![linux])
    }

    fn publisher(factory: &PublisherFactory, target: &str) -> PublisherService {
        factory
            .create_publisher(
                Path::new(target),
                RepositoryReferences::new(),
                &build(),
                PublisherFlags::default(),
            )
            .unwrap()
    }

    fn factory(fakes: &Fakes, engine: Arc<FakeEngine>) -> PublisherFactory {
        PublisherFactory::new(&fakes.context(), engine)
    }

    #[test]
    fn categories_return_every_unit_and_append_to_target() {
        let fakes = Fakes::new();
        let engine = Arc::new(FakeEngine::default());
        let factory = factory(&fakes, engine.clone());
        let existing = Unit::new("existing", "1.0.0".parse().unwrap());
        fakes.put_units("/ws/site/target/repository/content.xml", &[existing]);

        let service = publisher(&factory, "/ws/site/target/repository");
        let units = service.publish_categories(Path::new("/ws/site/category.xml")).unwrap();
        assert_eq!(units.len(), 2);

        let written = fakes.fs.get("/ws/site/target/repository/content.xml").unwrap();
        assert!(written.contains("existing"));
        assert!(written.contains("category.main"));
        assert_eq!(
            engine.areas.lock().unwrap()[0],
            PathBuf::from("/ws/site/target/p2agent-id-1")
        );
    }

    #[test]
    fn product_publication_is_reduced_to_the_product_unit() {
        let fakes = Fakes::new();
        let engine = Arc::new(FakeEngine {
            product_id: Some("org.example.product".into()),
            ..FakeEngine::default()
        });
        let factory = factory(&fakes, engine);

        let product = factory
            .with_publisher(
                Path::new("/repo"),
                RepositoryReferences::new(),
                &build(),
                PublisherFlags::default(),
                |svc| {
                    svc.publish_product(Path::new("a.product"), Path::new("/launchers"), "tooling")
                },
            )
            .unwrap();
        assert_eq!(product.id, "org.example.product");
    }

    #[test]
    fn missing_product_unit_is_an_error() {
        let fakes = Fakes::new();
        let engine = Arc::new(FakeEngine {
            product_id: Some("org.other".into()),
            ..FakeEngine::default()
        });
        let service = publisher(&factory(&fakes, engine), "/repo");
        let err = service
            .publish_product(Path::new("a.product"), Path::new("/l"), "tooling")
            .unwrap_err();
        assert!(matches!(err, Error::Publish(ref msg) if msg.contains("org.other")));
    }

    #[test]
    fn dropping_the_service_releases_its_runtime() {
        let fakes = Fakes::new();
        let service = publisher(&factory(&fakes, Arc::new(FakeEngine::default())), "/repo");
        let runtime = service.runtime().unwrap();
        drop(service);
        assert!(runtime.is_released());
    }

    #[test]
    fn stopped_service_rejects_calls() {
        let fakes = Fakes::new();
        let mut service = publisher(&factory(&fakes, Arc::new(FakeEngine::default())), "/repo");
        let runtime = service.runtime().unwrap();
        service.stop();
        service.stop();
        assert!(service.is_stopped());
        assert!(runtime.is_released());
        assert!(service.runtime().is_err());
        let err = service.publish_categories(Path::new("category.xml")).unwrap_err();
        assert!(matches!(
            err,
            Error::ContractViolation(ref msg) if msg.contains("stopped publisher service")
        ));
    }

    #[test]
    fn scoped_publisher_stops_even_on_failure() {
        let fakes = Fakes::new();
        let engine = Arc::new(FakeEngine::default());
        let factory = factory(&fakes, engine.clone());
        let mut used = None;
        let err = factory
            .with_publisher(
                Path::new("/repo"),
                RepositoryReferences::new(),
                &build(),
                PublisherFlags::default(),
                |svc| {
                    let runtime = svc.runtime()?;
                    assert!(!runtime.is_released());
                    used = Some(runtime);
                    svc.publish_product(Path::new("a.product"), Path::new("/l"), "tooling")
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::Publish(_)));
        assert!(used.unwrap().is_released());

        let fresh = publisher(&factory, "/repo");
        fresh.publish_categories(Path::new("category.xml")).unwrap();
        let areas = engine.areas.lock().unwrap();
        assert_ne!(areas[0], areas[1]);
    }
}
