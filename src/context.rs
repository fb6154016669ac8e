//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::clock::SystemClock;
use crate::adapters::live::dependencies::LocalRepositoryClosure;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::generator::BuildOutputMetadataGenerator;
use crate::adapters::live::id_gen::UuidGenerator;
use crate::adapters::live::loader::ContentDocumentLoader;
use crate::adapters::live::locators::DefaultLocatorFactory;
use crate::adapters::xml::XmlMetadataCodec;
use crate::ports::{
    Clock, ContentLocator, DependencyClosure, DependencyMetadataGenerator, FileSystem, IdGenerator,
    LocatorFactory, MetadataCodec, RepositoryLoader, Solver,
};
use crate::resolver::GreedySolver;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Ports are shared
/// because repository views and adapters hold on to them.
pub struct ServiceContext {
    /// Filesystem for file I/O.
    pub fs: Arc<dyn FileSystem>,
    /// Reads and writes metadata documents.
    pub codec: Arc<dyn MetadataCodec>,
    /// Opens content locators for repository URLs.
    pub locators: Arc<dyn LocatorFactory>,
    /// Loads provisioning-format repositories.
    pub loader: Arc<dyn RepositoryLoader>,
    /// Solves requirements against available units.
    pub solver: Arc<dyn Solver>,
    /// Computes the closure of ordinary dependency declarations.
    pub closure: Arc<dyn DependencyClosure>,
    /// Generates a module's own dependency metadata.
    pub generator: Arc<dyn DependencyMetadataGenerator>,
    /// Clock for build qualifiers.
    pub clock: Arc<dyn Clock>,
    /// ID generator for runtime configuration areas.
    pub id_gen: Arc<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a live context over the given local repository.
    #[must_use]
    pub fn live(local_repository: &Path) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(LiveFileSystem);
        let codec: Arc<dyn MetadataCodec> = Arc::new(XmlMetadataCodec);
        let locators: Arc<dyn LocatorFactory> =
            Arc::new(DefaultLocatorFactory::new(Arc::clone(&fs)));
        Self {
            loader: Arc::new(ContentDocumentLoader::new(
                Arc::clone(&locators),
                Arc::clone(&codec),
            )),
            solver: Arc::new(GreedySolver),
            closure: Arc::new(LocalRepositoryClosure::new(
                local_repository,
                Arc::clone(&fs),
                Arc::clone(&codec),
            )),
            generator: Arc::new(BuildOutputMetadataGenerator::new(
                Arc::clone(&fs),
                Arc::clone(&codec),
            )),
            clock: Arc::new(SystemClock),
            id_gen: Arc::new(UuidGenerator),
            fs,
            codec,
            locators,
        }
    }

    /// Opens a content locator, mapping failures to an unavailable repository.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RepositoryUnavailable`] if the URL cannot be opened.
    pub fn open_locator(&self, url: &str) -> crate::Result<Box<dyn ContentLocator>> {
        self.locators.open(url).map_err(|e| crate::Error::unavailable(url, e))
    }
}
