//! Loads provisioning-format repositories from their `content.xml`.

use std::sync::Arc;

use crate::coords::layout::FILE_NAME_CONTENT;
use crate::error::PortError;
use crate::metadata::Unit;
use crate::ports::{LocatorFactory, MetadataCodec, RepositoryLoader};

/// Reads `<url>/content.xml` through a [`LocatorFactory`].
pub struct ContentDocumentLoader {
    locators: Arc<dyn LocatorFactory>,
    codec: Arc<dyn MetadataCodec>,
}

impl ContentDocumentLoader {
    /// Creates a loader.
    #[must_use]
    pub fn new(locators: Arc<dyn LocatorFactory>, codec: Arc<dyn MetadataCodec>) -> Self {
        Self { locators, codec }
    }
}

impl RepositoryLoader for ContentDocumentLoader {
    fn load_units(&self, url: &str) -> Result<Vec<Unit>, PortError> {
        let locator = self.locators.open(url)?;
        let bytes = locator.fetch(FILE_NAME_CONTENT)?;
        self.codec.read_units(&bytes)
    }
}
