//! Publisher engine port: turns build descriptors into units.

use std::path::Path;

use crate::error::PortError;
use crate::metadata::Unit;
use crate::publisher::PublisherRuntime;

/// Units produced by publishing a product definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPublication {
    /// Id declared by the product definition.
    pub product_id: String,
    /// Every unit the engine produced, root and members alike.
    pub units: Vec<Unit>,
}

/// Runs publisher actions inside an isolated runtime.
pub trait PublisherEngine: Send + Sync {
    /// Publishes a category definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be parsed or published.
    fn publish_categories(
        &self,
        runtime: &PublisherRuntime,
        category_definition: &Path,
    ) -> Result<Vec<Unit>, PortError>;

    /// Publishes a product definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be parsed or published.
    fn publish_product(
        &self,
        runtime: &PublisherRuntime,
        product_definition: &Path,
        launcher_binaries: &Path,
        flavor: &str,
    ) -> Result<ProductPublication, PortError>;
}
