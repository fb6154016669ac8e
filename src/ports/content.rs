//! Content locator port: bytes by repository coordinates.

use crate::coords::{relative_path, Gav};
use crate::error::PortError;

/// Fetches bytes for a GAV, classifier and extension, independent of the
/// backing storage (repository tree, build directory, remote mirror).
pub trait ContentLocator: Send + Sync {
    /// Human-readable location of the backing store, used in log output.
    fn location(&self) -> String;

    /// Reads the content stored at a path relative to the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored there or it cannot be read.
    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, PortError>;

    /// Reads the content of an artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact is absent or cannot be read.
    fn contents(
        &self,
        gav: &Gav,
        classifier: Option<&str>,
        extension: Option<&str>,
    ) -> Result<Vec<u8>, PortError> {
        self.fetch(&relative_path(gav, classifier, extension))
    }
}

/// Opens content locators for repository URLs.
pub trait LocatorFactory: Send + Sync {
    /// Returns `true` if the URL needs network access.
    fn is_remote(&self, url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }

    /// Opens a locator rooted at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not supported.
    fn open(&self, url: &str) -> Result<Box<dyn ContentLocator>, PortError>;
}

impl<T: ContentLocator + ?Sized> ContentLocator for Box<T> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, PortError> {
        (**self).fetch(relative_path)
    }

    fn contents(
        &self,
        gav: &Gav,
        classifier: Option<&str>,
        extension: Option<&str>,
    ) -> Result<Vec<u8>, PortError> {
        (**self).contents(gav, classifier, extension)
    }
}
