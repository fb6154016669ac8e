//! Opens content locators for local paths, `file:` URLs, and HTTP URLs.

use std::sync::Arc;

use super::http::HttpContentLocator;
use super::layout::LayoutContentLocator;
use crate::error::PortError;
use crate::ports::{ContentLocator, FileSystem, LocatorFactory};

/// Default locator factory: HTTP for remote URLs, filesystem otherwise.
pub struct DefaultLocatorFactory {
    fs: Arc<dyn FileSystem>,
}

impl DefaultLocatorFactory {
    /// Creates a factory whose local locators read through `fs`.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl LocatorFactory for DefaultLocatorFactory {
    fn open(&self, url: &str) -> Result<Box<dyn ContentLocator>, PortError> {
        if self.is_remote(url) {
            return Ok(Box::new(HttpContentLocator::new(url)));
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        if path.contains("://") {
            return Err(format!("unsupported repository URL: {url}").into());
        }
        Ok(Box::new(LayoutContentLocator::new(path, Arc::clone(&self.fs))))
    }
}
