//! Content locator over a repository tree on a filesystem.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PortError;
use crate::ports::{ContentLocator, FileSystem};

/// Serves artifacts from `<root>/<relative path>`.
pub struct LayoutContentLocator {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl LayoutContentLocator {
    /// Creates a locator rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }
}

impl ContentLocator for LayoutContentLocator {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, PortError> {
        self.fs.read(&self.root.join(relative_path))
    }
}
