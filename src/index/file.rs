//! Repository index persisted as a properties file under the repository root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{parse_index, RepositoryIndex};
use crate::coords::Gav;
use crate::error::{Error, Result};
use crate::ports::FileSystem;

/// Location of the index file relative to the repository root.
pub const INDEX_PATH: &str = ".meta/p2-local-metadata.properties";

/// Index persisted as a plain-text file in the repository.
///
/// New entries are appended; existing lines are never rewritten.
pub struct FileRepositoryIndex {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    gavs: Vec<Gav>,
}

impl FileRepositoryIndex {
    /// Opens the index of the repository rooted at `repository`.
    ///
    /// A repository without an index file has an empty index.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(repository: &Path, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let path = repository.join(INDEX_PATH);
        let gavs = if fs.is_file(&path) {
            let text = fs
                .read_to_string(&path)
                .map_err(|e| Error::unavailable(path.display(), e))?;
            parse_index(&text)?
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), entries = gavs.len(), "opened repository index");
        Ok(Self { path, fs, gavs })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RepositoryIndex for FileRepositoryIndex {
    fn gavs(&self) -> &[Gav] {
        &self.gavs
    }

    fn add(&mut self, gav: Gav) -> Result<bool> {
        if self.contains(&gav) {
            return Ok(false);
        }
        self.fs
            .append(&self.path, format!("{gav}\n").as_bytes())
            .map_err(|e| Error::unavailable(self.path.display(), e))?;
        self.gavs.push(gav);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemFs;

    #[test]
    fn appends_in_insertion_order_without_duplicates() {
        let fs = Arc::new(MemFs::new());
        let mut index = FileRepositoryIndex::open(Path::new("/repo"), fs.clone()).unwrap();
        assert!(index.is_empty());

        assert!(index.add(Gav::new("g", "b", "1")).unwrap());
        assert!(index.add(Gav::new("g", "a", "1")).unwrap());
        assert!(!index.add(Gav::new("g", "b", "1")).unwrap());

        assert_eq!(fs.get("/repo/.meta/p2-local-metadata.properties").unwrap(), "g:b:1\ng:a:1\n");
        let reopened = FileRepositoryIndex::open(Path::new("/repo"), fs).unwrap();
        assert_eq!(reopened.gavs(), index.gavs());
    }

    #[test]
    fn corrupt_index_is_a_metadata_error() {
        let fs = Arc::new(MemFs::new());
        fs.put("/repo/.meta/p2-local-metadata.properties", "g:a\n");
        let err = FileRepositoryIndex::open(Path::new("/repo"), fs).err().unwrap();
        assert!(matches!(err, Error::Metadata(_)));
    }
}
