//! Repository indexes: which modules have metadata in a repository.
//!
//! An index is an ordered, duplicate-free list of GAVs. Repository views
//! iterate it to find the metadata documents they aggregate.

mod cache;
mod file;
mod memory;

pub use cache::{repository_key, IndexCache, SharedIndex};
pub use file::{FileRepositoryIndex, INDEX_PATH};
pub use memory::MemoryRepositoryIndex;

use crate::coords::Gav;
use crate::error::{Error, Result};

/// Ordered, duplicate-free set of GAVs published in one repository.
pub trait RepositoryIndex: Send + Sync {
    /// GAVs in insertion order.
    fn gavs(&self) -> &[Gav];

    /// Adds a GAV. Returns `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns an error if a persisted index cannot be written.
    fn add(&mut self, gav: Gav) -> Result<bool>;

    /// Returns `true` if the GAV is listed.
    fn contains(&self, gav: &Gav) -> bool {
        self.gavs().contains(gav)
    }

    /// Number of listed GAVs.
    fn len(&self) -> usize {
        self.gavs().len()
    }

    /// Returns `true` if nothing is listed.
    fn is_empty(&self) -> bool {
        self.gavs().is_empty()
    }
}

/// Parses index text: one `group:artifact:version` per line.
///
/// Blank lines and `#` comments are ignored; repeated entries keep their
/// first position.
///
/// # Errors
///
/// Returns [`Error::Metadata`] for a line that is not a GAV.
pub fn parse_index(text: &str) -> Result<Vec<Gav>> {
    let mut gavs: Vec<Gav> = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let gav: Gav = line
            .parse()
            .map_err(|e| Error::Metadata(format!("index line {}: {e}", number + 1)))?;
        if !gavs.contains(&gav) {
            gavs.push(gav);
        }
    }
    Ok(gavs)
}
