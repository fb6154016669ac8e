//! In-memory repository index.

use super::{parse_index, RepositoryIndex};
use crate::coords::Gav;
use crate::error::Result;

/// Index held in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRepositoryIndex {
    gavs: Vec<Gav>,
}

impl MemoryRepositoryIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a module's own repository: exactly that module.
    #[must_use]
    pub fn single(gav: Gav) -> Self {
        Self { gavs: vec![gav] }
    }

    /// Parses index text fetched from elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed lines.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            gavs: parse_index(text)?,
        })
    }
}

impl RepositoryIndex for MemoryRepositoryIndex {
    fn gavs(&self) -> &[Gav] {
        &self.gavs
    }

    fn add(&mut self, gav: Gav) -> Result<bool> {
        if self.contains(&gav) {
            return Ok(false);
        }
        self.gavs.push(gav);
        Ok(true)
    }
}
