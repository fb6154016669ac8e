//! `trellis index` commands.

use std::path::Path;
use std::sync::Arc;

use crate::context::ServiceContext;
use crate::coords::Gav;
use crate::index::{FileRepositoryIndex, RepositoryIndex};

/// Execute `index list`: print every indexed GAV in order.
///
/// # Errors
///
/// Returns an error string if the index cannot be read.
pub fn list(ctx: &ServiceContext, repo: &Path) -> Result<(), String> {
    let index = FileRepositoryIndex::open(repo, Arc::clone(&ctx.fs)).map_err(|e| e.to_string())?;
    if index.is_empty() {
        println!("No modules indexed in {}.", repo.display());
        return Ok(());
    }
    for gav in index.gavs() {
        println!("{gav}");
    }
    Ok(())
}

/// Execute `index add`: append a GAV unless already present.
///
/// # Errors
///
/// Returns an error string if the GAV is malformed or the index cannot be
/// written.
pub fn add(ctx: &ServiceContext, repo: &Path, gav: &str) -> Result<(), String> {
    let gav: Gav = gav.parse().map_err(|e: crate::Error| e.to_string())?;
    let mut index =
        FileRepositoryIndex::open(repo, Arc::clone(&ctx.fs)).map_err(|e| e.to_string())?;
    if index.add(gav.clone()).map_err(|e| e.to_string())? {
        println!("Added {gav}");
    } else {
        println!("{gav} is already indexed");
    }
    Ok(())
}
