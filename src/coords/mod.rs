//! Coordinate bridge between Maven GAVs and p2 component keys.

pub mod gav;
pub mod layout;

pub use gav::Gav;
pub use layout::{extract_gav, parse_relative_path, relative_path, synthetic_gav, ParsedPath};
