//! Live adapters for real external interactions.

pub mod clock;
pub mod dependencies;
pub mod filesystem;
pub mod generator;
pub mod http;
pub mod id_gen;
pub mod layout;
pub mod loader;
pub mod locators;
