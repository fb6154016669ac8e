//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolution core and an
//! external collaborator (storage, network, solver, publisher, time, IDs).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod codec;
pub mod content;
pub mod dependencies;
pub mod filesystem;
pub mod generator;
pub mod id_gen;
pub mod loader;
pub mod publisher;
pub mod solver;

pub use clock::Clock;
pub use codec::MetadataCodec;
pub use content::{ContentLocator, LocatorFactory};
pub use dependencies::{ClosureArtifact, DependencyClosure};
pub use filesystem::FileSystem;
pub use generator::{DependencyMetadataGenerator, GeneratorRole};
pub use id_gen::IdGenerator;
pub use loader::RepositoryLoader;
pub use publisher::{ProductPublication, PublisherEngine};
pub use solver::Solver;
