//! Provisioning metadata: units, versions, filters.

pub mod filter;
pub mod unit;
pub mod version;

pub use filter::Filter;
pub use unit::{
    ArtifactDescriptor, Capability, ComponentKey, Requirement, Unit, IU_NAMESPACE, KIND_BINARY,
    KIND_BUNDLE, KIND_FEATURE,
};
pub use version::{Version, VersionRange};
