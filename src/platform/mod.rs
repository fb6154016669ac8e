//! Resolved target platforms and the settings that shape them.

pub mod config;
mod dependencies;
mod environment;
mod multi;
mod target;

pub use config::{
    DependencyKind, DependencySpec, PomDependencies, RepositoryConfig, RepositoryLayout,
    ResolverStrategy, TargetDefinition, TargetPlatformConfiguration,
};
pub use dependencies::{dependency_declarations, DependencyDeclaration, DependencyScope};
pub use environment::{TargetEnvironment, PROP_ARCH, PROP_NL, PROP_OS, PROP_WS};
pub use multi::{MultiEnvironmentPlatform, PlatformView};
pub use target::{PlatformArtifact, TargetPlatform};
