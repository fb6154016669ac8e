//! Target platform resolution for one module of the build.
//!
//! A resolution walks `Init -> CollectInputs -> Resolve -> Materialize`
//! and ends in `Done` or `Failed`. Reactor modules are resolved in build
//! order; each resolution reads the dependency metadata of the modules
//! set up before it.

mod greedy;
mod inputs;
mod manifest;
mod module;

pub use greedy::GreedySolver;
pub use inputs::dependency_requirement;
pub use manifest::{read_local_artifacts, ModuleEntry, ReactorManifest};
pub use module::{BuildSession, Packaging, ReactorModule};

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use self::inputs::{Collector, Inputs, Origin};
use crate::context::ServiceContext;
use crate::coords::{layout, relative_path, synthetic_gav};
use crate::error::{Error, Result};
use crate::metadata::{ComponentKey, Unit, KIND_BUNDLE};
use crate::platform::{
    MultiEnvironmentPlatform, PlatformView, TargetPlatform, TargetPlatformConfiguration,
};
use crate::ports::{DependencyMetadataGenerator, GeneratorRole};

/// Progress of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResolverState {
    /// Nothing happened yet.
    Init,
    /// Gathering units and requirements.
    CollectInputs,
    /// Running the solver.
    Resolve,
    /// Building the platform from the solution.
    Materialize,
    /// Finished successfully.
    Done,
    /// Finished with an error.
    Failed,
}

/// One resolved artifact and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
    /// Component key in the provisioning coordinate system.
    pub key: ComponentKey,
    /// Maven classifier.
    pub classifier: Option<String>,
    /// A reactor module directory or an artifact file.
    pub location: PathBuf,
}

/// Solver output in the resolver's terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Resolved artifacts in solver order.
    pub artifacts: Vec<ResolvedArtifact>,
    /// Selected units that were not built by the reactor.
    pub non_reactor_units: Vec<Unit>,
}

/// Computes and stores the dependency metadata of `module`.
///
/// Bundle modules attaching a source bundle also get a `sources` entry.
///
/// # Errors
///
/// Returns [`Error::Metadata`] if the generator fails.
pub fn setup_module(
    generator: &dyn DependencyMetadataGenerator,
    module: &mut ReactorModule,
    config: &TargetPlatformConfiguration,
) -> Result<()> {
    let environments = config.environments();
    let units = generator
        .generate(module, environments, GeneratorRole::DependencyOnly)
        .map_err(|e| Error::Metadata(format!("dependency metadata of {}: {e}", module.gav())))?;
    debug!(module = %module.gav(), units = units.len(), "computed dependency metadata");
    module.set_dependency_metadata(None, units);

    if module.packaging().is_bundle() && config.source_bundle {
        let sources = generator
            .generate(module, environments, GeneratorRole::SourceBundle)
            .map_err(|e| {
                Error::Metadata(format!("source bundle metadata of {}: {e}", module.gav()))
            })?;
        module.set_dependency_metadata(Some(layout::CLASSIFIER_SOURCES), sources);
    }
    Ok(())
}

/// Resolves module target platforms against one build session.
pub struct TargetPlatformResolver<'a> {
    ctx: &'a ServiceContext,
    session: &'a BuildSession,
    state: ResolverState,
}

impl<'a> TargetPlatformResolver<'a> {
    /// Creates a resolver in state [`ResolverState::Init`].
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, session: &'a BuildSession) -> Self {
        Self {
            ctx,
            session,
            state: ResolverState::Init,
        }
    }

    /// State reached by the last resolution.
    #[must_use]
    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Resolves the target platform of `module`.
    ///
    /// Returns one platform per configured environment, or a single merged
    /// platform when an aggregator module tolerates conflicts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for unusable configuration,
    /// [`Error::MissingDependencies`] for an unresolvable closure, and
    /// the solver's [`Error::Unsatisfied`] or [`Error::Conflict`].
    pub fn resolve(
        &mut self,
        module: &ReactorModule,
        config: &TargetPlatformConfiguration,
    ) -> Result<PlatformView> {
        self.state = ResolverState::Init;
        let outcome = self.run(module, config);
        self.state = if outcome.is_ok() { ResolverState::Done } else { ResolverState::Failed };
        outcome
    }

    fn run(
        &mut self,
        module: &ReactorModule,
        config: &TargetPlatformConfiguration,
    ) -> Result<PlatformView> {
        let environments = config.environments();
        if environments.is_empty() {
            return Err(Error::Config(format!(
                "no target environments configured for {}",
                module.gav()
            )));
        }
        info!(
            module = %module.gav(),
            environments = environments.len(),
            "resolving target platform"
        );

        self.state = ResolverState::CollectInputs;
        let inputs = Collector::collect(self.ctx, self.session, module, config)?;
        debug!(available = inputs.available.len(), roots = inputs.roots.len(), "collected inputs");

        self.state = ResolverState::Resolve;
        if self.tolerates_conflicts(module, config) {
            let units = self.ctx.solver.collect(&inputs.available, &inputs.roots)?;
            self.state = ResolverState::Materialize;
            let platform = self.materialize(&self.to_result(&inputs, units));
            return Ok(PlatformView::Merged { platform });
        }

        let mut results = Vec::with_capacity(environments.len());
        for environment in environments {
            let units = self.ctx.solver.resolve(&inputs.available, &inputs.roots, environment)?;
            debug!(%environment, units = units.len(), "resolved environment");
            results.push((environment.clone(), self.to_result(&inputs, units)));
        }

        self.state = ResolverState::Materialize;
        let mut platforms = MultiEnvironmentPlatform::new();
        for (environment, result) in results {
            platforms.add_platform(environment, self.materialize(&result));
        }
        Ok(PlatformView::Multi { platforms })
    }

    fn tolerates_conflicts(
        &self,
        module: &ReactorModule,
        config: &TargetPlatformConfiguration,
    ) -> bool {
        if config.allow_conflicting_dependencies != Some(true) {
            return false;
        }
        if !module.packaging().may_tolerate_conflicts() {
            debug!(
                packaging = %module.packaging(),
                "conflicting dependencies are not tolerated for this packaging"
            );
            return false;
        }
        true
    }

    fn to_result(&self, inputs: &Inputs, units: Vec<Unit>) -> ResolutionResult {
        let mut result = ResolutionResult::default();
        for unit in units {
            match inputs.origin(&unit) {
                Some(Origin::Reactor { module, classifier }) => {
                    let Some(module) = self.session.modules.get(*module) else { continue };
                    result.artifacts.push(ResolvedArtifact {
                        key: ComponentKey::new(
                            module.packaging().artifact_kind(),
                            unit.id.clone(),
                            unit.version.clone(),
                        ),
                        classifier: classifier.clone(),
                        location: module.basedir().to_path_buf(),
                    });
                }
                Some(Origin::File(file)) => {
                    let keys = if unit.artifacts.is_empty() {
                        vec![ComponentKey::new(KIND_BUNDLE, unit.id.clone(), unit.version.clone())]
                    } else {
                        unit.artifacts.clone()
                    };
                    for key in keys {
                        result.artifacts.push(ResolvedArtifact {
                            key,
                            classifier: unit.maven_classifier().map(str::to_string),
                            location: file.clone(),
                        });
                    }
                    result.non_reactor_units.push(unit);
                }
                Some(Origin::Repository) | None => {
                    for key in &unit.artifacts {
                        result.artifacts.push(ResolvedArtifact {
                            key: key.clone(),
                            classifier: unit.maven_classifier().map(str::to_string),
                            location: self.local_path(&unit, key),
                        });
                    }
                    result.non_reactor_units.push(unit);
                }
            }
        }
        result
    }

    /// Local repository file backing `key`.
    fn local_path(&self, unit: &Unit, key: &ComponentKey) -> PathBuf {
        let path = match unit.gav() {
            Some(gav) => relative_path(&gav, unit.maven_classifier(), None),
            None => {
                let gav = synthetic_gav(&key.kind, &key.id, &key.version.to_string());
                relative_path(&gav, None, None)
            }
        };
        self.session.local_repository.join(path)
    }

    fn materialize(&self, result: &ResolutionResult) -> TargetPlatform {
        let mut platform = TargetPlatform::new();
        for artifact in &result.artifacts {
            match self.session.module_at(&artifact.location) {
                Some(module) => platform.add_reactor_artifact(
                    artifact.key.clone(),
                    module.gav(),
                    &artifact.location,
                    artifact.classifier.clone(),
                ),
                None => platform.add_artifact_file(
                    artifact.key.clone(),
                    artifact.location.clone(),
                    artifact.classifier.clone(),
                ),
            }
        }
        platform.add_non_reactor_units(result.non_reactor_units.iter().cloned());
        platform.add_site(self.session.local_repository.clone());
        platform
    }
}
