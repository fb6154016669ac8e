//! Gathers the units and root requirements one resolution sees.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use super::module::{BuildSession, ReactorModule};
use crate::context::ServiceContext;
use crate::coords::Gav;
use crate::error::{Error, Result};
use crate::index::{
    repository_key, FileRepositoryIndex, MemoryRepositoryIndex, SharedIndex, INDEX_PATH,
};
use crate::metadata::{Requirement, Unit, Version, VersionRange};
use crate::platform::config::{
    DependencyKind, DependencySpec, PomDependencies, RepositoryLayout, ResolverStrategy,
};
use crate::platform::TargetPlatformConfiguration;
use crate::repository::{file_uri, MetadataRepository};

/// Where an available unit came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Origin {
    /// Dependency metadata of a reactor module.
    Reactor {
        module: usize,
        classifier: Option<String>,
    },
    /// A resolved file of the dependency closure.
    File(PathBuf),
    /// An external or local repository.
    Repository,
}

#[derive(Debug, Default)]
pub(super) struct Inputs {
    pub available: Vec<Unit>,
    pub roots: Vec<Requirement>,
    origins: HashMap<(String, Version), Origin>,
}

impl Inputs {
    /// Adds a unit unless one with the same identity was offered earlier.
    fn offer(&mut self, unit: Unit, origin: &Origin) {
        let identity = (unit.id.clone(), unit.version.clone());
        if self.origins.contains_key(&identity) {
            return;
        }
        self.origins.insert(identity, origin.clone());
        self.available.push(unit);
    }

    fn require(&mut self, requirement: Requirement) {
        if !self.roots.contains(&requirement) {
            self.roots.push(requirement);
        }
    }

    pub fn origin(&self, unit: &Unit) -> Option<&Origin> {
        self.origins.get(&(unit.id.clone(), unit.version.clone()))
    }
}

/// Requirement expressing an explicit dependency.
///
/// # Errors
///
/// Returns [`Error::Config`] for an unparsable version.
pub fn dependency_requirement(dependency: &DependencySpec) -> Result<Requirement> {
    let id = match dependency.kind {
        DependencyKind::Feature => format!("{}.feature.group", dependency.id),
        DependencyKind::Plugin | DependencyKind::InstallableUnit => dependency.id.clone(),
    };
    let range = match dependency.version.as_deref().map(str::trim) {
        None | Some("" | "0.0.0") => VersionRange::any(),
        Some(version) => VersionRange::exactly(
            version
                .parse()
                .map_err(|e| Error::Config(format!("dependency {}: {e}", dependency.id)))?,
        ),
    };
    Ok(Requirement::unit(id, range))
}

pub(super) struct Collector<'a> {
    ctx: &'a ServiceContext,
    session: &'a BuildSession,
    config: &'a TargetPlatformConfiguration,
    inputs: Inputs,
}

impl<'a> Collector<'a> {
    pub fn collect(
        ctx: &'a ServiceContext,
        session: &'a BuildSession,
        module: &ReactorModule,
        config: &'a TargetPlatformConfiguration,
    ) -> Result<Inputs> {
        let mut collector = Self {
            ctx,
            session,
            config,
            inputs: Inputs::default(),
        };
        collector.add_reactor_modules();
        for requirement in module.units().flat_map(|u| u.requires.iter()) {
            collector.inputs.require(requirement.clone());
        }
        for dependency in &config.dependencies {
            collector.inputs.require(dependency_requirement(dependency)?);
        }
        if config.pom_dependencies == PomDependencies::Consider {
            collector.add_dependency_closure(module.gav())?;
        }
        match config.resolver {
            ResolverStrategy::Local => collector.add_local_repository()?,
            ResolverStrategy::P2 => {
                collector.add_p2_repositories();
                collector.add_maven_repositories()?;
                collector.add_target_definition()?;
                collector.add_local_repository()?;
            }
        }
        Ok(collector.inputs)
    }

    fn add_reactor_modules(&mut self) {
        for (index, module) in self.session.modules.iter().enumerate() {
            for (classifier, units) in module.dependency_metadata() {
                let origin = Origin::Reactor {
                    module: index,
                    classifier: classifier.clone(),
                };
                for unit in units {
                    self.inputs.offer(unit.clone(), &origin);
                }
            }
        }
    }

    fn add_dependency_closure(&mut self, module: &Gav) -> Result<()> {
        let declared = self
            .config
            .pom_dependency_list
            .iter()
            .map(|s| s.parse::<Gav>())
            .collect::<Result<Vec<_>>>()?;
        let reactor: HashSet<&Gav> = self.session.modules.iter().map(ReactorModule::gav).collect();
        let closure = self.ctx.closure.compile_closure(module, &declared).map_err(|e| {
            let reason = format!("closure of {module} could not be computed: {e}");
            Error::MissingDependencies(vec![reason])
        })?;

        let missing: Vec<String> = closure
            .iter()
            .filter(|a| a.file.is_none() && !reactor.contains(&a.gav))
            .map(|a| a.gav.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingDependencies(missing));
        }

        for artifact in closure {
            if reactor.contains(&artifact.gav) {
                continue;
            }
            let Some(file) = artifact.file else { continue };
            if artifact.units.is_empty() {
                debug!(gav = %artifact.gav, "dependency carries no metadata");
            }
            let origin = Origin::File(file);
            for unit in artifact.units {
                self.inputs.offer(unit, &origin);
            }
        }
        Ok(())
    }

    /// Offers the units of the local repository, the lowest-precedence
    /// input of every strategy.
    fn add_local_repository(&mut self) -> Result<()> {
        let root = &self.session.local_repository;
        if !self.ctx.fs.exists(root) || self.ctx.fs.is_file(root) {
            return Err(Error::Config(format!(
                "local repository {} is not a directory",
                root.display()
            )));
        }
        let location = file_uri(root);
        let index = FileRepositoryIndex::open(root, Arc::clone(&self.ctx.fs))?;
        let locator = self.ctx.open_locator(&location)?;
        let repository =
            MetadataRepository::load(&location, &index, &*locator, self.ctx.codec.as_ref());
        debug!(%location, units = repository.units().len(), "using local repository");
        for unit in repository.units() {
            self.inputs.offer(unit.clone(), &Origin::Repository);
        }
        Ok(())
    }

    fn add_p2_repositories(&mut self) {
        let repositories = self
            .config
            .repositories
            .iter()
            .filter(|r| r.layout == RepositoryLayout::P2);
        for repository in repositories {
            let url = self.config.mirror_url(&repository.id, &repository.url);
            self.add_p2_repository(&repository.id, &url);
        }
    }

    fn add_p2_repository(&mut self, id: &str, url: &str) {
        if self.session.offline && self.ctx.locators.is_remote(url) {
            debug!(id, url, "offline mode, skipping remote repository");
            return;
        }
        match self.ctx.loader.load_units(url) {
            Ok(units) => {
                debug!(id, url, units = units.len(), "loaded repository");
                for unit in units {
                    self.inputs.offer(unit, &Origin::Repository);
                }
            }
            Err(e) => {
                warn!(
                    id,
                    url,
                    error = %e,
                    "failed to access repository, will try to use local cache"
                );
            }
        }
    }

    fn add_maven_repositories(&mut self) -> Result<()> {
        let maven = self
            .config
            .repositories
            .iter()
            .filter(|r| r.layout == RepositoryLayout::Default);
        for repository in maven {
            if self.config.ignore_maven_repositories {
                debug!(id = %repository.id, "ignoring Maven repository");
                continue;
            }
            if self.session.offline {
                debug!(id = %repository.id, "offline mode, ignoring Maven repository");
                continue;
            }
            let url = self.config.mirror_url(&repository.id, &repository.url);
            match self.load_maven_repository(&repository.id, &url) {
                Ok(loaded) => {
                    for unit in loaded.units() {
                        self.inputs.offer(unit.clone(), &Origin::Repository);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    debug!(
                        id = %repository.id,
                        %url,
                        error = %e,
                        "unable to initialize remote repository"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn load_maven_repository(&self, id: &str, url: &str) -> Result<MetadataRepository> {
        let locator = self.ctx.open_locator(url)?;
        let index = self.session.index_cache.get_or_try_insert(&repository_key(id, url), || {
            let bytes = locator.fetch(INDEX_PATH).map_err(|e| Error::unavailable(url, e))?;
            let index = MemoryRepositoryIndex::parse(&String::from_utf8_lossy(&bytes))?;
            Ok(Arc::new(index) as SharedIndex)
        })?;
        Ok(MetadataRepository::load(url, index.as_ref(), &*locator, self.ctx.codec.as_ref()))
    }

    fn add_target_definition(&mut self) -> Result<()> {
        let Some(target) = &self.config.target else { return Ok(()) };
        let mut seen: HashSet<String> = HashSet::new();
        for location in &target.locations {
            if !location.is_installable_unit() {
                warn!(kind = %location.kind, "target location type is not supported, skipping");
                continue;
            }
            for repository in &location.repositories {
                let id = repository.id.as_deref().unwrap_or(repository.location.as_str());
                let url = self.config.mirror_url(id, &repository.location);
                if !seen.insert(url.clone()) {
                    continue;
                }
                if self.session.offline {
                    debug!(%url, "ignoring target definition repository while offline");
                    continue;
                }
                self.add_p2_repository(id, &url);
            }
            for unit in &location.units {
                let version: Version = unit
                    .version
                    .parse()
                    .map_err(|e| Error::Config(format!("target unit {}: {e}", unit.id)))?;
                self.inputs.require(Requirement::unit(&unit.id, VersionRange::exactly(version)));
            }
        }
        Ok(())
    }
}
