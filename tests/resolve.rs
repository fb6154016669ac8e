//! End-to-end resolution with live adapters over temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trellis::adapters::xml::XmlMetadataCodec;
use trellis::context::ServiceContext;
use trellis::coords::Gav;
use trellis::metadata::{Requirement, Unit, VersionRange, KIND_BUNDLE};
use trellis::platform::config::{RepositoryConfig, RepositoryLayout};
use trellis::platform::{
    dependency_declarations, DependencyScope, PlatformArtifact, PlatformView, TargetEnvironment,
    TargetPlatformConfiguration,
};
use trellis::ports::MetadataCodec;
use trellis::resolver::{
    setup_module, BuildSession, Packaging, ReactorModule, TargetPlatformResolver,
};

struct Workspace {
    _dir: TempDir,
    root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("m2")).unwrap();
        Self { _dir: dir, root }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn write_units(&self, relative: &str, units: &[Unit]) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, XmlMetadataCodec.write_units(units).unwrap()).unwrap();
    }

    fn module(&self, name: &str, packaging: Packaging) -> ReactorModule {
        ReactorModule::new(Gav::new("org.example", name, "1.0.0"), packaging, self.path(name))
    }
}

fn v(s: &str) -> trellis::metadata::Version {
    s.parse().unwrap()
}

fn linux() -> TargetEnvironment {
    TargetEnvironment::new("linux", "gtk", "x86_64")
}

/// A producer bundle, a consumer requiring it and a library from a p2 repository.
fn two_module_build(ws: &Workspace) -> (BuildSession, TargetPlatformConfiguration) {
    let lib = Unit::new("org.lib", v("2.0.0")).with_artifact(KIND_BUNDLE);
    ws.write_units("p2repo/content.xml", &[lib]);
    let producer = Unit::new("org.example.producer", v("1.0.0"));
    ws.write_units("producer/target/p2content.xml", &[producer]);
    ws.write_units(
        "consumer/target/p2content.xml",
        &[Unit::new("org.example.consumer", v("1.0.0"))
            .with_requirement(Requirement::unit("org.example.producer", VersionRange::any()))
            .with_requirement(Requirement::unit("org.lib", "[2.0.0,3.0.0)".parse().unwrap()))],
    );

    let mut config = TargetPlatformConfiguration::from_yaml(
        "environments:\n  - { os: linux, ws: gtk, arch: x86_64 }\n",
    )
    .unwrap();
    config.repositories.push(RepositoryConfig {
        id: "libs".into(),
        url: format!("file://{}", ws.path("p2repo").display()),
        layout: RepositoryLayout::P2,
    });

    let mut session = BuildSession::new(ws.path("m2"));
    session.modules.push(ws.module("producer", Packaging::Plugin));
    session.modules.push(ws.module("consumer", Packaging::Plugin));
    (session, config)
}

/// Reads each module's dependency metadata and returns the last module.
fn set_up(
    ctx: &ServiceContext,
    session: &mut BuildSession,
    config: &TargetPlatformConfiguration,
) -> ReactorModule {
    for module in &mut session.modules {
        setup_module(ctx.generator.as_ref(), module, config).unwrap();
    }
    session.modules.last().unwrap().clone()
}

#[test]
fn resolves_reactor_references_and_repository_files() {
    let ws = Workspace::new();
    let (mut session, config) = two_module_build(&ws);
    let ctx = ServiceContext::live(&session.local_repository);
    let consumer = set_up(&ctx, &mut session, &config);

    let view = TargetPlatformResolver::new(&ctx, &session).resolve(&consumer, &config).unwrap();
    let platform = view.for_environment(&linux()).unwrap();

    let producer = platform.artifact(KIND_BUNDLE, "org.example.producer", None).unwrap();
    assert!(matches!(
        producer,
        PlatformArtifact::Reactor { location, .. } if location == &ws.path("producer")
    ));

    let lib = platform.artifact(KIND_BUNDLE, "org.lib", None).unwrap();
    assert_eq!(lib.location(), ws.path("m2/p2/osgi/bundle/org.lib/2.0.0/org.lib-2.0.0.jar"));
    assert_eq!(platform.non_reactor_units().len(), 1);
}

#[test]
fn repeated_resolution_is_identical() {
    let ws = Workspace::new();
    let (mut session, config) = two_module_build(&ws);
    let ctx = ServiceContext::live(&session.local_repository);
    let consumer = set_up(&ctx, &mut session, &config);

    let first = TargetPlatformResolver::new(&ctx, &session).resolve(&consumer, &config).unwrap();
    let second = TargetPlatformResolver::new(&ctx, &session).resolve(&consumer, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unreachable_repository_only_warns() {
    let ws = Workspace::new();
    let (mut session, mut config) = two_module_build(&ws);
    config.repositories.insert(
        0,
        RepositoryConfig {
            id: "gone".into(),
            url: format!("file://{}", ws.path("missing").display()),
            layout: RepositoryLayout::P2,
        },
    );
    let ctx = ServiceContext::live(&session.local_repository);
    let consumer = set_up(&ctx, &mut session, &config);

    let view = TargetPlatformResolver::new(&ctx, &session).resolve(&consumer, &config).unwrap();
    let platform = view.for_environment(&linux()).unwrap();
    assert!(platform.artifact(KIND_BUNDLE, "org.lib", None).is_some());
}

#[test]
fn platform_converts_to_dependency_declarations() {
    let ws = Workspace::new();
    let (mut session, config) = two_module_build(&ws);
    let ctx = ServiceContext::live(&session.local_repository);
    let consumer = set_up(&ctx, &mut session, &config);
    let lib_file = ws.path("m2/p2/osgi/bundle/org.lib/2.0.0/org.lib-2.0.0.jar");
    fs::create_dir_all(lib_file.parent().unwrap()).unwrap();
    fs::write(&lib_file, b"jar").unwrap();

    let view = TargetPlatformResolver::new(&ctx, &session).resolve(&consumer, &config).unwrap();
    let declarations =
        dependency_declarations(&view, consumer.gav(), &session.modules, ctx.fs.as_ref());

    assert_eq!(declarations.len(), 2);
    let provided = declarations.iter().find(|d| d.scope == DependencyScope::Provided).unwrap();
    assert_eq!(provided.gav, Gav::new("org.example", "producer", "1.0.0"));
    assert_eq!(provided.kind.as_deref(), Some("eclipse-plugin"));
    let system = declarations.iter().find(|d| d.scope == DependencyScope::System).unwrap();
    assert_eq!(system.gav.group(), "p2.osgi.bundle");
    assert_eq!(system.system_path.as_deref(), Some(Path::new(&lib_file)));
}

#[test]
fn aggregator_merges_conflicting_versions() {
    let ws = Workspace::new();
    ws.write_units(
        "p2repo/content.xml",
        &[
            Unit::new("org.lib", v("1.0.0")).singleton().with_artifact(KIND_BUNDLE),
            Unit::new("org.lib", v("2.0.0")).singleton().with_artifact(KIND_BUNDLE),
        ],
    );
    let mut config = TargetPlatformConfiguration::from_yaml(&format!(
        "environments:\n  - {{ os: linux, ws: gtk, arch: x86_64 }}\n\
         allow_conflicting_dependencies: true\n\
         repositories:\n  - {{ id: libs, url: 'file://{}', layout: p2 }}\n\
         dependencies:\n\
         \x20 - {{ type: eclipse-plugin, id: org.lib, version: 1.0.0 }}\n\
         \x20 - {{ type: eclipse-plugin, id: org.lib, version: 2.0.0 }}\n",
        ws.path("p2repo").display()
    ))
    .unwrap();
    let mut session = BuildSession::new(ws.path("m2"));
    session.modules.push(ws.module("site", Packaging::UpdateSite));
    let ctx = ServiceContext::live(&session.local_repository);
    let site = set_up(&ctx, &mut session, &config);

    let view = TargetPlatformResolver::new(&ctx, &session).resolve(&site, &config).unwrap();
    assert!(matches!(view, PlatformView::Merged { .. }));
    assert_eq!(view.artifacts().len(), 2);

    config.allow_conflicting_dependencies = None;
    assert!(TargetPlatformResolver::new(&ctx, &session).resolve(&site, &config).is_err());
}
