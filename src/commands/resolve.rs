//! `trellis resolve` command.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::context::ServiceContext;
use crate::coords::Gav;
use crate::error::Error;
use crate::platform::{PlatformView, TargetPlatform, TargetPlatformConfiguration};
use crate::resolver::{
    setup_module, BuildSession, Packaging, ReactorManifest, ReactorModule, TargetPlatformResolver,
};

/// Inputs of one `resolve` invocation.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Target platform configuration file.
    pub config: PathBuf,
    /// Local repository directory.
    pub local_repository: PathBuf,
    /// Coordinates of the resolved module.
    pub module: String,
    /// Packaging of the resolved module.
    pub packaging: String,
    /// Manifest listing the other modules of the build.
    pub reactor: Option<PathBuf>,
    /// Skip remote repositories.
    pub offline: bool,
}

/// What `resolve` prints.
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    /// The resolved module.
    pub module: Gav,
    /// Its target platform.
    pub platform: PlatformView,
}

/// Execute the `resolve` command with the given service context.
///
/// Every module of the reactor manifest gets its dependency metadata set
/// up first, in manifest order, so the resolved module sees them. A module
/// missing from the manifest joins the build last.
///
/// # Errors
///
/// Returns an error string if loading the inputs or resolving fails.
pub fn run_with_context(
    ctx: &ServiceContext,
    options: &ResolveOptions,
) -> Result<ResolveOutput, String> {
    resolve(ctx, options).map_err(|e| e.to_string())
}

fn resolve(ctx: &ServiceContext, options: &ResolveOptions) -> crate::Result<ResolveOutput> {
    let config = TargetPlatformConfiguration::load(&options.config, ctx.fs.as_ref())?;
    let gav: Gav = options.module.parse()?;
    let packaging: Packaging = options.packaging.parse()?;
    let basedir = options.config.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let mut session = BuildSession::new(&options.local_repository);
    session.offline = options.offline;
    if let Some(path) = &options.reactor {
        let text = ctx
            .fs
            .read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        session.modules = ReactorManifest::from_yaml(&text)?.modules(ctx.fs.as_ref())?;
    }

    if !session.modules.iter().any(|m| m.gav() == &gav) {
        session.modules.push(ReactorModule::new(gav.clone(), packaging, basedir));
    }
    for module in &mut session.modules {
        setup_module(ctx.generator.as_ref(), module, &config)?;
    }
    let module = session
        .modules
        .iter()
        .find(|m| m.gav() == &gav)
        .cloned()
        .ok_or_else(|| Error::Config(format!("{gav} is not part of the build")))?;

    let platform = TargetPlatformResolver::new(ctx, &session).resolve(&module, &config)?;
    info!(
        module = %module.gav(),
        artifacts = platform.artifacts().len(),
        "resolved target platform"
    );
    Ok(ResolveOutput {
        module: module.gav().clone(),
        platform,
    })
}

/// Print a resolution as text or JSON.
///
/// # Errors
///
/// Returns an error string if JSON serialization fails.
pub fn print(output: &ResolveOutput, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(output).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }
    match &output.platform {
        PlatformView::Multi { platforms } => {
            for (environment, platform) in platforms.iter() {
                println!("[{environment}]");
                print_platform(platform);
            }
        }
        PlatformView::Merged { platform } => {
            println!("[all environments]");
            print_platform(platform);
        }
    }
    Ok(())
}

fn print_platform(platform: &TargetPlatform) {
    if platform.artifacts().is_empty() {
        println!("  (no artifacts)");
        return;
    }
    let rows: Vec<(String, String)> = platform
        .artifacts()
        .iter()
        .map(|a| (a.key().to_string(), a.location().display().to_string()))
        .collect();
    let width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    for (key, location) in rows {
        println!("  {key:<width$}  {location}");
    }
}
