//! Command dispatch and handlers.

pub mod index;
pub mod path;
pub mod resolve;

use crate::cli::{Command, IndexAction};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Path {
            gav,
            classifier,
            extension,
        } => path::run(gav, classifier.as_deref(), extension.as_deref()),
        Command::Index { action } => {
            let ctx = ServiceContext::live(std::path::Path::new("."));
            match action {
                IndexAction::List { repo } => index::list(&ctx, repo),
                IndexAction::Add { repo, gav } => index::add(&ctx, repo, gav),
            }
        }
        Command::Resolve {
            config,
            local_repo,
            module,
            packaging,
            reactor,
            offline,
            json,
        } => {
            let ctx = ServiceContext::live(local_repo);
            let options = resolve::ResolveOptions {
                config: config.clone(),
                local_repository: local_repo.clone(),
                module: module.clone(),
                packaging: packaging.clone(),
                reactor: reactor.clone(),
                offline: *offline,
            };
            let output = resolve::run_with_context(&ctx, &options)?;
            resolve::print(&output, *json)
        }
    }
}
