//! Core library entry for the `trellis` CLI.
//!
//! Resolves the target platform of build modules that mix Maven
//! coordinates with p2 provisioning metadata: repository indexes and views
//! over both layouts, the per-environment resolver, and a publisher bridge.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod coords;
pub mod error;
pub mod index;
pub mod metadata;
pub mod platform;
pub mod ports;
pub mod publisher;
pub mod repository;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    init_logging(cli.verbose);
    commands::dispatch(&cli.command)
}

/// Installs the log subscriber; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "trellis=debug" } else { "trellis=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second initialization, e.g. across tests, keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_path() {
        let result = run(["trellis", "path", "org.example:core:1.0"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["trellis", "unknown"]);
        assert!(result.is_err());
    }
}
