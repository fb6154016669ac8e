//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `trellis`.
#[derive(Debug, Parser)]
#[command(
    name = "trellis",
    version,
    about = "Resolve target platforms across Maven and p2 repositories"
)]
pub struct Cli {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the repository path of an artifact.
    Path {
        /// Coordinates as `group:artifact:version`.
        gav: String,
        /// Artifact classifier.
        #[arg(long)]
        classifier: Option<String>,
        /// File extension, `jar` by default.
        #[arg(long)]
        extension: Option<String>,
    },
    /// Inspect or extend a repository index.
    Index {
        /// Index operation.
        #[command(subcommand)]
        action: IndexAction,
    },
    /// Resolve the target platform of a module.
    Resolve {
        /// Target platform configuration of the module.
        #[arg(long)]
        config: PathBuf,
        /// Local repository directory.
        #[arg(long)]
        local_repo: PathBuf,
        /// Coordinates of the module.
        #[arg(long, default_value = "trellis:module:0.0.0")]
        module: String,
        /// Packaging of the module.
        #[arg(long, default_value = "eclipse-plugin")]
        packaging: String,
        /// Manifest of the other modules of the build.
        #[arg(long)]
        reactor: Option<PathBuf>,
        /// Skip remote repositories.
        #[arg(long)]
        offline: bool,
        /// Print the platform as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Repository index operations.
#[derive(Debug, Subcommand)]
pub enum IndexAction {
    /// List the indexed GAVs.
    List {
        /// Repository directory.
        repo: PathBuf,
    },
    /// Append a GAV to the index.
    Add {
        /// Repository directory.
        repo: PathBuf,
        /// Coordinates as `group:artifact:version`.
        gav: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, IndexAction};
    use clap::Parser;

    #[test]
    fn parses_path_subcommand() {
        let cli = Cli::parse_from([
            "trellis",
            "path",
            "org.example:core:1.0",
            "--classifier",
            "sources",
        ]);
        assert!(matches!(
            cli.command,
            Command::Path {
                ref gav,
                classifier: Some(ref c),
                extension: None,
            } if gav == "org.example:core:1.0" && c == "sources"
        ));
    }

    #[test]
    fn parses_index_add() {
        let cli = Cli::parse_from(["trellis", "index", "add", "/m2", "g:a:1"]);
        assert!(matches!(cli.command, Command::Index { action: IndexAction::Add { .. } }));
    }

    #[test]
    fn resolve_requires_config_and_local_repo() {
        assert!(Cli::try_parse_from(["trellis", "resolve", "--config", "platform.yaml"]).is_err());
        let cli = Cli::parse_from([
            "trellis",
            "-v",
            "resolve",
            "--config",
            "platform.yaml",
            "--local-repo",
            "/m2",
            "--offline",
        ]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Resolve {
                offline: true,
                json: false,
                ref packaging,
                ..
            } if packaging == "eclipse-plugin"
        ));
    }
}
