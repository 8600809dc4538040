//! Command-line interface for bmad-resolver.
//!
//! Each subcommand lives in its own module with its own argument struct and
//! an `execute` method; this module only parses global flags and dispatches.
//!
//! # Available Commands
//!
//! - `resolve` - Resolve a module selection and print the summary report or JSON
//! - `bundle` - Write every resolved file grouped by content type as JSON
//! - `tree` - Show the references below one file as a tree
//! - `refs` - List the raw references found in one file
//!
//! # Global Options
//!
//! - `--verbose` - Debug logging plus the per-module resolution report
//! - `--quiet` - Only errors
//! - `--config` - Path to a `bmad-resolver.toml` file
//!
//! # Example
//!
//! ```bash
//! bmad-resolver resolve ./src -m bmm
//! bmad-resolver bundle ./src -m bmm -m cis -o bundle.json
//! bmad-resolver tree ./src core/agents/bmad-master.md
//! bmad-resolver refs ./src/core/tasks/workflow.xml
//! ```

mod bundle;
mod common;
mod refs;
mod resolve;
mod tree;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use common::{CommandContext, ResolveArgs, closest_module};

/// Runtime configuration derived from global flags.
///
/// Kept separate from [`Cli`] so tests can drive commands without parsing
/// arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter for the subscriber. `None` means errors only.
    pub log_level: Option<String>,

    /// Whether the resolver should log its per-module report.
    pub verbose: bool,

    /// Explicit configuration file, before `~`/`$VAR` expansion.
    pub config_path: Option<String>,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global `tracing` subscriber on stderr.
    ///
    /// `RUST_LOG` wins over the flag-derived level. Calling this more than
    /// once is harmless; later calls leave the first subscriber in place.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("error"))
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Resolve BMAD module content and everything it references.
#[derive(Parser, Debug)]
#[command(name = "bmad-resolver", version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging and the per-module resolution report.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output except errors.
    ///
    /// Command output (reports, JSON) is still printed.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file.
    ///
    /// Overrides the `BMAD_RESOLVER_CONFIG` environment variable, the
    /// `bmad-resolver.toml` in the content root and the user config directory.
    #[arg(long, global = true)]
    config: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve modules and print the summary report.
    ///
    /// `core` is always included. Use `--format json` for the full result.
    Resolve(resolve::ResolveCommand),

    /// Write all resolved files grouped by content type as JSON.
    Bundle(bundle::BundleCommand),

    /// Show the reference tree below one file.
    Tree(tree::TreeCommand),

    /// List the references found in one file without resolving them.
    Refs(refs::RefsCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    ///
    /// ```rust
    /// use bmad_resolver::cli::Cli;
    /// use clap::Parser;
    ///
    /// let cli = Cli::parse_from(["bmad-resolver", "--verbose", "resolve", "./src"]);
    /// let config = cli.build_config();
    /// assert_eq!(config.log_level.as_deref(), Some("debug"));
    /// assert!(config.verbose);
    /// ```
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            verbose: self.verbose,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an injected configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&config).await,
            Commands::Bundle(cmd) => cmd.execute(&config).await,
            Commands::Tree(cmd) => cmd.execute(&config).await,
            Commands::Refs(cmd) => cmd.execute().await,
        }
    }
}
