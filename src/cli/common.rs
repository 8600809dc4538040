//! Argument handling shared by the resolution commands

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use crate::config::ResolverConfig;
use crate::report::ResolutionResult;
use crate::resolver::module_organizer::ModuleLayout;
use crate::resolver::{ResolveOptions, resolve};
use crate::utils::resolve_path;

/// Largest edit distance still offered as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Content root and module selection.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Content root containing `core/` (and `modules/` in a source tree)
    pub root: String,

    /// Module to resolve in addition to `core`; repeatable
    #[arg(short = 'm', long = "module")]
    pub modules: Vec<String>,
}

/// Everything a command needs to run one resolution.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Expanded content root
    pub root: PathBuf,
    /// Requested modules in request order
    pub modules: Vec<String>,
    /// Options passed to the resolver
    pub options: ResolveOptions,
}

impl CommandContext {
    /// Expand paths and load configuration.
    pub async fn from_args(args: &ResolveArgs, cli: &CliConfig) -> Result<Self> {
        let root = resolve_path(&args.root)?;
        let explicit = cli.config_path.as_deref().map(resolve_path).transpose()?;
        let config = ResolverConfig::load(&root, explicit.as_deref()).await?;

        Ok(Self {
            root,
            modules: args.modules.clone(),
            options: ResolveOptions {
                verbose: cli.verbose,
                config,
            },
        })
    }

    /// Run the resolver and warn about requested modules that do not exist.
    pub async fn resolve(&self) -> Result<ResolutionResult> {
        let result = resolve(&self.root, &self.modules, &self.options).await?;
        warn_unknown_modules(&result, &self.modules);
        Ok(result)
    }
}

fn warn_unknown_modules(result: &ResolutionResult, requested: &[String]) {
    let available = ModuleLayout::detect(&result.root).module_names();

    for module in requested.iter().filter(|m| !result.modules.contains(m)) {
        let message = format!("Module '{module}' not found under {}", result.root.display());
        match closest_module(module, &available) {
            Some(suggestion) => {
                eprintln!("{} {} (did you mean '{}'?)", "warning:".yellow(), message, suggestion.green());
            }
            None => eprintln!("{} {}", "warning:".yellow(), message),
        }
    }
}

/// Closest existing module name to `name`, if any is near enough.
///
/// ```rust
/// use bmad_resolver::cli::closest_module;
///
/// let available = vec!["bmm".to_string(), "cis".to_string(), "core".to_string()];
/// assert_eq!(closest_module("bm", &available), Some("bmm"));
/// assert_eq!(closest_module("something-else", &available), None);
/// ```
pub fn closest_module<'a>(name: &str, available: &'a [String]) -> Option<&'a str> {
    available
        .iter()
        .map(|candidate| (candidate, strsim::levenshtein(name, candidate)))
        .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.as_str())
}
