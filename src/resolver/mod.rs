//! Transitive artifact resolution.
//!
//! Given a content root and a module selection, the resolver finds every file
//! the selected modules need: the modules' own artifacts plus everything they
//! reference, directly or through other files.
//!
//! # Algorithm
//!
//! Resolution is an iterative fixed point over an explicit work queue, never
//! recursion, so graph depth cannot exhaust the stack:
//!
//! 1. **Seed**: every artifact under `core` and each requested module that
//!    exists, in sorted directory order, filtered by the configured content
//!    types and exclusion patterns. Files carrying a local-skip marker, seeds
//!    or reached by reference, are set aside in [`ResolutionResult::skipped`].
//! 2. **Walk**: pop a file, extract its references
//!    ([`crate::markdown::reference_extractor`]), resolve each one
//!    ([`path_resolver`]), record the edge, and enqueue targets not yet
//!    visited. Targets referenced from a primary file are direct dependencies;
//!    targets reached only from other files are transitive.
//! 3. **Report**: once the queue drains, [`crate::report::ReportBuilder`]
//!    classifies the files by module and type.
//!
//! The `visited` set is owned by one call. Cycles (`A -> B -> A`),
//! self-references and diamonds all terminate with each file processed once.
//!
//! # Failure policy
//!
//! Only an invalid content root (or invalid exclusion patterns) fails the
//! call. Malformed front-matter and unreadable files become
//! [`crate::report::ResolutionWarning`]s; unresolvable references are collected
//! in [`ResolutionResult::missing`]; requested modules that do not exist are
//! simply absent from the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use bmad_resolver::resolver::{ResolveOptions, resolve};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let result = resolve(Path::new("./src"), &["bmm".to_string()], &ResolveOptions::default()).await?;
//!
//! for path in &result.all_files {
//!     println!("{}", result.relative(path));
//! }
//! # Ok(())
//! # }
//! ```

pub mod dependency_graph;
pub mod module_organizer;
pub mod path_resolver;

use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::config::ResolverConfig;
use crate::constants::{CORE_MODULE, is_document_extension};
use crate::core::ResolverError;
use crate::markdown::{ExtractedReferences, MissingReference, ReferenceExtractor};
use crate::pattern::PatternResolver;
use crate::report::{ReportBuilder, ResolutionResult, ResolutionState, ResolutionWarning, log_report};

use module_organizer::ModuleLayout;
use path_resolver::{PathResolver, Resolution};

/// Caller options for one resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Emit the per-module report and missing-reference warnings via `tracing`
    pub verbose: bool,
    /// Resolver settings
    pub config: ResolverConfig,
}

impl ResolveOptions {
    /// Options with default configuration and the given verbosity.
    #[must_use]
    pub fn verbose(verbose: bool) -> Self {
        Self {
            verbose,
            config: ResolverConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }
}

/// Resolve everything `core` and `modules` need under `root`.
///
/// # Errors
///
/// - [`ResolverError::ContentRootNotFound`] if `root` does not exist
/// - [`ResolverError::ContentRootNotDirectory`] if `root` is a file
/// - [`ResolverError::InvalidPattern`] if an exclusion pattern does not compile
pub async fn resolve(root: &Path, modules: &[String], options: &ResolveOptions) -> Result<ResolutionResult> {
    let root = validate_root(root).await?;
    let layout = ModuleLayout::detect(&root);
    let exclusions = PatternResolver::with_exclusions(&options.config.exclude)?;

    let mut selection = vec![CORE_MODULE.to_string()];
    for module in modules {
        if !selection.contains(module) {
            selection.push(module.clone());
        }
    }

    let present: Vec<String> = selection.iter().filter(|m| layout.has_module(m)).cloned().collect();
    for module in selection.iter().filter(|m| !present.contains(m)) {
        debug!("Requested module '{}' not found under {}", module, root.display());
    }

    let path_resolver = PathResolver::new(
        layout.clone(),
        modules,
        options.config.default_extension.clone(),
        options.config.project_root_marker.clone(),
    );

    let walk = GraphWalk {
        layout: &layout,
        path_resolver,
        extractor: ReferenceExtractor::with_project_root_marker(options.config.project_root_marker.clone()),
        verbose: options.verbose,
    };

    let seeds = walk.collect_seeds(&present, &exclusions, &options.config);
    let state = walk.run(seeds).await;

    let result = ReportBuilder::new(&layout, present).build(state);

    if options.verbose {
        log_report(&result);
    }

    Ok(result)
}

/// Read one file and return what the extractor finds in it.
pub async fn extract_file_references(path: &Path) -> Result<ExtractedReferences> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ReferenceExtractor::new().extract(&text))
}

async fn validate_root(root: &Path) -> Result<PathBuf> {
    let metadata = match tokio::fs::metadata(root).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResolverError::ContentRootNotFound {
                path: root.display().to_string(),
            }
            .into());
        }
        Err(e) => return Err(ResolverError::IoError(e).into()),
    };

    if !metadata.is_dir() {
        return Err(ResolverError::ContentRootNotDirectory {
            path: root.display().to_string(),
        }
        .into());
    }

    Ok(tokio::fs::canonicalize(root).await.map_err(ResolverError::IoError)?)
}

/// Collaborators for one resolution call.
struct GraphWalk<'a> {
    layout: &'a ModuleLayout,
    path_resolver: PathResolver,
    extractor: ReferenceExtractor,
    verbose: bool,
}

impl GraphWalk<'_> {
    /// Artifact files of the selected modules in sorted walk order.
    fn collect_seeds(&self, modules: &[String], exclusions: &PatternResolver, config: &ResolverConfig) -> Vec<PathBuf> {
        let mut seeds = Vec::new();

        for module in modules {
            let Some(module_dir) = self.layout.module_dir(module) else {
                continue;
            };

            for entry in WalkDir::new(&module_dir)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|entry| entry.file_type().is_file())
            {
                let path = entry.path();
                let Ok(relative) = path.strip_prefix(&module_dir) else {
                    continue;
                };

                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                if exclusions.is_excluded(relative) {
                    trace!("Excluded from seeds: {}", path.display());
                    continue;
                }
                if !config.seeds(self.layout.type_of(path)) {
                    continue;
                }

                seeds.push(path.to_path_buf());
            }
        }

        debug!("Collected {} seed files", seeds.len());
        seeds
    }

    /// Read a document file. Non-document files carry no references.
    async fn read_references(&self, path: &Path, state: &mut ResolutionState) -> Option<ExtractedReferences> {
        let is_document =
            path.extension().and_then(|ext| ext.to_str()).is_some_and(is_document_extension);
        if !is_document {
            return None;
        }

        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                debug!("Could not read {}: {}", path.display(), e);
                state.warnings.push(ResolutionWarning {
                    file: path.to_path_buf(),
                    message: format!("could not be read: {e}"),
                });
                return None;
            }
        };

        let extracted = self.extractor.extract(&text);

        if let Some(error) = &extracted.frontmatter_error {
            if self.verbose {
                warn!("Malformed front-matter in {}: {}", path.display(), error);
            } else {
                debug!("Malformed front-matter in {}: {}", path.display(), error);
            }
            state.warnings.push(ResolutionWarning {
                file: path.to_path_buf(),
                message: format!("malformed front-matter: {error}"),
            });
        }

        Some(extracted)
    }

    async fn run(&self, seeds: Vec<PathBuf>) -> ResolutionState {
        let mut state = ResolutionState::default();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut skipped: HashSet<PathBuf> = HashSet::new();
        let mut pending: HashMap<PathBuf, Option<ExtractedReferences>> = HashMap::new();

        // Seeds are read up front so local-skip files are known before any
        // reference to them is classified.
        for seed in seeds {
            if !visited.insert(seed.clone()) {
                continue;
            }

            let extracted = self.read_references(&seed, &mut state).await;
            if extracted.as_ref().is_some_and(|e| e.local_skip) {
                debug!("Skipping local-skip file {}", seed.display());
                skipped.insert(seed.clone());
                state.skipped.push(seed);
                continue;
            }

            state.primary.push(seed.clone());
            pending.insert(seed, extracted);
        }

        let primary: HashSet<PathBuf> = state.primary.iter().cloned().collect();
        let mut queue: VecDeque<PathBuf> = state.primary.iter().cloned().collect();

        while let Some(file) = queue.pop_front() {
            state.discovered.push(file.clone());
            state.graph.ensure_node(&file);

            let Some(extracted) = pending.remove(&file).flatten() else {
                continue;
            };

            let referrer_dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
            let from_primary = primary.contains(&file);
            debug!("Processing {} ({} references)", file.display(), extracted.references.len());

            for reference in &extracted.references {
                let targets = match self.path_resolver.resolve(reference, &referrer_dir).await {
                    Resolution::Found(targets) => targets,
                    Resolution::NoMatches => {
                        trace!("Pattern '{}' in {} matched nothing", reference, file.display());
                        continue;
                    }
                    Resolution::Missing => {
                        debug!("Missing reference '{}' in {}", reference, file.display());
                        state.missing.push(MissingReference::new(file.clone(), reference.clone()));
                        continue;
                    }
                };

                for target in targets {
                    if skipped.contains(&target) {
                        continue;
                    }

                    // First sight of a target: read it now so a local-skip
                    // marker is known before the target is recorded anywhere.
                    if visited.insert(target.clone()) {
                        let target_refs = self.read_references(&target, &mut state).await;
                        if target_refs.as_ref().is_some_and(|e| e.local_skip) {
                            debug!("Skipping local-skip file {} referenced from {}", target.display(), file.display());
                            skipped.insert(target.clone());
                            state.skipped.push(target);
                            continue;
                        }
                        pending.insert(target.clone(), target_refs);
                        queue.push_back(target.clone());
                    }

                    state.graph.add_reference(&file, &target);

                    if from_primary {
                        state.dependencies.insert(target.clone());
                    } else if !state.dependencies.contains(&target) {
                        state.transitive.insert(target);
                    }
                }
            }
        }

        for cycle in state.graph.cycles() {
            let names: Vec<String> = cycle.iter().map(|p| p.display().to_string()).collect();
            debug!("Reference cycle: {}", names.join(" <-> "));
        }

        state
    }
}
