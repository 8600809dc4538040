//! Resolution results and the views built from them.
//!
//! [`ReportBuilder`] turns the working sets of a finished resolution into the
//! immutable [`ResolutionResult`]. Everything here is a pure transformation of
//! paths already resolved: classification is lexical and nothing touches the
//! filesystem.
//!
//! - [`ResolutionResult`]: primary files, direct and transitive dependencies,
//!   the deduplicated file list, missing references, and a per-module view
//! - [`ResolutionSummary`]: counts plus the text report
//! - [`BundleView`]: all files grouped by content type across modules

mod bundle;
mod summary;

pub use bundle::{BundleEntry, BundleMetadata, BundleView};
pub use summary::{ModuleCounts, ResolutionSummary, log_report};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::constants::CORE_MODULE;
use crate::core::ContentType;
use crate::markdown::MissingReference;
use crate::resolver::dependency_graph::DependencyGraph;
use crate::resolver::module_organizer::ModuleLayout;
use crate::utils::display_relative;

/// Files of one module, bucketed by content type in first-discovery order.
pub type ModuleFiles = BTreeMap<ContentType, Vec<PathBuf>>;

/// A resolution root: a file seeded because its module was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryFile {
    /// Canonical path
    pub path: PathBuf,
    /// File stem, e.g. `pm` for `agents/pm.md`
    pub name: String,
    /// Owning module
    pub module: String,
    /// Inferred content type
    pub content_type: ContentType,
}

/// A per-file problem that did not stop resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionWarning {
    /// The file the problem was found in
    pub file: PathBuf,
    /// What went wrong
    pub message: String,
}

/// Outcome of one resolution call.
///
/// `all_files` holds each real file at most once, however many references
/// lead to it. Files carrying a local-skip marker are listed in `skipped` and
/// nowhere else.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResult {
    /// Canonical content root
    pub root: PathBuf,
    /// `core` followed by the requested modules that exist
    pub modules: Vec<String>,
    /// Seeded files with their module and type
    pub primary_files: Vec<PrimaryFile>,
    /// Files referenced directly by a primary file
    pub dependencies: BTreeSet<PathBuf>,
    /// Files reached only through other dependencies
    pub transitive_dependencies: BTreeSet<PathBuf>,
    /// Every resolved file, unique, in discovery order
    pub all_files: Vec<PathBuf>,
    /// References no rule could resolve
    pub missing: Vec<MissingReference>,
    /// Files excluded by a local-skip marker
    pub skipped: Vec<PathBuf>,
    /// Non-fatal per-file problems
    pub warnings: Vec<ResolutionWarning>,
    /// Module name to content type to files
    pub by_module: BTreeMap<String, ModuleFiles>,
    /// Reference edges between resolved files
    #[serde(skip)]
    pub graph: DependencyGraph,
}

impl ResolutionResult {
    /// Whether `path` is among the resolved files.
    pub fn contains(&self, path: &Path) -> bool {
        self.all_files.iter().any(|f| f == path)
    }

    /// Files of one module and type, empty when absent.
    pub fn files_of(&self, module: &str, content_type: ContentType) -> &[PathBuf] {
        self.by_module
            .get(module)
            .and_then(|types| types.get(&content_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Path relative to the content root with `/` separators.
    pub fn relative(&self, path: &Path) -> String {
        display_relative(&self.root, path)
    }

    /// Counts for display or assertions.
    pub fn summary(&self) -> ResolutionSummary {
        ResolutionSummary::from_result(self)
    }

    /// All files grouped by content type across modules.
    pub fn bundle(&self) -> BundleView {
        BundleView::from_result(self)
    }
}

/// Working sets collected while the graph is walked.
#[derive(Debug, Default)]
pub struct ResolutionState {
    /// Seeded files in seed order
    pub primary: Vec<PathBuf>,
    /// Files referenced from primary files
    pub dependencies: BTreeSet<PathBuf>,
    /// Files referenced from non-primary files only
    pub transitive: BTreeSet<PathBuf>,
    /// Every file processed, in discovery order
    pub discovered: Vec<PathBuf>,
    /// Unresolvable references
    pub missing: Vec<MissingReference>,
    /// Local-skip files
    pub skipped: Vec<PathBuf>,
    /// Non-fatal problems
    pub warnings: Vec<ResolutionWarning>,
    /// Reference edges
    pub graph: DependencyGraph,
}

/// Builds the public result from a finished [`ResolutionState`].
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    layout: &'a ModuleLayout,
    modules: Vec<String>,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder for `layout` and the effective module list.
    pub fn new(layout: &'a ModuleLayout, modules: Vec<String>) -> Self {
        Self {
            layout,
            modules,
        }
    }

    /// Classify everything and assemble the result.
    pub fn build(self, state: ResolutionState) -> ResolutionResult {
        let mut seen = HashSet::new();
        let all_files: Vec<PathBuf> =
            state.discovered.into_iter().filter(|path| seen.insert(path.clone())).collect();

        let primary_files = state
            .primary
            .iter()
            .map(|path| PrimaryFile {
                path: path.clone(),
                name: path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default(),
                module: self.layout.module_of(path).unwrap_or_default(),
                content_type: self.layout.type_of(path),
            })
            .collect();

        let mut by_module: BTreeMap<String, ModuleFiles> = BTreeMap::new();
        if self.modules.iter().any(|m| m == CORE_MODULE) {
            by_module.entry(CORE_MODULE.to_string()).or_default();
        }
        for path in &all_files {
            if let Some((module, content_type)) = self.layout.classify(path) {
                by_module.entry(module).or_default().entry(content_type).or_default().push(path.clone());
            }
        }

        ResolutionResult {
            root: self.layout.root().to_path_buf(),
            modules: self.modules,
            primary_files,
            dependencies: state.dependencies,
            transitive_dependencies: state.transitive,
            all_files,
            missing: state.missing,
            skipped: state.skipped,
            warnings: state.warnings,
            by_module,
            graph: state.graph,
        }
    }
}
