//! Counts and the human-readable resolution report.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use super::ResolutionResult;
use crate::core::ContentType;

/// Per-type file counts of one module.
pub type ModuleCounts = BTreeMap<ContentType, usize>;

/// Always listed in the report, even when zero.
const REPORTED_TYPES: [ContentType; 3] = [ContentType::Agent, ContentType::Task, ContentType::Template];

/// Aggregate counts of a [`ResolutionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    /// Number of primary files
    pub primary: usize,
    /// Number of direct dependencies
    pub direct: usize,
    /// Number of transitive dependencies
    pub transitive: usize,
    /// Number of unique resolved files
    pub total: usize,
    /// Number of unresolvable references
    pub missing: usize,
    /// Number of local-skip files
    pub skipped: usize,
    /// Number of non-fatal warnings
    pub warnings: usize,
    /// Module name to per-type counts
    pub modules: BTreeMap<String, ModuleCounts>,
    /// Missing references as `file -> reference` lines
    #[serde(skip)]
    missing_lines: Vec<String>,
}

impl ResolutionSummary {
    /// Count everything in `result`.
    pub fn from_result(result: &ResolutionResult) -> Self {
        let modules = result
            .by_module
            .iter()
            .map(|(module, types)| {
                let counts = types.iter().map(|(content_type, files)| (*content_type, files.len())).collect();
                (module.clone(), counts)
            })
            .collect();

        let missing_lines = result
            .missing
            .iter()
            .map(|m| format!("{} -> {}", result.relative(&m.source_file), m.reference))
            .collect();

        Self {
            primary: result.primary_files.len(),
            direct: result.dependencies.len(),
            transitive: result.transitive_dependencies.len(),
            total: result.all_files.len(),
            missing: result.missing.len(),
            skipped: result.skipped.len(),
            warnings: result.warnings.len(),
            modules,
            missing_lines,
        }
    }

    /// Count of `content_type` files in `module`.
    pub fn count(&self, module: &str, content_type: ContentType) -> usize {
        self.modules.get(module).and_then(|c| c.get(&content_type)).copied().unwrap_or(0)
    }

    /// Report lines for one module: `Agents: N`, `Tasks: N`, `Templates: N`,
    /// then any other non-empty types.
    fn module_lines(counts: &ModuleCounts) -> Vec<String> {
        let mut lines: Vec<String> = REPORTED_TYPES
            .iter()
            .map(|t| format!("{}: {}", t.label(), counts.get(t).copied().unwrap_or(0)))
            .collect();

        for (content_type, count) in counts {
            if !REPORTED_TYPES.contains(content_type) && *count > 0 {
                lines.push(format!("{}: {}", content_type.label(), count));
            }
        }

        lines
    }
}

impl fmt::Display for ResolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Primary files: {}", self.primary)?;
        writeln!(f, "Direct dependencies: {}", self.direct)?;
        writeln!(f, "Transitive dependencies: {}", self.transitive)?;
        writeln!(f, "Total files: {}", self.total)?;

        for (module, counts) in &self.modules {
            writeln!(f)?;
            writeln!(f, "{}", module.to_uppercase())?;
            for line in Self::module_lines(counts) {
                writeln!(f, "  {line}")?;
            }
        }

        if !self.missing_lines.is_empty() {
            writeln!(f)?;
            writeln!(f, "Missing references: {}", self.missing)?;
            for line in &self.missing_lines {
                writeln!(f, "  {line}")?;
            }
        }

        if self.skipped > 0 {
            writeln!(f)?;
            writeln!(f, "Skipped (localskip): {}", self.skipped)?;
        }

        Ok(())
    }
}

/// Emit the verbose report through `tracing`.
///
/// Module counts go out at info level, missing references and warnings at
/// warn level, all on the `bmad_resolver::report` target.
pub fn log_report(result: &ResolutionResult) {
    let summary = result.summary();

    info!(
        target: "bmad_resolver::report",
        "Resolved {} files ({} primary, {} direct, {} transitive)",
        summary.total,
        summary.primary,
        summary.direct,
        summary.transitive
    );

    for (module, counts) in &summary.modules {
        info!(target: "bmad_resolver::report", "{}", module.to_uppercase());
        for line in ResolutionSummary::module_lines(counts) {
            info!(target: "bmad_resolver::report", "  {}", line);
        }
    }

    for missing in &result.missing {
        warn!(
            target: "bmad_resolver::report",
            "Missing dependency: {} (referenced from {})",
            missing.reference,
            result.relative(&missing.source_file)
        );
    }

    for warning in &result.warnings {
        warn!(
            target: "bmad_resolver::report",
            "{}: {}",
            result.relative(&warning.file),
            warning.message
        );
    }
}
