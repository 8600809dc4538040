//! Mapping raw reference strings to existing files.
//!
//! Rules are tried in order; the first one that produces files wins:
//!
//! 1. **Module path** `{project-root}/bmad/<module>/<rest>` or `/bmad/<module>/<rest>`:
//!    mapped into that module's directory, expanded if it is a glob.
//! 2. **Relative path** `./x`, `../x` (or any other plain relative path):
//!    resolved against the referencing file's directory, expanded if it is a
//!    glob.
//! 3. **Command name** `@task-<name>`, `@agent-<name>`, `@bmad-<name>`,
//!    `bmad/<module>/<type>/<name>`: searched in the named module (if any),
//!    then each requested module, then `core`; the default extension is
//!    appended when the name has none. First match wins.
//!
//! A glob that matches nothing is [`Resolution::NoMatches`], not a missing
//! reference. Everything else that finds no file is [`Resolution::Missing`].

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::constants::{BMAD_PATH_PREFIX, CORE_MODULE, DOCUMENT_EXTENSIONS};
use crate::core::ContentType;
use crate::pattern::{PatternMatcher, is_glob, split_glob_path};
use crate::resolver::module_organizer::ModuleLayout;
use crate::utils::{existing_file, normalize_path};

/// Outcome of resolving one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical paths of the files the reference names
    Found(Vec<PathBuf>),
    /// A glob reference that matched no file
    NoMatches,
    /// No rule produced a file
    Missing,
}

impl Resolution {
    /// Resolved paths; empty unless [`Resolution::Found`].
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::Found(paths) => paths,
            _ => &[],
        }
    }

    /// Whether the reference should be reported as missing.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    fn from_glob(paths: Vec<PathBuf>) -> Self {
        if paths.is_empty() { Self::NoMatches } else { Self::Found(paths) }
    }
}

/// A command-style reference broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CommandTarget {
    module: Option<String>,
    folder: String,
    name: String,
}

/// Resolves references against one content root and module selection.
#[derive(Debug, Clone)]
pub struct PathResolver {
    layout: ModuleLayout,
    requested_modules: Vec<String>,
    default_extension: String,
    project_root_marker: String,
}

impl PathResolver {
    /// Create a resolver.
    ///
    /// `requested_modules` sets the search priority for command references;
    /// `core` is always searched last.
    pub fn new(
        layout: ModuleLayout,
        requested_modules: &[String],
        default_extension: impl Into<String>,
        project_root_marker: impl Into<String>,
    ) -> Self {
        let mut modules: Vec<String> = Vec::new();
        for module in requested_modules {
            if module != CORE_MODULE && !modules.contains(module) {
                modules.push(module.clone());
            }
        }

        Self {
            layout,
            requested_modules: modules,
            default_extension: default_extension.into(),
            project_root_marker: project_root_marker.into(),
        }
    }

    /// The layout this resolver searches.
    pub fn layout(&self) -> &ModuleLayout {
        &self.layout
    }

    /// Resolve `reference` found in a file located in `referrer_dir`.
    pub async fn resolve(&self, reference: &str, referrer_dir: &Path) -> Resolution {
        let reference = reference.trim();
        if reference.is_empty() {
            return Resolution::Missing;
        }

        let unmarked = reference.strip_prefix(self.project_root_marker.as_str()).unwrap_or(reference);

        if let Some(rest) = unmarked.strip_prefix('/').and_then(|r| r.strip_prefix(BMAD_PATH_PREFIX)) {
            let resolution = self.resolve_module_path(rest).await;
            if !resolution.is_missing() {
                return resolution;
            }
        } else if is_relative_reference(unmarked) {
            let resolution = self.resolve_relative(unmarked, referrer_dir).await;
            if !resolution.is_missing() {
                return resolution;
            }
        }

        match self.parse_command(unmarked) {
            Some(target) => self.resolve_command(&target).await,
            None => {
                debug!("No rule resolved reference '{}'", reference);
                Resolution::Missing
            }
        }
    }

    /// Rule 1: `<module>/<rest>` below the module's directory.
    async fn resolve_module_path(&self, rest: &str) -> Resolution {
        let Some((module, tail)) = rest.split_once('/') else {
            return Resolution::Missing;
        };
        let Some(module_dir) = self.layout.module_dir(module) else {
            trace!("Module '{}' not present for module path", module);
            return Resolution::Missing;
        };

        let target = normalize_path(&module_dir.join(tail));
        if is_glob(tail) {
            return Resolution::from_glob(expand_glob(&target));
        }

        self.existing_with_default_extension(&target).await
    }

    /// Rule 2: relative to the referencing file.
    async fn resolve_relative(&self, reference: &str, referrer_dir: &Path) -> Resolution {
        let target = normalize_path(&referrer_dir.join(reference));
        if is_glob(reference) {
            return Resolution::from_glob(expand_glob(&target));
        }

        self.existing_with_default_extension(&target).await
    }

    /// Rule 3: search modules in priority order.
    async fn resolve_command(&self, target: &CommandTarget) -> Resolution {
        for module in self.search_order(target.module.as_deref()) {
            let Some(module_dir) = self.layout.module_dir(&module) else {
                continue;
            };
            let candidate = normalize_path(&module_dir.join(&target.folder).join(&target.name));

            if is_glob(&target.name) {
                let matches = expand_glob(&candidate);
                if !matches.is_empty() {
                    return Resolution::Found(matches);
                }
                continue;
            }

            if let Resolution::Found(paths) = self.existing_with_default_extension(&candidate).await {
                debug!("Resolved {}/{}/{} in module '{}'", module, target.folder, target.name, module);
                return Resolution::Found(paths);
            }
        }

        if is_glob(&target.name) { Resolution::NoMatches } else { Resolution::Missing }
    }

    /// Explicit module, then requested modules, then `core`, without repeats.
    fn search_order(&self, explicit: Option<&str>) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        let candidates = explicit
            .into_iter()
            .map(str::to_string)
            .chain(self.requested_modules.iter().cloned())
            .chain(std::iter::once(CORE_MODULE.to_string()));

        for module in candidates {
            if !order.contains(&module) {
                order.push(module);
            }
        }
        order
    }

    /// Check `path`; when it has no extension, try the default extension and
    /// then the other document extensions.
    async fn existing_with_default_extension(&self, path: &Path) -> Resolution {
        if let Some(found) = existing_file(path).await {
            return Resolution::Found(vec![found]);
        }

        if path.extension().is_none() {
            let extensions = std::iter::once(self.default_extension.as_str())
                .chain(DOCUMENT_EXTENSIONS.iter().copied().filter(|e| *e != self.default_extension));

            for extension in extensions {
                let mut with_ext = path.as_os_str().to_owned();
                with_ext.push(".");
                with_ext.push(extension);
                if let Some(found) = existing_file(Path::new(&with_ext)).await {
                    return Resolution::Found(vec![found]);
                }
            }
        }

        trace!("No file at {}", path.display());
        Resolution::Missing
    }

    fn parse_command(&self, reference: &str) -> Option<CommandTarget> {
        if let Some(name) = reference.strip_prefix("@task-") {
            return Some(CommandTarget {
                module: None,
                folder: ContentType::Task.folder_name().to_string(),
                name: name.to_string(),
            });
        }

        if let Some(name) = reference.strip_prefix("@agent-") {
            return Some(CommandTarget {
                module: None,
                folder: ContentType::Agent.folder_name().to_string(),
                name: name.to_string(),
            });
        }

        if let Some(rest) = reference.strip_prefix("@bmad-") {
            return Some(self.parse_bmad_command(rest));
        }

        let path = reference.strip_prefix('/').unwrap_or(reference);
        let rest = path.strip_prefix(BMAD_PATH_PREFIX)?;
        let mut parts = rest.splitn(3, '/');
        let module = parts.next().filter(|s| !s.is_empty())?;
        let folder = parts.next().filter(|s| !s.is_empty())?;
        let name = parts.next().filter(|s| !s.is_empty())?;

        Some(CommandTarget {
            module: Some(module.to_string()),
            folder: folder.to_string(),
            name: name.to_string(),
        })
    }

    /// `@bmad-<module>-<type>-<name>` when the parts name an existing module and
    /// a content folder; otherwise the agent `bmad-<rest>`.
    fn parse_bmad_command(&self, rest: &str) -> CommandTarget {
        let parts: Vec<&str> = rest.splitn(3, '-').collect();
        if let [module, folder, name] = parts.as_slice() {
            let qualified = ContentType::from_folder(folder) != ContentType::Other
                && !name.is_empty()
                && self.layout.has_module(module);
            if qualified {
                return CommandTarget {
                    module: Some((*module).to_string()),
                    folder: (*folder).to_string(),
                    name: (*name).to_string(),
                };
            }
        }

        CommandTarget {
            module: None,
            folder: ContentType::Agent.folder_name().to_string(),
            name: format!("bmad-{rest}"),
        }
    }
}

fn is_relative_reference(reference: &str) -> bool {
    if reference.starts_with("./") || reference.starts_with("../") {
        return true;
    }

    !reference.starts_with(['@', '/', '{'])
        && !reference.starts_with(BMAD_PATH_PREFIX)
        && !reference.contains("://")
        && Path::new(reference).is_relative()
}

fn expand_glob(target: &Path) -> Vec<PathBuf> {
    let (base, pattern) = split_glob_path(target);
    match PatternMatcher::new(&pattern) {
        Ok(matcher) => matcher.find_matches(&base),
        Err(e) => {
            debug!("Skipping unusable glob '{}': {}", target.display(), e);
            Vec::new()
        }
    }
}
