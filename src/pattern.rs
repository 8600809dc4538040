//! Glob matching for wildcard references and seed exclusions.
//!
//! Two places in the resolver deal with glob patterns:
//!
//! - references such as `../tasks/*.md` or `{project-root}/bmad/core/tasks/*.md`
//!   expand to every existing file they match (an empty expansion is fine);
//! - the `exclude` configuration list keeps matching files out of the primary
//!   seed set.
//!
//! # Pattern Syntax
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match one character from a set or range
//!
//! Matching is done on `/`-separated relative paths with
//! `require_literal_separator`, so `tasks/*.md` does not reach into
//! `tasks/sub/x.md`.

use anyhow::Result;
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::constants::GLOB_CHARS;
use crate::core::ResolverError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled glob pattern matched against paths relative to a base directory.
///
/// # Examples
///
/// ```rust
/// use bmad_resolver::pattern::PatternMatcher;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let matcher = PatternMatcher::new("tasks/*.md")?;
/// assert!(matcher.matches(Path::new("tasks/create-doc.md")));
/// assert!(!matcher.matches(Path::new("tasks/brain-tech/methods.md")));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::InvalidPattern`] for malformed glob syntax.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern_str).map_err(|e| ResolverError::InvalidPattern {
            pattern: pattern_str.to_string(),
            reason: e.msg.to_string(),
        })?;

        Ok(Self {
            pattern,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// Find every regular file below `base_path` whose relative path matches.
    ///
    /// Returns absolute paths in sorted walk order. A base directory that does
    /// not exist yields no matches. Symlinks are not followed.
    pub fn find_matches(&self, base_path: &Path) -> Vec<PathBuf> {
        debug!("Searching for pattern '{}' in {:?}", self.original_pattern, base_path);

        let Ok(base_path) = base_path.canonicalize() else {
            trace!("Base path {:?} does not exist, no matches", base_path);
            return Vec::new();
        };

        let mut matches = Vec::new();
        for entry in WalkDir::new(&base_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            if let Ok(relative_path) = entry.path().strip_prefix(&base_path) {
                trace!("Checking path: {}", relative_path.display());

                if self.matches(relative_path) {
                    matches.push(entry.path().to_path_buf());
                }
            }
        }

        debug!("Found {} matches for pattern '{}'", matches.len(), self.original_pattern);
        matches
    }

    /// Check a relative path against the pattern without touching the filesystem.
    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.matches_with(&to_slash(path), MATCH_OPTIONS)
    }
}

/// Glob expansion with a list of exclusion patterns.
///
/// ```rust
/// use bmad_resolver::pattern::PatternResolver;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let mut resolver = PatternResolver::new();
/// resolver.exclude("_module-installer/**")?;
///
/// assert!(resolver.is_excluded(Path::new("_module-installer/install.js")));
/// assert!(!resolver.is_excluded(Path::new("agents/pm.md")));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternResolver {
    exclude_patterns: Vec<PatternMatcher>,
}

impl PatternResolver {
    /// Create a resolver with no exclusions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            exclude_patterns: Vec::new(),
        }
    }

    /// Build a resolver from a list of exclusion patterns.
    ///
    /// # Errors
    ///
    /// Fails on the first pattern that does not compile.
    pub fn with_exclusions(patterns: &[String]) -> Result<Self> {
        let mut resolver = Self::new();
        for pattern in patterns {
            resolver.exclude(pattern)?;
        }
        Ok(resolver)
    }

    /// Add an exclusion pattern.
    pub fn exclude(&mut self, pattern: &str) -> Result<()> {
        self.exclude_patterns.push(PatternMatcher::new(pattern)?);
        Ok(())
    }

    /// Whether a relative path matches any exclusion pattern.
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.exclude_patterns.iter().any(|exclude| exclude.matches(relative_path))
    }
}

/// Whether a reference string contains glob wildcard characters.
#[must_use]
pub fn is_glob(reference: &str) -> bool {
    reference.contains(GLOB_CHARS)
}

/// Split a glob path into the literal directory prefix and the pattern part.
///
/// `/root/core/tasks/*.md` becomes (`/root/core/tasks`, `*.md`) and
/// `/root/core/**/x?.md` becomes (`/root/core`, `**/x?.md`).
#[must_use]
pub fn split_glob_path(path: &Path) -> (PathBuf, String) {
    let mut base = PathBuf::new();
    let mut pattern_parts: Vec<String> = Vec::new();

    for component in path.components() {
        let text = component.as_os_str().to_string_lossy();
        if pattern_parts.is_empty() && !is_glob(&text) {
            base.push(component.as_os_str());
        } else {
            pattern_parts.push(text.into_owned());
        }
    }

    (base, pattern_parts.join("/"))
}

/// Render a relative path with `/` separators for matching.
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
