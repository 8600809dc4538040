//! Raw reference extraction from artifact text.
//!
//! Recognizes every reference syntax the content corpus uses and returns the
//! raw strings in the order they appear, without touching the filesystem.
//! Nothing downstream needs to know which syntax produced a string.
//!
//! # Supported Reference Types
//!
//! - **Front-matter `dependencies`**: a single string or a list of strings
//! - **Front-matter `template`**: a single string
//! - **Command tokens**: `@task-<name>`, `@agent-<name>`, `@bmad-<name>`
//! - **Module paths**: `bmad/<module>/<type>/<name>[.md]`, optionally behind
//!   `{project-root}/` or `/` (returned as `/bmad/...`)
//! - **Command attributes**: `exec="..."` and `tmpl="..."`; the dynamic value
//!   `*` is skipped and a leading `{project-root}` marker is removed
//! - **Quoted relative paths**: `"./x.md"`, `'../data/y.csv'`
//!
//! # Usage
//!
//! ```rust
//! use bmad_resolver::markdown::reference_extractor::extract_references;
//!
//! let text = r#"---
//! dependencies: ../tasks/create-doc.md
//! ---
//! Run @task-advanced-elicitation, then <c exec="{project-root}/bmad/core/tasks/foo.md"/>.
//! Dynamic: <c exec="*"/>
//! "#;
//!
//! let refs = extract_references(text);
//! assert_eq!(
//!     refs,
//!     vec![
//!         "../tasks/create-doc.md".to_string(),
//!         "@task-advanced-elicitation".to_string(),
//!         "/bmad/core/tasks/foo.md".to_string(),
//!     ]
//! );
//! ```

use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::constants::{DYNAMIC_WILDCARD, PROJECT_ROOT_MARKER, QUOTED_PATH_EXTENSIONS};
use crate::markdown::frontmatter::FrontmatterParser;

/// A reference that no resolution rule could map to an existing file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MissingReference {
    /// The file that contains the broken reference
    pub source_file: PathBuf,

    /// The raw reference string
    pub reference: String,
}

impl MissingReference {
    /// Create a new missing reference record.
    #[must_use]
    pub fn new(source_file: PathBuf, reference: impl Into<String>) -> Self {
        Self {
            source_file,
            reference: reference.into(),
        }
    }
}

/// Everything the extractor learned from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedReferences {
    /// Raw reference strings, deduplicated, in order of appearance
    pub references: Vec<String>,

    /// Whether the file carries a local-skip marker
    pub local_skip: bool,

    /// Parser message when the front-matter block was malformed
    pub frontmatter_error: Option<String>,
}

/// Reference extractor bound to a project-root marker.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    parser: FrontmatterParser,
    project_root_marker: String,
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceExtractor {
    /// Create an extractor using the default `{project-root}` marker.
    #[must_use]
    pub fn new() -> Self {
        Self::with_project_root_marker(PROJECT_ROOT_MARKER)
    }

    /// Create an extractor that strips a custom marker from attribute values.
    #[must_use]
    pub fn with_project_root_marker(marker: impl Into<String>) -> Self {
        Self {
            parser: FrontmatterParser::new(),
            project_root_marker: marker.into(),
        }
    }

    /// Extract all references from a file's text.
    pub fn extract(&self, text: &str) -> ExtractedReferences {
        let parsed = self.parser.parse(text);
        let mut references = Vec::new();

        if let Some(deps) = parsed.get("dependencies") {
            match deps {
                Value::String(s) => references.push(s.clone()),
                Value::Sequence(items) => {
                    references.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
                }
                _ => {}
            }
        }

        if let Some(template) = parsed.get_str("template") {
            references.push(template.to_string());
        }

        references.extend(self.scan_body(&parsed.content));

        let mut seen = HashSet::new();
        references.retain(|r| {
            let trimmed = r.trim();
            !trimmed.is_empty() && trimmed != DYNAMIC_WILDCARD && seen.insert(r.clone())
        });

        ExtractedReferences {
            references,
            local_skip: parsed.is_local_skip() || has_local_skip_attribute(&parsed.content),
            frontmatter_error: parsed.parse_error,
        }
    }

    /// Scan body text, returning matches sorted by their position.
    fn scan_body(&self, body: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();

        if let Some(re) = command_regex() {
            for m in re.find_iter(body) {
                found.push((m.start(), m.as_str().trim_end_matches('-').to_string()));
            }
        }

        if let Some(re) = module_path_regex() {
            for cap in re.captures_iter(body) {
                let (Some(prefix), Some(m)) = (cap.get(1), cap.get(2)) else {
                    continue;
                };
                let path = m.as_str().trim_end_matches(['.', '/']);
                if path.split('/').filter(|s| !s.is_empty()).count() < 4 {
                    continue;
                }

                // `{project-root}/bmad/...` and `/bmad/...` yield the same
                // stripped form as the attribute branch.
                let marker = prefix.as_str().trim_end_matches('/');
                if prefix.as_str().is_empty() {
                    found.push((m.start(), path.to_string()));
                } else if marker.is_empty() || marker == self.project_root_marker {
                    found.push((prefix.start(), format!("/{path}")));
                }
            }
        }

        if let Some(re) = attribute_regex() {
            for cap in re.captures_iter(body) {
                if let Some(m) = cap.get(1) {
                    let value = m.as_str().trim();
                    if value.is_empty() || value == DYNAMIC_WILDCARD {
                        continue;
                    }
                    let value = value.strip_prefix(self.project_root_marker.as_str()).unwrap_or(value);
                    found.push((m.start(), value.to_string()));
                }
            }
        }

        if let Some(re) = quoted_path_regex() {
            for cap in re.captures_iter(body) {
                if let Some(m) = cap.get(1) {
                    found.push((m.start(), m.as_str().to_string()));
                }
            }
        }

        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, s)| s).collect()
    }
}

/// Extract references with the default extractor.
#[must_use]
pub fn extract_references(text: &str) -> Vec<String> {
    ReferenceExtractor::new().extract(text).references
}

/// Only the first element tag counts, so prose or later examples that
/// mention the attribute do not mark the file.
fn has_local_skip_attribute(body: &str) -> bool {
    let Some(tag) = root_tag_regex().and_then(|re| re.find(body)) else {
        return false;
    };
    local_skip_attribute_regex().is_some_and(|re| re.is_match(tag.as_str()))
}

fn root_tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[A-Za-z][\w:.-]*(?:\s[^>]*)?>").ok()).as_ref()
}

fn local_skip_attribute_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\slocalskip\s*=\s*"true""#).ok()).as_ref()
}

fn command_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(?:task|agent|bmad)-[A-Za-z0-9_-]+").ok()).as_ref()
}

fn module_path_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // Group 1 is an optional `{marker}/` or `/` prefix; the token itself must
    // not continue another path.
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^\w/.{}-])((?:\{[^}\s]+\})?/?)(bmad/[\w-]+/[\w-]+/[\w./-]+)").ok()
    })
    .as_ref()
}

fn attribute_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\b(?:exec|tmpl)="([^"]*)""#).ok()).as_ref()
}

fn quoted_path_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let extensions = QUOTED_PATH_EXTENSIONS.join("|");
        Regex::new(&format!(r#"["'](\.\.?/[^"'\s]+\.(?:{extensions}))["']"#)).ok()
    })
    .as_ref()
}
