//! Tolerant front-matter parsing for artifact files.
//!
//! Artifact files may open with a YAML block delimited by `---` lines. The
//! corpus is hand-written, so the block is frequently broken: backtick-quoted
//! values, unbalanced brackets, half-finished lists. Parsing therefore never
//! fails. It degrades in three steps:
//!
//! 1. Backtick-quoted values are rewritten to double-quoted strings.
//! 2. The whole block is parsed as a YAML mapping.
//! 3. If that fails, each top-level key is parsed on its own and the keys that
//!    survive are kept. The parse error is reported on the result.
//!
//! # Example
//!
//! ```rust
//! use bmad_resolver::markdown::frontmatter::FrontmatterParser;
//!
//! let parser = FrontmatterParser::new();
//! let parsed = parser.parse("---\ntemplate: `../templates/prd.md`\n---\n# PM\n");
//!
//! assert!(parsed.has_frontmatter());
//! assert_eq!(parsed.get_str("template"), Some("../templates/prd.md"));
//! assert_eq!(parsed.content.trim(), "# PM");
//! ```

use gray_matter::{Matter, Pod, engine::Engine};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::fmt::Debug;
use std::sync::OnceLock;

/// Custom gray_matter engine that returns raw frontmatter text without parsing.
///
/// The YAML engine shipped with gray_matter rejects the whole document on the
/// first syntax error; this one hands back the text so it can be repaired and
/// parsed key by key.
struct RawFrontmatter;

impl Engine for RawFrontmatter {
    fn parse(content: &str) -> Result<Pod, gray_matter::Error> {
        Ok(Pod::String(content.to_string()))
    }
}

/// Result of splitting and parsing one document.
#[derive(Debug, Clone, Default)]
pub struct ParsedFrontmatter {
    /// Parsed top-level keys, if a block was present and at least one key parsed.
    pub data: Option<Mapping>,

    /// The document body with the front-matter block removed.
    pub content: String,

    /// The raw block text as it appeared in the file.
    pub raw_frontmatter: Option<String>,

    /// Parser message when the block did not parse as a whole.
    pub parse_error: Option<String>,
}

impl ParsedFrontmatter {
    /// Check if a front-matter block was present in the original content.
    pub fn has_frontmatter(&self) -> bool {
        self.raw_frontmatter.is_some()
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.as_ref()?.get(key)
    }

    /// Look up a top-level key holding a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Whether the block carries `localskip: true`.
    pub fn is_local_skip(&self) -> bool {
        match self.get("localskip") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Front-matter splitter and tolerant YAML parser.
pub struct FrontmatterParser {
    raw_matter: Matter<RawFrontmatter>,
}

impl Clone for FrontmatterParser {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Debug for FrontmatterParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontmatterParser").finish()
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmatterParser {
    /// Create a new frontmatter parser.
    pub fn new() -> Self {
        Self {
            raw_matter: Matter::new(),
        }
    }

    /// Split `content` into front-matter and body and parse the front-matter.
    ///
    /// Never fails; see the module docs for how broken blocks degrade.
    pub fn parse(&self, content: &str) -> ParsedFrontmatter {
        let raw_frontmatter = self.extract_raw_frontmatter(content);
        let body = self.strip_frontmatter(content);

        let Some(raw) = raw_frontmatter.as_deref() else {
            return ParsedFrontmatter {
                data: None,
                content: body,
                raw_frontmatter: None,
                parse_error: None,
            };
        };

        let (data, parse_error) = parse_tolerant(&preprocess_backticks(raw));

        ParsedFrontmatter {
            data,
            content: body,
            raw_frontmatter,
            parse_error,
        }
    }

    /// Extract just the content without frontmatter.
    pub fn strip_frontmatter(&self, content: &str) -> String {
        self.raw_matter
            .parse::<String>(content)
            .map(|result| result.content)
            .unwrap_or_else(|_| content.to_string())
    }

    /// Extract just the raw frontmatter string, if a non-empty block is present.
    pub fn extract_raw_frontmatter(&self, content: &str) -> Option<String> {
        match self.raw_matter.parse::<String>(content) {
            Ok(result) => result.data.filter(|text| !text.trim().is_empty()),
            Err(_) => None,
        }
    }
}

fn backtick_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`\n]*)`").ok()).as_ref()
}

/// Rewrite backtick-quoted values as double-quoted YAML strings.
///
/// `` name: `x` `` becomes `name: "x"` and `` [`a`, `b`] `` becomes `["a", "b"]`.
#[must_use]
pub fn preprocess_backticks(yaml: &str) -> String {
    let Some(re) = backtick_regex() else {
        return yaml.to_string();
    };

    re.replace_all(yaml, |caps: &regex::Captures<'_>| {
        let inner = caps[1].replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{inner}\"")
    })
    .into_owned()
}

/// Parse a block as a mapping, falling back to key-by-key parsing.
fn parse_tolerant(yaml: &str) -> (Option<Mapping>, Option<String>) {
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => (Some(mapping), None),
        Ok(Value::Null) => (None, None),
        Ok(other) => (None, Some(format!("front-matter is not a mapping (found {})", kind_of(&other)))),
        Err(e) => {
            let mut merged = Mapping::new();
            for block in split_top_level_keys(yaml) {
                if let Ok(Value::Mapping(mapping)) = serde_yaml::from_str::<Value>(&block) {
                    merged.extend(mapping);
                }
            }
            let data = if merged.is_empty() { None } else { Some(merged) };
            (data, Some(e.to_string()))
        }
    }
}

/// Split YAML text into chunks that each start at a top-level `key:` line.
fn split_top_level_keys(yaml: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();

    for line in yaml.lines() {
        let starts_key = line
            .chars()
            .next()
            .is_some_and(|c| !c.is_whitespace() && c != '-' && c != '#')
            && line.contains(':');

        match blocks.last_mut() {
            Some(block) if !starts_key => {
                block.push('\n');
                block.push_str(line);
            }
            _ => blocks.push(line.to_string()),
        }
    }

    blocks
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
