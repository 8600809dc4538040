//! Global constants used throughout the resolver.
//!
//! Reference syntax markers, folder names, and extension lists that several
//! modules must agree on live here so the extractor, the path resolver, and the
//! module organizer never drift apart.

/// Name of the module that is always part of every resolution.
pub const CORE_MODULE: &str = "core";

/// Folder that holds feature modules in the source tree layout
/// (`<root>/modules/<name>`). The installed layout puts modules directly
/// under the root.
pub const MODULES_DIR: &str = "modules";

/// Marker that stands for the consumer project root in references such as
/// `{project-root}/bmad/core/tasks/foo.md`.
pub const PROJECT_ROOT_MARKER: &str = "{project-root}";

/// Path segment that introduces a module-qualified reference
/// (`bmad/<module>/<type>/<name>`).
pub const BMAD_PATH_PREFIX: &str = "bmad/";

/// Extension appended to command-style references that carry none.
pub const DEFAULT_EXTENSION: &str = "md";

/// Extensions of files whose text is scanned for references.
///
/// The same list decides whether a file nested below `tasks/<sub>/` is a task
/// document or auxiliary data.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md", "xml", "yaml", "yml"];

/// Extensions accepted for quoted relative paths found in body text.
pub const QUOTED_PATH_EXTENSIONS: &[&str] =
    &["md", "xml", "yaml", "yml", "json", "csv", "txt", "js", "sh", "py"];

/// Characters that turn a reference into a glob pattern.
pub const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Attribute value that means "resolved dynamically at run time".
pub const DYNAMIC_WILDCARD: &str = "*";

/// Default name of the configuration file looked up in the content root.
pub const CONFIG_FILE_NAME: &str = "bmad-resolver.toml";

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "BMAD_RESOLVER_CONFIG";

/// Returns `true` if the extension (without dot) names a document file.
#[must_use]
pub fn is_document_extension(extension: &str) -> bool {
    DOCUMENT_EXTENSIONS.iter().any(|ext| ext.eq_ignore_ascii_case(extension))
}
