//! Platform helpers for user-supplied paths.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Expand `~` and environment variables in a path given on the command line.
///
/// ```rust
/// use bmad_resolver::utils::resolve_path;
///
/// let path = resolve_path("./content").unwrap();
/// assert_eq!(path, std::path::PathBuf::from("./content"));
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand path: {path}\n\n\
            Common issues:\n\
            - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
            - Invalid variable syntax (use $VAR or ${{VAR}})"
        )
    })?;

    Ok(PathBuf::from(expanded.into_owned()))
}
