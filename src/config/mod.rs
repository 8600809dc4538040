//! Resolver configuration.
//!
//! Settings live in the `[resolver]` table of a TOML file:
//!
//! ```toml
//! [resolver]
//! default_extension = "md"
//! seed_types = ["agent", "task", "template", "tool", "data"]
//! exclude = ["_module-installer/**"]
//! project_root_marker = "{project-root}"
//! ```
//!
//! Every key is optional. The file is looked up in this order, first hit wins:
//!
//! 1. an explicit path (`--config`)
//! 2. the `BMAD_RESOLVER_CONFIG` environment variable
//! 3. `<content-root>/bmad-resolver.toml`
//! 4. `<user config dir>/bmad-resolver/config.toml`
//!
//! When none exists the defaults apply. An explicit path that does not exist
//! is an error, as is any file that fails to parse.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_EXTENSION, PROJECT_ROOT_MARKER};
use crate::core::{ContentType, ResolverError};
use crate::pattern::PatternMatcher;

/// Settings that shape a resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Extension appended to command references that carry none (without dot).
    pub default_extension: String,

    /// Content types whose files are seeded as primary files.
    pub seed_types: Vec<ContentType>,

    /// Glob patterns, relative to a module directory, never seeded.
    pub exclude: Vec<String>,

    /// Marker standing for the consumer project root in references.
    pub project_root_marker: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_extension: DEFAULT_EXTENSION.to_string(),
            seed_types: vec![
                ContentType::Agent,
                ContentType::Task,
                ContentType::Template,
                ContentType::Tool,
                ContentType::Data,
            ],
            exclude: vec!["_module-installer/**".to_string()],
            project_root_marker: PROJECT_ROOT_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    resolver: ResolverConfig,
}

impl ResolverConfig {
    /// Load configuration for `content_root` following the lookup order.
    ///
    /// # Errors
    ///
    /// - [`ResolverError::ConfigError`] if `explicit` does not exist or the
    ///   loaded values are invalid
    /// - [`ResolverError::ConfigParseError`] if a file is not valid TOML
    pub async fn load(content_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ResolverError::ConfigError {
                    message: format!("configuration file not found: {}", path.display()),
                }
                .into());
            }
            return Self::load_from(path).await;
        }

        for candidate in Self::candidate_paths(content_root) {
            if candidate.is_file() {
                return Self::load_from(&candidate).await;
            }
            debug!("No configuration at {}", candidate.display());
        }

        Ok(Self::default())
    }

    /// Load and validate configuration from one file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ResolverError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = file.resolver.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Implicit lookup locations after the explicit path.
    pub fn candidate_paths(content_root: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(from_env) = std::env::var(CONFIG_ENV_VAR).ok().filter(|v| !v.is_empty()) {
            paths.push(PathBuf::from(from_env));
        }

        paths.push(content_root.join(CONFIG_FILE_NAME));

        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("bmad-resolver").join("config.toml"));
        }

        paths
    }

    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.default_extension.is_empty() {
            return Err(ResolverError::ConfigError {
                message: "default_extension must not be empty".to_string(),
            }
            .into());
        }

        if self.project_root_marker.trim().is_empty() {
            return Err(ResolverError::ConfigError {
                message: "project_root_marker must not be empty".to_string(),
            }
            .into());
        }

        for pattern in &self.exclude {
            PatternMatcher::new(pattern)?;
        }

        Ok(())
    }

    /// Whether files of `content_type` are seeded as primary files.
    pub fn seeds(&self, content_type: ContentType) -> bool {
        self.seed_types.contains(&content_type)
    }

    fn normalized(mut self) -> Self {
        self.default_extension = self.default_extension.trim_start_matches('.').to_string();
        self
    }
}
