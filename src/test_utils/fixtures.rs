//! Content tree fixtures for tests

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Canned artifact files in the shapes the resolver sees in real modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFixture {
    /// Path relative to the module directory
    pub path: String,
    /// File content
    pub content: String,
}

impl ArtifactFixture {
    /// Markdown agent declaring `dependencies` in its front-matter.
    pub fn agent(name: &str, dependencies: &[&str]) -> Self {
        let deps = dependencies.iter().map(|d| format!("\"{d}\"")).collect::<Vec<_>>().join(", ");

        Self {
            path: format!("agents/{name}.md"),
            content: format!(
                r#"---
name: {name}
dependencies: [{deps}]
---

# {name}

<agent id="{name}">
  <activation>Load persona from this file.</activation>
</agent>
"#
            ),
        }
    }

    /// XML task whose steps invoke other files through `exec` attributes.
    pub fn xml_task(name: &str, execs: &[&str]) -> Self {
        let steps = execs
            .iter()
            .enumerate()
            .map(|(i, exec)| format!("  <step n=\"{}\" exec=\"{exec}\">Run</step>", i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            path: format!("tasks/{name}.xml"),
            content: format!("<task id=\"{name}\">\n{steps}\n</task>\n"),
        }
    }

    /// Plain markdown template with no references.
    pub fn template(name: &str) -> Self {
        Self {
            path: format!("templates/{name}.md"),
            content: format!("# {name}\n\n{{{{placeholder}}}}\n"),
        }
    }
}

/// A content root in a temporary directory.
///
/// The root is canonical, so paths returned by the resolver compare equal to
/// paths built from [`ContentTreeFixture::root`]. The directory is removed on
/// drop.
#[derive(Debug)]
pub struct ContentTreeFixture {
    _temp: TempDir,
    root: PathBuf,
}

impl ContentTreeFixture {
    /// Create an empty content root.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temporary directory")?;
        let root = temp.path().canonicalize()?;
        Ok(Self {
            _temp: temp,
            root,
        })
    }

    /// The content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` below the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating parent directories. Returns its absolute path.
    pub fn add_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write an [`ArtifactFixture`] into `module` (installed layout for
    /// anything but `core`). Returns its absolute path.
    pub fn add_artifact(&self, module: &str, artifact: &ArtifactFixture) -> Result<PathBuf> {
        self.add_file(&format!("{module}/{}", artifact.path), &artifact.content)
    }

    /// Create an empty directory, e.g. a module with no artifacts.
    pub fn add_dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}
