//! Module and content-type classification.
//!
//! A content root comes in one of two shapes:
//!
//! ```text
//! source layout              installed layout
//! root/                      root/
//! ├── core/                  ├── core/
//! │   ├── agents/            │   ├── agents/
//! │   └── tasks/             │   └── tasks/
//! └── modules/               └── bmm/
//!     └── bmm/                   ├── agents/
//!         ├── agents/            └── templates/
//!         └── templates/
//! ```
//!
//! [`ModuleLayout`] detects the shape once and answers which module owns a
//! path and which [`ContentType`] bucket it falls into. The same rules are
//! used for seeding, resolving and reporting, so classification never drifts
//! between components.

use std::path::{Component, Path, PathBuf};

use crate::constants::{CORE_MODULE, MODULES_DIR, is_document_extension};
use crate::core::ContentType;

/// Shape of a content root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// `core/` plus `modules/<name>/`
    Source,
    /// `core/` plus `<name>/` directly under the root
    Installed,
}

/// Classification rules bound to one content root.
#[derive(Debug, Clone)]
pub struct ModuleLayout {
    root: PathBuf,
    kind: LayoutKind,
}

impl ModuleLayout {
    /// Detect the layout of `root`. The root should already be canonical.
    pub fn detect(root: &Path) -> Self {
        let kind = if root.join(MODULES_DIR).is_dir() { LayoutKind::Source } else { LayoutKind::Installed };

        Self {
            root: root.to_path_buf(),
            kind,
        }
    }

    /// The content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The detected layout shape.
    pub const fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Directory of a module, if it exists.
    ///
    /// `modules/<name>` is tried before `<name>` so both shapes work even when
    /// a tree mixes them.
    pub fn module_dir(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." || name == "." {
            return None;
        }

        let candidates = if name == CORE_MODULE {
            vec![self.root.join(CORE_MODULE)]
        } else {
            vec![self.root.join(MODULES_DIR).join(name), self.root.join(name)]
        };

        candidates.into_iter().find(|dir| dir.is_dir())
    }

    /// Whether a module directory exists for `name`.
    pub fn has_module(&self, name: &str) -> bool {
        self.module_dir(name).is_some()
    }

    /// Names of all modules present under the root, sorted.
    ///
    /// Directories starting with `.` or `_` (installer config, caches) are not
    /// modules.
    pub fn module_names(&self) -> Vec<String> {
        let mut names = Vec::new();

        let mut scan = |dir: &Path| {
            if let Ok(entries) = std::fs::read_dir(dir) {
                for entry in entries.filter_map(std::result::Result::ok) {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if entry.path().is_dir()
                        && !name.starts_with(['.', '_'])
                        && name != MODULES_DIR
                        && !names.contains(&name)
                    {
                        names.push(name);
                    }
                }
            }
        };

        scan(&self.root);
        if self.kind == LayoutKind::Source {
            scan(&self.root.join(MODULES_DIR));
        }

        names.sort();
        names
    }

    /// Module that owns `path`, or `None` for paths outside the root.
    pub fn module_of(&self, path: &Path) -> Option<String> {
        module_of(&self.root, path)
    }

    /// Content type of `path`; paths outside the root are [`ContentType::Other`].
    pub fn type_of(&self, path: &Path) -> ContentType {
        type_of(&self.root, path)
    }

    /// Module and content type together.
    pub fn classify(&self, path: &Path) -> Option<(String, ContentType)> {
        let module = self.module_of(path)?;
        Some((module, self.type_of(path)))
    }
}

/// Segments of `path` after the module name, or `None` outside the root.
fn segments_after_module<'a>(root: &Path, path: &'a Path) -> Option<(String, Vec<&'a str>)> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    if segments.first() == Some(&MODULES_DIR) && segments.len() > 1 {
        segments.remove(0);
    }

    if segments.is_empty() {
        return None;
    }

    let module = segments.remove(0).to_string();
    Some((module, segments))
}

/// Module name owning `path` under `root`.
///
/// Unknown module names are returned verbatim.
///
/// ```rust
/// use bmad_resolver::resolver::module_organizer::module_of;
/// use std::path::Path;
///
/// let root = Path::new("/content");
/// assert_eq!(module_of(root, Path::new("/content/modules/bmm/agents/pm.md")).as_deref(), Some("bmm"));
/// assert_eq!(module_of(root, Path::new("/content/core/tasks/a.md")).as_deref(), Some("core"));
/// assert_eq!(module_of(root, Path::new("/elsewhere/a.md")), None);
/// ```
pub fn module_of(root: &Path, path: &Path) -> Option<String> {
    segments_after_module(root, path).map(|(module, _)| module)
}

/// Content type of `path` under `root`.
///
/// The folder right after the module decides the type. A non-document file
/// nested below a sub-folder of `tasks` is [`ContentType::Data`].
///
/// ```rust
/// use bmad_resolver::core::ContentType;
/// use bmad_resolver::resolver::module_organizer::type_of;
/// use std::path::Path;
///
/// let root = Path::new("/content");
/// assert_eq!(type_of(root, Path::new("/content/core/tasks/a.md")), ContentType::Task);
/// assert_eq!(type_of(root, Path::new("/content/core/tasks/brain-tech/data.csv")), ContentType::Data);
/// assert_eq!(type_of(root, Path::new("/content/core/workflows/x.md")), ContentType::Other);
/// ```
pub fn type_of(root: &Path, path: &Path) -> ContentType {
    let Some((_, rest)) = segments_after_module(root, path) else {
        return ContentType::Other;
    };

    // The file itself sits directly in the module directory
    if rest.len() < 2 {
        return ContentType::Other;
    }

    let content_type = ContentType::from_folder(rest[0]);

    if content_type == ContentType::Task && rest.len() >= 3 {
        let is_document = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(is_document_extension);
        if !is_document {
            return ContentType::Data;
        }
    }

    content_type
}
