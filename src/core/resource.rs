//! Content type classification for artifact files.
//!
//! Every file under a module belongs to exactly one [`ContentType`], derived
//! from the folder that immediately follows the module directory:
//!
//! | Folder       | Content type            |
//! |--------------|-------------------------|
//! | `agents`     | [`ContentType::Agent`]    |
//! | `tasks`      | [`ContentType::Task`] (or [`ContentType::Data`], see below) |
//! | `templates`  | [`ContentType::Template`] |
//! | `tools`      | [`ContentType::Tool`]     |
//! | `data`       | [`ContentType::Data`]     |
//! | anything else| [`ContentType::Other`]    |
//!
//! Non-document files nested in a sub-folder of `tasks` (for example
//! `tasks/brain-tech/methods.csv`) are auxiliary data rather than tasks; that
//! rule lives in [`crate::resolver::module_organizer`].
//!
//! # Examples
//!
//! ```rust
//! use bmad_resolver::core::ContentType;
//!
//! let task: ContentType = "tasks".parse().unwrap();
//! assert_eq!(task, ContentType::Task);
//! assert_eq!(task.folder_name(), "tasks");
//! assert_eq!(task.to_string(), "task");
//!
//! let json = serde_json::to_string(&ContentType::Template).unwrap();
//! assert_eq!(json, "\"template\"");
//! ```

use serde::{Deserialize, Serialize};

/// The functional category of an artifact file.
///
/// Ordering follows the order types are listed in reports and bundles
/// (agents first, the generic bucket last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Persona definitions that drive an assistant.
    Agent,
    /// Reusable procedures invoked by agents.
    Task,
    /// Document skeletons filled in by tasks.
    Template,
    /// Helper tool descriptions.
    Tool,
    /// Auxiliary data (tabular files, knowledge bases).
    Data,
    /// Files in folders the resolver does not recognize.
    Other,
}

impl ContentType {
    /// All content types in report order.
    pub const ALL: [ContentType; 6] = [
        ContentType::Agent,
        ContentType::Task,
        ContentType::Template,
        ContentType::Tool,
        ContentType::Data,
        ContentType::Other,
    ];

    /// The folder (and bucket) name used for this type: `agents`, `tasks`, ...
    #[must_use]
    pub const fn folder_name(&self) -> &'static str {
        match self {
            ContentType::Agent => "agents",
            ContentType::Task => "tasks",
            ContentType::Template => "templates",
            ContentType::Tool => "tools",
            ContentType::Data => "data",
            ContentType::Other => "other",
        }
    }

    /// Human-readable plural label used in reports (`Agents`, `Tasks`, ...).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            ContentType::Agent => "Agents",
            ContentType::Task => "Tasks",
            ContentType::Template => "Templates",
            ContentType::Tool => "Tools",
            ContentType::Data => "Data",
            ContentType::Other => "Other",
        }
    }

    /// Maps a folder name to its content type.
    ///
    /// Unknown folders fall back to [`ContentType::Other`] instead of failing,
    /// so custom module layouts never break classification.
    #[must_use]
    pub fn from_folder(folder: &str) -> Self {
        match folder {
            "agents" => ContentType::Agent,
            "tasks" => ContentType::Task,
            "templates" => ContentType::Template,
            "tools" => ContentType::Tool,
            "data" => ContentType::Data,
            _ => ContentType::Other,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Agent => write!(f, "agent"),
            ContentType::Task => write!(f, "task"),
            ContentType::Template => write!(f, "template"),
            ContentType::Tool => write!(f, "tool"),
            ContentType::Data => write!(f, "data"),
            ContentType::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = crate::core::ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agent" | "agents" => Ok(ContentType::Agent),
            "task" | "tasks" => Ok(ContentType::Task),
            "template" | "templates" => Ok(ContentType::Template),
            "tool" | "tools" => Ok(ContentType::Tool),
            "data" => Ok(ContentType::Data),
            "other" => Ok(ContentType::Other),
            _ => Err(crate::core::ResolverError::InvalidContentType {
                content_type: s.to_string(),
            }),
        }
    }
}
