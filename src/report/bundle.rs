//! Single consolidated view of a resolution, grouped by content type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::ResolutionResult;
use crate::core::ContentType;
use crate::resolver::module_organizer::{module_of, type_of};

/// One file in a bundle section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleEntry {
    /// Path relative to the content root
    pub path: String,
    /// Canonical path
    pub absolute_path: PathBuf,
    /// Owning module; `None` for files outside the content root
    pub module: Option<String>,
    /// Content type
    pub content_type: ContentType,
}

/// Header of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleMetadata {
    /// Modules that took part in the resolution
    pub modules: Vec<String>,
    /// Number of files across all sections
    pub total_files: usize,
    /// When the bundle view was built
    pub generated_at: DateTime<Utc>,
}

/// All resolved files grouped by type across modules.
#[derive(Debug, Clone, Serialize)]
pub struct BundleView {
    pub metadata: BundleMetadata,
    pub agents: Vec<BundleEntry>,
    pub tasks: Vec<BundleEntry>,
    pub templates: Vec<BundleEntry>,
    pub tools: Vec<BundleEntry>,
    pub data: Vec<BundleEntry>,
    pub other: Vec<BundleEntry>,
}

impl BundleView {
    /// Group `result.all_files`; local-skip files are never part of it.
    pub fn from_result(result: &ResolutionResult) -> Self {
        let mut view = Self {
            metadata: BundleMetadata {
                modules: result.modules.clone(),
                total_files: 0,
                generated_at: Utc::now(),
            },
            agents: Vec::new(),
            tasks: Vec::new(),
            templates: Vec::new(),
            tools: Vec::new(),
            data: Vec::new(),
            other: Vec::new(),
        };

        for path in &result.all_files {
            let content_type = type_of(&result.root, path);
            let entry = BundleEntry {
                path: result.relative(path),
                absolute_path: path.clone(),
                module: module_of(&result.root, path),
                content_type,
            };
            view.section_mut(content_type).push(entry);
        }

        view.metadata.total_files = result.all_files.len();
        view
    }

    /// Entries of one content type.
    pub fn section(&self, content_type: ContentType) -> &[BundleEntry] {
        match content_type {
            ContentType::Agent => &self.agents,
            ContentType::Task => &self.tasks,
            ContentType::Template => &self.templates,
            ContentType::Tool => &self.tools,
            ContentType::Data => &self.data,
            ContentType::Other => &self.other,
        }
    }

    fn section_mut(&mut self, content_type: ContentType) -> &mut Vec<BundleEntry> {
        match content_type {
            ContentType::Agent => &mut self.agents,
            ContentType::Task => &mut self.tasks,
            ContentType::Template => &mut self.templates,
            ContentType::Tool => &mut self.tools,
            ContentType::Data => &mut self.data,
            ContentType::Other => &mut self.other,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
