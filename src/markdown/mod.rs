//! Artifact text processing.
//!
//! Artifact files are plain text (Markdown with embedded XML-ish command tags,
//! sometimes YAML) that may open with a YAML front-matter block. This module
//! splits and parses that block and pulls raw dependency references out of the
//! whole document.
//!
//! - [`frontmatter`]: block splitting and tolerant YAML parsing
//! - [`reference_extractor`]: every reference syntax, returned as raw strings

pub mod frontmatter;
pub mod reference_extractor;

pub use frontmatter::{FrontmatterParser, ParsedFrontmatter};
pub use reference_extractor::{
    ExtractedReferences, MissingReference, ReferenceExtractor, extract_references,
};
