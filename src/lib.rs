//! bmad-resolver - transitive artifact resolution for BMAD content trees
//!
//! A BMAD content tree is organized into modules (`core` plus optional ones
//! such as `bmm` or `cis`), each holding agents, tasks, templates, tools and
//! data files. Those files reference each other in several textual syntaxes.
//! Given a content root and a module selection, this crate computes the full
//! set of files the selection needs, following references across modules
//! until nothing new is found.
//!
//! # Architecture Overview
//!
//! Resolution runs as a pipeline:
//!
//! 1. [`markdown`] extracts raw reference strings from one file
//!    (front-matter `dependencies`/`template`, `@task-x` style commands,
//!    `bmad/<module>/...` paths, `exec`/`tmpl` attributes, quoted relative
//!    paths)
//! 2. [`resolver::path_resolver`] maps each string to zero or more existing
//!    files
//! 3. [`resolver`] drives a breadth-first walk over those references with a
//!    per-call visited set, so cycles and diamonds terminate
//! 4. [`report`] classifies every file by module and content type using
//!    [`resolver::module_organizer`]
//!
//! # Core Modules
//!
//! - [`cli`] - `resolve`, `bundle`, `tree` and `refs` subcommands
//! - [`config`] - `bmad-resolver.toml` loading
//! - [`core`] - content types and error handling
//! - [`markdown`] - front-matter parsing and reference extraction
//! - [`pattern`] - glob matching for wildcard references and exclusions
//! - [`resolver`] - path resolution, module layout and the graph walk
//! - [`report`] - results, summaries and the bundle view
//! - [`utils`] - path helpers
//!
//! # Reference Syntax
//!
//! ```text
//! ---
//! dependencies: ["{project-root}/bmad/core/tasks/workflow.xml"]
//! template: ../templates/prd-tmpl.yaml
//! ---
//! Run @task-create-doc, then follow bmad/bmm/workflows/plan/instructions.md.
//! <step exec="{project-root}/bmad/core/tasks/validate.xml"/>
//! <load file="./checklist.md"/>
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bmad_resolver::resolver::{ResolveOptions, resolve};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let result = resolve(Path::new("./src"), &["bmm".to_string()], &ResolveOptions::verbose(true)).await?;
//! println!("{}", result.summary());
//! println!("{}", result.bundle().to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod markdown;
pub mod pattern;
pub mod report;
pub mod resolver;
pub mod utils;

// Test utilities (only available in test builds or with the test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
