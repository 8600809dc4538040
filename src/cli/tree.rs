//! Display the reference tree below one file.
//!
//! # Output Format
//!
//! ```text
//! core/agents/bmad-master.md
//! ├── core/tasks/workflow.xml
//! │   └── core/tasks/validate-workflow.xml
//! └── core/tasks/create-doc.md
//!     └── core/tasks/workflow.xml (see above)
//! ```
//!
//! Files printed earlier are marked `(see above)`; a reference back to a file
//! on the current branch is marked `(circular reference)`.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::CliConfig;
use super::common::{CommandContext, ResolveArgs};
use crate::utils::resolve_path;

/// Command to show the references reachable from one file.
#[derive(Args, Debug)]
pub struct TreeCommand {
    #[command(flatten)]
    args: ResolveArgs,

    /// File to start from, relative to the content root or absolute
    file: String,
}

impl TreeCommand {
    /// Execute the tree command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let context = CommandContext::from_args(&self.args, config).await?;
        let result = context.resolve().await?;
        let start = locate(&result.root, &self.file)?;

        if !result.contains(&start) {
            bail!(
                "{} is not part of the resolution for modules: {}",
                result.relative(&start),
                result.modules.join(", ")
            );
        }

        let tree = result.graph.to_tree_string(&start, |path| result.relative(path));
        print!("{tree}");

        let cycles = result.graph.cycles().len();
        if cycles > 0 {
            println!();
            println!("{} {} reference cycle(s) in this resolution", "note:".cyan(), cycles);
        }

        Ok(())
    }
}

/// Find `file` under `root` first, then as given.
fn locate(root: &Path, file: &str) -> Result<PathBuf> {
    let expanded = resolve_path(file)?;
    let candidates = if expanded.is_absolute() {
        vec![expanded]
    } else {
        vec![root.join(&expanded), expanded]
    };

    for candidate in &candidates {
        if let Ok(canonical) = candidate.canonicalize() {
            return Ok(canonical);
        }
    }

    bail!("File not found: {file}")
}
