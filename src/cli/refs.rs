//! List the raw references in one file.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use crate::resolver::extract_file_references;
use crate::utils::resolve_path;

/// Command to show what the extractor finds in a file, without resolving.
#[derive(Args, Debug)]
pub struct RefsCommand {
    /// File to scan
    file: String,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl RefsCommand {
    /// Execute the refs command.
    pub async fn execute(self) -> Result<()> {
        if !matches!(self.format.as_str(), "text" | "json") {
            bail!("Invalid format '{}'. Valid formats: text, json", self.format);
        }

        let path = resolve_path(&self.file)?;
        let extracted = extract_file_references(&path).await?;

        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&extracted)?);
            return Ok(());
        }

        if let Some(error) = &extracted.frontmatter_error {
            eprintln!("{} malformed front-matter: {}", "warning:".yellow(), error);
        }
        if extracted.local_skip {
            eprintln!("{} file is marked localskip and is never bundled", "note:".cyan());
        }

        if extracted.references.is_empty() {
            println!("No references found in {}", path.display());
        } else {
            for reference in &extracted.references {
                println!("{reference}");
            }
        }

        Ok(())
    }
}
