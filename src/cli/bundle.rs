//! Write the resolved files grouped by content type.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::{CommandContext, ResolveArgs};
use crate::utils::{resolve_path, write_text_file};

/// Command to produce the bundle view as JSON.
///
/// The JSON holds one section per content type (`agents`, `tasks`,
/// `templates`, `tools`, `data`, `other`) and a metadata header with the
/// module list, file count and generation time.
#[derive(Args, Debug)]
pub struct BundleCommand {
    #[command(flatten)]
    args: ResolveArgs,

    /// Write to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<String>,
}

impl BundleCommand {
    /// Execute the bundle command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let context = CommandContext::from_args(&self.args, config).await?;
        let result = context.resolve().await?;
        let bundle = result.bundle();
        let json = bundle.to_json()?;

        match self.output {
            Some(output) => {
                let path = resolve_path(&output)?;
                write_text_file(&path, &json).await?;
                eprintln!(
                    "{} Wrote {} files to {}",
                    "✓".green(),
                    bundle.metadata.total_files,
                    path.display()
                );
            }
            None => println!("{json}"),
        }

        Ok(())
    }
}
