//! Resolve a module selection and print the result.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::{CommandContext, ResolveArgs};

/// Command to resolve modules and report what they need.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    #[command(flatten)]
    args: ResolveArgs,

    /// Output format (text, json)
    ///
    /// - `text`: summary counts and the per-module report (default)
    /// - `json`: the complete resolution result
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        self.validate_arguments()?;

        let context = CommandContext::from_args(&self.args, config).await?;
        let result = context.resolve().await?;

        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        println!(
            "{} {} files for modules: {}",
            "Resolved".green().bold(),
            result.all_files.len(),
            result.modules.join(", ")
        );
        println!();
        print!("{}", result.summary());

        if !result.warnings.is_empty() {
            println!();
            println!("{}", "Warnings:".yellow());
            for warning in &result.warnings {
                println!("  {}: {}", result.relative(&warning.file), warning.message);
            }
        }

        Ok(())
    }

    fn validate_arguments(&self) -> Result<()> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            other => bail!("Invalid format '{other}'. Valid formats: text, json"),
        }
    }
}
