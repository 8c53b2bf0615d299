use super::CommandContext;
use super::report::file_name;
use crate::cli::{RunContext, ValidationRunner, bootstrap};
use crate::summary::FileSummary;
use crate::tar::Tar;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SummaryArgs {
    /// Validation result files (JSON or YAML)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Validation type shown in the summary
    #[arg(short = 't', long = "type")]
    pub validation_type: Option<String>,

    /// Always show the validation type line
    #[arg(long)]
    pub show_type: bool,
}

pub async fn execute(args: SummaryArgs, ctx: &CommandContext) -> Result<()> {
    bootstrap(&args, &ctx.app, ctx.domain.as_deref(), &ctx.output)
}

impl ValidationRunner for SummaryArgs {
    fn run(&self, ctx: &RunContext<'_>) -> Result<()> {
        let show_type = self.show_type || ctx.domain.has_multiple_validation_types();
        let validation_type = self
            .validation_type
            .as_deref()
            .or(ctx.domain.default_type.as_deref());

        for (index, input) in self.inputs.iter().enumerate() {
            let tar = Tar::from_path(input)
                .with_context(|| format!("Unable to read validation result {}", input.display()))?;
            let summary = FileSummary::new(file_name(input), &tar, show_type, validation_type);
            tracing::info!("{summary}");
            if index > 0 {
                ctx.output.blank_line();
            }
            ctx.output.plain(&summary.to_string());
        }
        Ok(())
    }
}
