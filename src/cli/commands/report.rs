use super::CommandContext;
use crate::cli::{RunContext, ValidationRunner, bootstrap};
use crate::reports::{CsvReportWriter, ReportWriter, aggregate_tar};
use crate::summary::FileSummary;
use crate::tar::Tar;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Pdf,
    Csv,
}

impl ReportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }
}

#[derive(Args)]
pub struct ReportArgs {
    /// Validation result to render (JSON or YAML)
    pub input: PathBuf,

    /// Report file to write, next to the input by default
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Pdf)]
    pub format: ReportFormat,

    /// Merge findings with the same level and description
    #[arg(short, long)]
    pub aggregate: bool,

    /// Validation type shown in the summary
    #[arg(short = 't', long = "type")]
    pub validation_type: Option<String>,
}

impl ReportArgs {
    fn report_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(self.format.extension()))
    }
}

pub async fn execute(args: ReportArgs, ctx: &CommandContext) -> Result<()> {
    bootstrap(&args, &ctx.app, ctx.domain.as_deref(), &ctx.output)
}

impl ValidationRunner for ReportArgs {
    fn run(&self, ctx: &RunContext<'_>) -> Result<()> {
        let tar = Tar::from_path(&self.input)
            .with_context(|| format!("Unable to read validation result {}", self.input.display()))?;
        let localiser = ctx.domain.localiser()?;
        let report_tar: Cow<'_, Tar> = if self.aggregate {
            Cow::Owned(aggregate_tar(&tar, &localiser))
        } else {
            Cow::Borrowed(&tar)
        };

        // Rendered in the work folder, copied to the target once complete
        let staged = ctx
            .work_folder
            .path()
            .join(format!("report.{}", self.format.extension()));
        let written = match self.format {
            ReportFormat::Pdf => ReportWriter::pdf().and_then(|writer| {
                writer.write_report(&report_tar, &staged, &localiser, ctx.domain.rich_text_reports)
            }),
            ReportFormat::Csv => CsvReportWriter::new(localiser.clone())
                .with_bom(ctx.domain.add_bom_to_csv_exports)
                .write_report(&report_tar, &staged),
        };
        if let Err(e) = written {
            let message = e.message_for_display(&localiser);
            ctx.output.error(&message);
            return Err(e.into());
        }
        let target = self.report_path();
        publish(&staged, &target)?;
        tracing::info!("Report written to {}", target.display());

        let summary = FileSummary::new(
            file_name(&self.input),
            &tar,
            ctx.domain.has_multiple_validation_types(),
            self.validation_type.as_deref().or(ctx.domain.default_type.as_deref()),
        );
        tracing::info!("{summary}");
        ctx.output.plain(&summary.to_string());
        ctx.output.success(&format!("Report written to {}", target.display()));
        Ok(())
    }
}

fn publish(staged: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create folder {}", parent.display()))?;
    }
    std::fs::copy(staged, target)
        .with_context(|| format!("Failed to write report {}", target.display()))?;
    Ok(())
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
