use super::document::{ReportDocument, ReportParameters};
use super::labels::ReportLabels;
use super::pdf::{PdfRenderer, RenderBackend};
use super::RenderError;
use crate::error::ValidatorError;
use crate::i18n::Localiser;
use crate::tar::Tar;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const UNABLE_TO_GENERATE_REPORT: &str = "validator.label.exception.unableToGeneratePDFReport";

/// Renders single validation results through a [`RenderBackend`].
pub struct ReportGenerator<B = PdfRenderer> {
    backend: B,
}

impl ReportGenerator<PdfRenderer> {
    /// A generator producing PDF output with the embedded layout.
    pub fn pdf() -> Result<Self, RenderError> {
        Ok(Self::new(PdfRenderer::with_embedded_template()?))
    }
}

impl<B: RenderBackend> ReportGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Render `tar` into `out`. The stream is flushed whether rendering succeeds or not.
    pub fn write_tar_report(
        &self,
        tar: &Tar,
        out: &mut dyn Write,
        add_context: bool,
        labels: &ReportLabels,
        rich_text_report_items: bool,
    ) -> Result<(), RenderError> {
        let document = ReportDocument::assemble(tar, labels.title.as_deref(), add_context);
        let parameters = ReportParameters::new(document, labels, rich_text_report_items);
        if tracing::enabled!(tracing::Level::TRACE) {
            if let Ok(json) = serde_json::to_string_pretty(&parameters) {
                tracing::trace!("Report parameters:\n{json}");
            }
        }
        let rendered = self.backend.render(&parameters, out);
        let flushed = out.flush();
        rendered?;
        flushed?;
        Ok(())
    }
}

/// File level report generation with labels from a localisation catalogue.
pub struct ReportWriter<B = PdfRenderer> {
    generator: ReportGenerator<B>,
}

impl ReportWriter<PdfRenderer> {
    pub fn pdf() -> Result<Self, ValidatorError> {
        let generator = ReportGenerator::pdf()
            .map_err(|e| ValidatorError::display_with_source(UNABLE_TO_GENERATE_REPORT, e))?;
        Ok(Self { generator })
    }
}

impl<B: RenderBackend> ReportWriter<B> {
    pub fn new(generator: ReportGenerator<B>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &ReportGenerator<B> {
        &self.generator
    }

    /// Write the report of `tar` to `out_path`, with context.
    pub fn write_report(
        &self,
        tar: &Tar,
        out_path: &Path,
        localiser: &Localiser,
        rich_text_report_items: bool,
    ) -> Result<(), ValidatorError> {
        let labels = ReportLabels::from_localiser(localiser, tar);
        self.write_report_with_labels(tar, out_path, &labels, rich_text_report_items)
    }

    pub fn write_report_with_labels(
        &self,
        tar: &Tar,
        out_path: &Path,
        labels: &ReportLabels,
        rich_text_report_items: bool,
    ) -> Result<(), ValidatorError> {
        let result = File::create(out_path)
            .map_err(RenderError::from)
            .and_then(|file| {
                let mut out = BufWriter::new(file);
                self.generator
                    .write_tar_report(tar, &mut out, true, labels, rich_text_report_items)
            });
        result.map_err(|e| {
            tracing::error!("Unable to generate report {}: {e}", out_path.display());
            ValidatorError::display_with_source(UNABLE_TO_GENERATE_REPORT, e)
        })
    }

    /// Read a result file (JSON or YAML) and write its report to `out_path`.
    pub fn write_report_from_file(
        &self,
        in_path: &Path,
        out_path: &Path,
        localiser: &Localiser,
        rich_text_report_items: bool,
    ) -> Result<(), ValidatorError> {
        let tar = Tar::from_path(in_path).map_err(|e| {
            tracing::error!("Unable to read validation result {}: {e}", in_path.display());
            ValidatorError::display_with_source(UNABLE_TO_GENERATE_REPORT, e)
        })?;
        self.write_report(&tar, out_path, localiser, rich_text_report_items)
    }
}
