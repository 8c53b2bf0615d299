//! PDF and CSV reports for validation results.
//!
//! A [`Tar`](crate::tar::Tar) is turned into a [`ReportDocument`] (flattened
//! context, summarised findings, counts), combined with localised
//! [`ReportLabels`] into [`ReportParameters`] and handed to a
//! [`RenderBackend`]. [`ReportGenerator`] drives this for one output stream;
//! [`ReportWriter`] does the same for files and reports failures as
//! displayable validator errors.
//!
//! [`CsvReportWriter`] exports the findings as a spreadsheet, and
//! [`aggregate`] merges repeated findings before either is produced.

use thiserror::Error;

pub mod aggregate;
pub mod context;
pub mod csv;
pub mod document;
pub mod generator;
pub mod items;
pub mod labels;
pub mod pdf;
pub mod template;

pub use aggregate::{FindingAggregator, aggregate_tar};
pub use context::ContextItem;
pub use self::csv::CsvReportWriter;
pub use document::{ReportDocument, ReportParameters};
pub use generator::{ReportGenerator, ReportWriter};
pub use items::{ItemSummary, ReportItem};
pub use labels::ReportLabels;
pub use pdf::{PdfRenderer, RenderBackend};
pub use template::ReportTemplate;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid report template: {0}")]
    Template(String),
    #[error("failed to build PDF document: {0}")]
    Pdf(String),
    #[error("failed to build CSV report: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
