//! PDF rendering of report parameters with lopdf.

use super::RenderError;
use super::document::ReportParameters;
use super::template::{ReportTemplate, Rgb};
use crate::tar::Severity;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use regex::Regex;
use std::io::Write;
use std::sync::LazyLock;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Failed to compile markup regex"));

/// A backend turning report parameters into a binary document.
pub trait RenderBackend {
    fn render(&self, parameters: &ReportParameters, out: &mut dyn Write) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Title,
    Heading,
    Body,
    Label,
    Muted,
    Level(Severity),
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    style: Style,
    indent: u32,
}

/// Renders reports as paginated PDF documents using the standard Type1 fonts.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    template: ReportTemplate,
}

impl PdfRenderer {
    pub fn new(template: ReportTemplate) -> Self {
        Self { template }
    }

    pub fn with_embedded_template() -> Result<Self, RenderError> {
        Ok(Self::new(ReportTemplate::embedded()?))
    }

    pub fn template(&self) -> &ReportTemplate {
        &self.template
    }

    fn layout(&self, p: &ReportParameters) -> Vec<Line> {
        let mut lines = Vec::new();
        self.push(&mut lines, &p.title, Style::Title, 0);
        self.push(&mut lines, &p.overview_label, Style::Heading, 0);
        if let Some(date) = &p.report_date {
            self.push(&mut lines, &format!("{} {}", p.date_label, date), Style::Body, 0);
        }
        let result = if p.result_type_label.is_empty() {
            &p.report_result
        } else {
            &p.result_type_label
        };
        self.push(&mut lines, &format!("{} {}", p.result_label, result), Style::Label, 0);
        self.push(
            &mut lines,
            &format!("{} {}", p.result_findings_label, findings_details(p)),
            Style::Body,
            0,
        );
        if let Some(context) = &p.context_items {
            self.push(&mut lines, &p.context_label, Style::Label, 0);
            for item in context {
                self.push(&mut lines, &format!("{}: {}", item.key, item.value), Style::Muted, 12);
            }
        }

        if let Some(items) = &p.report_items {
            self.push(&mut lines, &p.details_label, Style::Heading, 0);
            for item in items {
                let level = Severity::from(item.level.as_str());
                let description = if p.rich_text_report_items {
                    strip_markup(&item.description)
                } else {
                    item.description.clone()
                };
                self.push(
                    &mut lines,
                    &format!("[{}] {}", item.level.to_uppercase(), description),
                    Style::Level(level),
                    0,
                );
                let extras = [
                    (&p.test_label, &item.test),
                    (&p.location_label, &item.location),
                    (&p.assertion_id_label, &item.assertion_id),
                ];
                for (label, value) in extras {
                    if let Some(value) = value {
                        self.push(&mut lines, &format!("{label} {value}"), Style::Muted, 12);
                    }
                }
            }
        }
        lines
    }

    /// Append `text` wrapped to the usable width.
    fn push(&self, lines: &mut Vec<Line>, text: &str, style: Style, indent: u32) {
        let glyph_width = self.font_size(style) as f32 * 0.5;
        let available = self.template.text_width().saturating_sub(indent) as f32;
        let max_chars = ((available / glyph_width) as usize).max(1);
        for chunk in wrap(text, max_chars) {
            lines.push(Line { text: chunk, style, indent });
        }
    }

    fn font_size(&self, style: Style) -> u32 {
        let sizes = &self.template.sizes;
        match style {
            Style::Title => sizes.title,
            Style::Heading => sizes.heading,
            _ => sizes.body,
        }
    }

    fn advance(&self, style: Style) -> u32 {
        match style {
            Style::Title | Style::Heading => self.font_size(style) + 8,
            _ => self.template.page.line_height,
        }
    }

    fn colour(&self, style: Style) -> Rgb {
        let colours = &self.template.colours;
        match style {
            Style::Level(Severity::Error) => colours.error,
            Style::Level(Severity::Warning) => colours.warning,
            Style::Level(Severity::Info) => colours.info,
            Style::Muted => colours.muted,
            _ => colours.text,
        }
    }

    fn font(&self, style: Style) -> &'static str {
        match style {
            Style::Title | Style::Heading | Style::Label => "F2",
            _ => "F1",
        }
    }

    /// Split lines into pages, leaving two lines at the bottom for the footer.
    fn paginate(&self, lines: Vec<Line>) -> Vec<Vec<Line>> {
        let page = &self.template.page;
        let usable = page.height - 2 * page.margin - 2 * page.line_height;
        let mut pages = vec![Vec::new()];
        let mut used = 0;
        for line in lines {
            let advance = self.advance(line.style);
            if used + advance > usable && used > 0 {
                pages.push(Vec::new());
                used = 0;
            }
            used += advance;
            if let Some(current) = pages.last_mut() {
                current.push(line);
            }
        }
        pages
    }

    fn page_operations(&self, lines: &[Line], footer: &str) -> Vec<Operation> {
        let page = &self.template.page;
        let mut operations = Vec::new();
        let mut y = page.height - page.margin;
        for line in lines {
            y = y.saturating_sub(self.advance(line.style));
            text_operations(
                &mut operations,
                self.font(line.style),
                self.font_size(line.style),
                self.colour(line.style),
                page.margin + line.indent,
                y,
                &line.text,
            );
        }
        text_operations(
            &mut operations,
            "F1",
            self.template.sizes.footer,
            self.template.colours.muted,
            page.margin,
            page.margin / 2,
            footer,
        );
        operations
    }
}

impl RenderBackend for PdfRenderer {
    fn render(&self, parameters: &ReportParameters, out: &mut dyn Write) -> Result<(), RenderError> {
        let pages = self.paginate(self.layout(parameters));
        tracing::debug!("Rendering report '{}' on {} page(s)", parameters.title, pages.len());

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(font_dictionary(&self.template.fonts.regular));
        let bold_id = doc.add_object(font_dictionary(&self.template.fonts.bold));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let total = pages.len();
        let mut kids: Vec<Object> = Vec::with_capacity(total);
        for (index, lines) in pages.iter().enumerate() {
            let footer = format!(
                "{} {} {} {}",
                parameters.page_label,
                index + 1,
                parameters.of_label,
                total
            );
            let content = Content {
                operations: self.page_operations(lines, &footer),
            };
            let encoded = content.encode().map_err(|e| RenderError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page = &self.template.page;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(total as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(i64::from(page.width)),
                Object::Integer(i64::from(page.height)),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_text(&parameters.title)),
            "Producer" => Object::string_literal(concat!("validator-commons ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut target = out;
        doc.save_to(&mut target)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(())
    }
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn text_operations(
    operations: &mut Vec<Operation>,
    font: &str,
    size: u32,
    colour: Rgb,
    x: u32,
    y: u32,
    text: &str,
) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![font.into(), Object::Integer(i64::from(size))]));
    operations.push(Operation::new(
        "rg",
        colour.iter().map(|c| Object::from(*c)).collect(),
    ));
    operations.push(Operation::new(
        "Td",
        vec![Object::Integer(i64::from(x)), Object::Integer(i64::from(y))],
    ));
    operations.push(Operation::new("Tj", vec![Object::string_literal(encode_text(text))]));
    operations.push(Operation::new("ET", vec![]));
}

/// Single byte text for the standard fonts; characters outside Latin-1 become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            0x09 => b' ',
            _ => b'?',
        })
        .collect()
}

/// Findings details with the count parameters in the `{0}`, `{1}` and `{2}` slots.
/// An already localised label is kept; an empty one falls back to the bare counts.
fn findings_details(p: &ReportParameters) -> String {
    let counts = [&p.error_count, &p.warning_count, &p.message_count];
    let label = &p.result_findings_details_label;
    if label.is_empty() {
        return format!("{} / {} / {}", counts[0], counts[1], counts[2]);
    }
    counts
        .iter()
        .enumerate()
        .fold(label.clone(), |text, (index, count)| {
            text.replace(&format!("{{{index}}}"), count)
        })
}

/// Plain text of a description that may contain markup.
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG
        .replace_all(text, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }
        lines.push(current);
    }
    lines
}
