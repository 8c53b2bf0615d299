//! Versioned page layout used by the PDF renderer.

use super::RenderError;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TEMPLATE: &str = include_str!("../../resources/tar-report.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportTemplate {
    pub version: String,
    pub page: PageLayout,
    pub fonts: Fonts,
    pub sizes: FontSizes,
    pub colours: Colours,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub line_height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fonts {
    pub regular: String,
    pub bold: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontSizes {
    pub title: u32,
    pub heading: u32,
    pub body: u32,
    pub footer: u32,
}

pub type Rgb = [f32; 3];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Colours {
    pub error: Rgb,
    pub warning: Rgb,
    pub info: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
}

impl ReportTemplate {
    /// The layout shipped with the crate.
    pub fn embedded() -> Result<Self, RenderError> {
        Self::parse(DEFAULT_TEMPLATE)
    }

    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Template(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, RenderError> {
        let template: Self = toml::from_str(content).map_err(|e| RenderError::Template(e.to_string()))?;
        template.check()?;
        Ok(template)
    }

    /// Width available for text between the margins.
    pub fn text_width(&self) -> u32 {
        self.page.width - 2 * self.page.margin
    }

    fn check(&self) -> Result<(), RenderError> {
        let page = &self.page;
        if page.line_height == 0 {
            return Err(RenderError::Template("line_height must be positive".into()));
        }
        // Room is needed for the title block and the footer.
        if page.width <= 2 * page.margin || page.height <= 2 * page.margin + 4 * page.line_height {
            return Err(RenderError::Template(format!(
                "page {}x{} is too small for margin {}",
                page.width, page.height, page.margin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_template() {
        let template = ReportTemplate::embedded().unwrap();
        assert_eq!(template.version, "1.0");
        assert_eq!(template.fonts.regular, "Helvetica");
        assert_eq!(template.text_width(), 515);
    }

    #[test]
    fn test_rejects_impossible_geometry() {
        let content = DEFAULT_TEMPLATE.replace("margin = 40", "margin = 400");
        assert!(matches!(ReportTemplate::parse(&content), Err(RenderError::Template(_))));
    }

    #[test]
    fn test_rejects_missing_sections() {
        assert!(ReportTemplate::parse("version = \"1.0\"").is_err());
    }
}
