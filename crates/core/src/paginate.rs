//! Pagination of rendered surfaces into an output document.
//!
//! Rasterization itself happens outside this crate; [`Paginator`] is the
//! contract the conversion relies on. [`HtmlPaginator`] assembles a
//! print-ready HTML document with one landscape page per surface.

use crate::error::{Error, Result};
use crate::layout::{escape_html, Surface};
use serde::{Deserialize, Serialize};

/// Page orientation of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

/// Options for assembling the output document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageOptions {
    pub orientation: Orientation,

    /// Page size in pixels. Defaults to the first surface's size.
    pub page_size: Option<(f64, f64)>,
}

impl PageOptions {
    /// Page dimensions `(width, height)` for the given surfaces, honouring orientation.
    pub fn page_dimensions(&self, surfaces: &[Surface]) -> (f64, f64) {
        let (w, h) = self
            .page_size
            .or_else(|| surfaces.first().map(|s| (s.width_px, s.height_px)))
            .unwrap_or((
                crate::types::DEFAULT_CANVAS_WIDTH_PX,
                crate::types::DEFAULT_CANVAS_HEIGHT_PX,
            ));
        let (long, short) = if w >= h { (w, h) } else { (h, w) };
        match self.orientation {
            Orientation::Landscape => (long, short),
            Orientation::Portrait => (short, long),
        }
    }
}

/// Turns rendered surfaces into final document bytes.
pub trait Paginator {
    /// Assemble one page per surface, in order.
    fn render_document(&self, surfaces: &[Surface], options: &PageOptions) -> Result<Vec<u8>>;

    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;
}

/// Paginator emitting a single HTML document, one `@page` per slide.
#[derive(Debug, Clone, Default)]
pub struct HtmlPaginator {
    title: Option<String>,
}

impl HtmlPaginator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Paginator for HtmlPaginator {
    fn render_document(&self, surfaces: &[Surface], options: &PageOptions) -> Result<Vec<u8>> {
        if surfaces.is_empty() {
            return Err(Error::RenderError("No surfaces to paginate".to_string()));
        }

        let (page_w, page_h) = options.page_dimensions(surfaces);
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        }
        html.push_str(&format!(
            "<style>@page {{ size: {}px {}px; margin: 0; }} \
             body {{ margin: 0; font-family: sans-serif; }} \
             .page {{ width: {}px; height: {}px; display: flex; align-items: center; \
             justify-content: center; overflow: hidden; page-break-after: always; }}</style>\n",
            page_w, page_h, page_w, page_h
        ));
        html.push_str("</head>\n<body>\n");

        for surface in surfaces {
            // Fit the slide into the page, keeping its aspect ratio.
            let scale = (page_w / surface.width_px).min(page_h / surface.height_px);
            html.push_str(&format!(
                "<section class=\"page\"><div style=\"transform:scale({});transform-origin:center;\">{}</div></section>\n",
                scale,
                surface.to_html()
            ));
        }

        html.push_str("</body>\n</html>\n");
        log::debug!("Paginated {} surfaces at {}x{}px", surfaces.len(), page_w, page_h);
        Ok(html.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

/// Suggested output filename: the input's base name with its extension replaced.
pub fn output_filename(input: &str, extension: &str) -> String {
    let base = input.rsplit(['/', '\\']).next().unwrap_or(input);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };
    let stem = if stem.is_empty() { "output" } else { stem };
    format!("{}.{}", stem, extension)
}
