//! Layout of a slide model onto positioned surfaces.
//!
//! Each slide becomes one [`Surface`] exactly the size of the canvas, holding
//! absolutely positioned nodes. Rendering is a pure mapping; nothing is kept
//! between calls.

use crate::types::{Color, Element, PictureElement, Presentation, ShapeElement, Slide};
use serde::{Deserialize, Serialize};

/// Default elastic factor for text boxes.
pub const DEFAULT_TEXT_GROWTH: f64 = 1.5;

/// Padding for shapes that carry a fill.
const FILLED_PADDING_PX: f64 = 8.0;

/// Padding for plain text boxes.
const TEXT_PADDING_PX: f64 = 2.0;

const DEFAULT_TEXT_COLOR: &str = "#000000";
const ELLIPSE_TEXT_COLOR: &str = "#ffffff";

/// Maps a [`Presentation`] onto one [`Surface`] per slide.
#[derive(Debug, Clone)]
pub struct LayoutRenderer {
    /// Maximum width of a text box as a multiple of its declared width.
    text_growth: f64,
}

impl Default for LayoutRenderer {
    fn default() -> Self {
        Self {
            text_growth: DEFAULT_TEXT_GROWTH,
        }
    }
}

impl LayoutRenderer {
    /// Create a renderer with the default 1.5x text growth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the elastic factor for text boxes. Values below 1.0 are clamped.
    pub fn with_text_growth(mut self, growth: f64) -> Self {
        self.text_growth = if growth.is_finite() { growth.max(1.0) } else { DEFAULT_TEXT_GROWTH };
        self
    }

    /// Render every slide, in order.
    pub fn render(&self, presentation: &Presentation) -> Vec<Surface> {
        presentation
            .slides
            .iter()
            .map(|slide| self.render_slide(presentation, slide))
            .collect()
    }

    /// Render a single slide onto a canvas-sized surface.
    pub fn render_slide(&self, presentation: &Presentation, slide: &Slide) -> Surface {
        let nodes = slide
            .elements
            .iter()
            .map(|element| match element {
                Element::Picture(picture) => self.picture_node(picture),
                Element::Shape(shape) => self.shape_node(shape),
            })
            .collect();

        Surface {
            slide_number: slide.number,
            width_px: presentation.canvas.width_px,
            height_px: presentation.canvas.height_px,
            nodes,
        }
    }

    fn picture_node(&self, picture: &PictureElement) -> SurfaceNode {
        let b = picture.bounds;
        SurfaceNode {
            x: b.x,
            y: b.y,
            min_width: b.w,
            max_width: b.w,
            height: b.h,
            content: NodeContent::Image {
                src: picture.image_data.clone(),
            },
            style: NodeStyle {
                background: None,
                color: None,
                bold: false,
                centered: false,
                ellipse: false,
                padding_px: 0.0,
                clip: true,
            },
        }
    }

    fn shape_node(&self, shape: &ShapeElement) -> SurfaceNode {
        let b = shape.bounds;
        let elastic = shape.has_text() && !shape.is_ellipse;
        let max_width = if elastic { b.w * self.text_growth } else { b.w };

        let color = if shape.is_ellipse {
            shape
                .text_color
                .clone()
                .or_else(|| Some(Color::from_hex(ELLIPSE_TEXT_COLOR)))
        } else {
            shape
                .text_color
                .clone()
                .or_else(|| Some(Color::from_hex(DEFAULT_TEXT_COLOR)))
        };

        let padding_px = if shape.has_fill {
            FILLED_PADDING_PX
        } else {
            TEXT_PADDING_PX
        };

        SurfaceNode {
            x: b.x,
            y: b.y,
            min_width: b.w,
            max_width,
            height: b.h,
            content: NodeContent::Text {
                text: shape.text.clone(),
            },
            style: NodeStyle {
                background: shape.fill_color.clone(),
                color,
                bold: shape.is_ellipse,
                centered: shape.is_ellipse,
                ellipse: shape.is_ellipse,
                padding_px,
                clip: !elastic,
            },
        }
    }
}

/// One slide laid out at canvas size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub slide_number: usize,
    pub width_px: f64,
    pub height_px: f64,

    /// Nodes in paint order.
    pub nodes: Vec<SurfaceNode>,
}

impl Surface {
    /// Render the surface as a self-contained, absolutely positioned HTML fragment.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class=\"slide\" data-slide=\"{}\" style=\"position:relative;overflow:hidden;\
             width:{}px;height:{}px;background:#ffffff;\">",
            self.slide_number,
            px(self.width_px),
            px(self.height_px)
        );
        for node in &self.nodes {
            node.write_html(&mut html);
        }
        html.push_str("</div>");
        html
    }
}

/// An absolutely positioned box on a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceNode {
    pub x: f64,
    pub y: f64,

    /// Declared width; the box is never narrower.
    pub min_width: f64,

    /// Widest the box may grow. Equal to `min_width` for fixed boxes.
    pub max_width: f64,

    pub height: f64,
    pub content: NodeContent,
    pub style: NodeStyle,
}

impl SurfaceNode {
    /// Allowed width interval `(min, max)` of the box.
    pub fn width_range(&self) -> (f64, f64) {
        (self.min_width, self.max_width)
    }

    pub fn is_elastic(&self) -> bool {
        self.max_width > self.min_width
    }

    fn write_html(&self, out: &mut String) {
        let mut style = format!(
            "position:absolute;left:{}px;top:{}px;box-sizing:border-box;",
            px(self.x),
            px(self.y)
        );
        if self.is_elastic() {
            style.push_str(&format!(
                "width:max-content;min-width:{}px;max-width:{}px;min-height:{}px;",
                px(self.min_width),
                px(self.max_width),
                px(self.height)
            ));
        } else {
            style.push_str(&format!(
                "width:{}px;height:{}px;",
                px(self.min_width),
                px(self.height)
            ));
        }
        if self.style.clip {
            style.push_str("overflow:hidden;");
        }
        if let Some(bg) = &self.style.background {
            style.push_str(&format!("background:{};", bg));
        }
        if let Some(color) = &self.style.color {
            style.push_str(&format!("color:{};", color));
        }
        if self.style.bold {
            style.push_str("font-weight:bold;");
        }
        if self.style.ellipse {
            style.push_str("border-radius:50%;");
        }
        if self.style.centered {
            style.push_str("display:flex;align-items:center;justify-content:center;text-align:center;");
        }
        style.push_str(&format!(
            "padding:{}px;white-space:pre-wrap;",
            px(self.style.padding_px)
        ));

        match &self.content {
            NodeContent::Image { src } => {
                out.push_str(&format!(
                    "<div style=\"{}\"><img src=\"{}\" style=\"width:100%;height:100%;object-fit:fill;\"></div>",
                    style,
                    escape_html(src)
                ));
            }
            NodeContent::Text { text } => {
                out.push_str(&format!("<div style=\"{}\">{}</div>", style, escape_html(text)));
            }
        }
    }
}

/// What a surface node draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeContent {
    Image { src: String },
    Text { text: String },
}

/// Visual attributes of a surface node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub background: Option<Color>,
    pub color: Option<Color>,
    pub bold: bool,
    pub centered: bool,
    pub ellipse: bool,
    pub padding_px: f64,

    /// Content is clipped to the box.
    pub clip: bool,
}

/// Format a pixel value without trailing zeros.
fn px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
