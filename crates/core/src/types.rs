//! Domain types for the positioned slide model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas width used when the package does not declare a usable slide size.
pub const DEFAULT_CANVAS_WIDTH_PX: f64 = 960.0;

/// Canvas height used when the package does not declare a usable slide size.
pub const DEFAULT_CANVAS_HEIGHT_PX: f64 = 540.0;

/// Resolved canvas dimensions in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width_px: f64,
    pub height_px: f64,
}

impl CanvasSize {
    /// Create a canvas size, returning `None` unless both sides are positive and finite.
    pub fn new(width_px: f64, height_px: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width_px) && valid(height_px) {
            Some(Self { width_px, height_px })
        } else {
            None
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_CANVAS_WIDTH_PX,
            height_px: DEFAULT_CANVAS_HEIGHT_PX,
        }
    }
}

/// The whole converted presentation. Built once, read by the layout renderer, then dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Canvas size shared by every slide.
    pub canvas: CanvasSize,

    /// Slides ordered by the index embedded in their part name.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with the given canvas.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Total number of elements across all slides.
    pub fn element_count(&self) -> usize {
        self.slides.iter().map(|s| s.elements.len()).sum()
    }
}

/// A single slide: elements in z-order, later elements drawn on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    /// Index taken from the slide part name (`slide3.xml` -> 3).
    pub number: usize,

    pub elements: Vec<Element>,
}

impl Slide {
    /// Create a slide with the given part index and elements.
    pub fn new(number: usize, elements: Vec<Element>) -> Self {
        Self { number, elements }
    }
}

/// Axis-aligned box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// A resolved colour, stored as a `#`-prefixed hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Build a colour from a hex value with or without the leading `#`.
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim();
        if hex.starts_with('#') {
            Self(hex.to_string())
        } else {
            Self(format!("#{}", hex))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A positioned visual element of a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Picture(PictureElement),
    Shape(ShapeElement),
}

/// An embedded raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureElement {
    pub bounds: BoundingBox,

    /// Inline-encoded image payload (`data:<mime>;base64,...`).
    pub image_data: String,
}

/// A text box or a filled rectangle/ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub bounds: BoundingBox,

    /// Paragraph text joined with `\n`. May be empty when the shape is filled.
    pub text: String,

    pub fill_color: Option<Color>,

    /// Colour of the first run of the first paragraph, if declared.
    pub text_color: Option<Color>,

    pub is_ellipse: bool,

    /// Whether a fill colour was resolved. Always equal to `fill_color.is_some()`.
    pub has_fill: bool,
}

impl ShapeElement {
    /// Build a shape element, returning `None` when there is nothing to draw
    /// (no text and no fill).
    pub fn new(
        bounds: BoundingBox,
        text: impl Into<String>,
        fill_color: Option<Color>,
        text_color: Option<Color>,
        is_ellipse: bool,
    ) -> Option<Self> {
        let text = text.into();
        if text.is_empty() && fill_color.is_none() {
            return None;
        }
        let has_fill = fill_color.is_some();
        Some(Self {
            bounds,
            text,
            fill_color,
            text_color,
            is_ellipse,
            has_fill,
        })
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}
