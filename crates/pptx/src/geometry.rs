//! Canvas size and EMU-to-pixel conversion.

use crate::package::PptxPackage;
use crate::xml;
use deck_core::{BoundingBox, CanvasSize};

/// English Metric Units per display pixel (914400 EMU per inch at 96 px per inch).
pub const EMU_PER_PIXEL: f64 = 9525.0;

/// Path of the presentation manifest part.
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Convert a length in EMU to pixels.
pub fn emu_to_px(emu: f64) -> f64 {
    emu / EMU_PER_PIXEL
}

/// Resolve the canvas size from `ppt/presentation.xml`.
///
/// A missing part, unparseable XML, or an absent or invalid `sldSz` falls back
/// to the 960x540 default. This never fails.
pub fn resolve_canvas_size(package: &PptxPackage) -> CanvasSize {
    match declared_canvas_size(package) {
        Some(canvas) => canvas,
        None => {
            log::warn!(
                "No usable slide size in {}, using default canvas",
                PRESENTATION_PART
            );
            CanvasSize::default()
        }
    }
}

fn declared_canvas_size(package: &PptxPackage) -> Option<CanvasSize> {
    let content = package.get_part_text(PRESENTATION_PART)?;
    let root = match xml::parse(&content) {
        Ok(root) => root,
        Err(e) => {
            log::debug!("Failed to parse {}: {}", PRESENTATION_PART, e);
            return None;
        }
    };
    let size = root.child("sldSz")?;
    let cx = size.attr_i64("cx")?;
    let cy = size.attr_i64("cy")?;
    CanvasSize::new(emu_to_px(cx as f64), emu_to_px(cy as f64))
}

/// An affine mapping from a shape's coordinate frame onto the slide, in EMU.
///
/// Group shapes declare a child frame (`chOff`/`chExt`) that is stretched onto
/// their own placement (`off`/`ext`). Nested groups compose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Frame {
    /// The slide's own frame.
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Frame for the children of a group with the given transform, nested in `self`.
    pub fn nested(&self, group: &Transform) -> Self {
        let (ch_x, ch_y, ch_cx, ch_cy) = group.child_frame();
        let sx = if ch_cx > 0.0 { group.cx / ch_cx } else { 1.0 };
        let sy = if ch_cy > 0.0 { group.cy / ch_cy } else { 1.0 };
        Self {
            scale_x: self.scale_x * sx,
            scale_y: self.scale_y * sy,
            offset_x: self.offset_x + self.scale_x * (group.x - ch_x * sx),
            offset_y: self.offset_y + self.scale_y * (group.y - ch_y * sy),
        }
    }

    /// Map a transform through this frame and convert it to canvas pixels.
    pub fn to_bounds(&self, t: &Transform) -> BoundingBox {
        BoundingBox::new(
            emu_to_px(self.offset_x + self.scale_x * t.x),
            emu_to_px(self.offset_y + self.scale_y * t.y),
            emu_to_px(self.scale_x * t.cx),
            emu_to_px(self.scale_y * t.cy),
        )
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

/// An `a:xfrm` (or `p:xfrm`) declaration, in EMU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub cx: f64,
    pub cy: f64,

    /// Child frame `(chOff.x, chOff.y, chExt.cx, chExt.cy)`, only set on groups.
    pub child: Option<(f64, f64, f64, f64)>,
}

impl Transform {
    /// Read `off` and `ext` from an `xfrm` element. Both are required.
    pub fn from_xfrm(xfrm: &xml::XmlElement) -> Option<Self> {
        let off = xfrm.child("off")?;
        let ext = xfrm.child("ext")?;
        let child = match (xfrm.child("chOff"), xfrm.child("chExt")) {
            (Some(ch_off), Some(ch_ext)) => Some((
                ch_off.attr_i64("x")? as f64,
                ch_off.attr_i64("y")? as f64,
                ch_ext.attr_i64("cx")? as f64,
                ch_ext.attr_i64("cy")? as f64,
            )),
            _ => None,
        };
        Some(Self {
            x: off.attr_i64("x")? as f64,
            y: off.attr_i64("y")? as f64,
            cx: ext.attr_i64("cx")? as f64,
            cy: ext.attr_i64("cy")? as f64,
            child,
        })
    }

    /// Child frame, defaulting to the group's own placement (no stretch).
    fn child_frame(&self) -> (f64, f64, f64, f64) {
        self.child.unwrap_or((self.x, self.y, self.cx, self.cy))
    }
}
