//! PPTX (Office Open XML) backend for presentation-to-document conversion.
//!
//! Opens a .pptx package (a ZIP archive of XML parts and media), resolves
//! slide relationships and colours, and builds a positioned slide model.

pub mod geometry;
pub mod package;
pub mod parser;
pub mod rels;
pub mod shape_tree;
pub mod style;
pub mod xml;

#[cfg(test)]
pub(crate) mod testutil;

pub use geometry::{resolve_canvas_size, EMU_PER_PIXEL};
pub use package::{is_package, PptxPackage};
pub use parser::PptxParser;
pub use shape_tree::GroupTransforms;

use deck_core::{LayoutRenderer, PageOptions, Paginator, Result};

/// Run the whole conversion: parse, lay out every slide, and paginate.
pub fn convert<P: Paginator + ?Sized>(
    bytes: &[u8],
    parser: &PptxParser,
    renderer: &LayoutRenderer,
    paginator: &P,
    options: &PageOptions,
) -> Result<Vec<u8>> {
    let presentation = parser.parse(bytes)?;
    let surfaces = renderer.render(&presentation);
    log::debug!(
        "Converted {} slides ({} elements) at {}x{}px",
        surfaces.len(),
        presentation.element_count(),
        presentation.canvas.width_px,
        presentation.canvas.height_px
    );
    paginator.render_document(&surfaces, options)
}
