//! WASM-compatible wrapper for presentation conversion.
//!
//! This crate exposes the conversion to JavaScript so the browser can
//! rasterize the laid-out slides and assemble the final document.

use deck_core::{
    output_filename, HtmlPaginator, LayoutRenderer, PageOptions, Paginator, Surface,
};
use deck_pptx::{GroupTransforms, PptxParser};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of converting a presentation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Suggested name for the converted document.
    pub filename: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub slide_count: usize,
    /// One positioned surface per slide, in slide order.
    pub surfaces: Vec<Surface>,
    /// Each surface rendered as an HTML fragment, ready for rasterization.
    pub slides_html: Vec<String>,
}

/// Convert a PPTX file into laid-out slide surfaces.
///
/// # Arguments
/// * `data` - The raw bytes of the PPTX file
/// * `filename` - The original filename (used to name the output)
/// * `flat_groups` - Read group children as slide-absolute
///
/// # Returns
/// A JavaScript object with the conversion result, or throws on error.
#[wasm_bindgen]
pub fn convert_presentation(data: &[u8], filename: &str, flat_groups: bool) -> Result<JsValue, JsValue> {
    let result = convert_presentation_impl(data, filename, flat_groups)
        .map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Convert a PPTX file straight into a paginated HTML document.
#[wasm_bindgen]
pub fn convert_to_document(data: &[u8]) -> Result<js_sys::Uint8Array, JsValue> {
    let document = deck_pptx::convert(
        data,
        &PptxParser::new(),
        &LayoutRenderer::new(),
        &HtmlPaginator::new(),
        &PageOptions::default(),
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(js_sys::Uint8Array::from(document.as_slice()))
}

fn convert_presentation_impl(
    data: &[u8],
    filename: &str,
    flat_groups: bool,
) -> Result<ConversionResult, String> {
    if !deck_pptx::is_package(data) {
        return Err("File is not a PPTX package".to_string());
    }

    let mode = if flat_groups {
        GroupTransforms::Flat
    } else {
        GroupTransforms::Compose
    };
    let presentation = PptxParser::new()
        .with_group_transforms(mode)
        .parse(data)
        .map_err(|e| format!("Conversion error: {}", e))?;

    let surfaces = LayoutRenderer::new().render(&presentation);
    let slides_html = surfaces.iter().map(Surface::to_html).collect();

    Ok(ConversionResult {
        filename: output_filename(filename, HtmlPaginator::new().extension()),
        canvas_width: presentation.canvas.width_px,
        canvas_height: presentation.canvas.height_px,
        slide_count: presentation.slides.len(),
        surfaces,
        slides_html,
    })
}
