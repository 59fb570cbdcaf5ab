//! Fill and text colour resolution.

use crate::xml::XmlElement;
use deck_core::Color;

/// Colour used for scheme names outside the fixed palette.
pub const FALLBACK_SCHEME_COLOR: &str = "#cccccc";

/// Resolve a scheme colour name through the fixed theme palette.
///
/// Every name resolves; unknown names map to [`FALLBACK_SCHEME_COLOR`].
pub fn scheme_color(name: &str) -> Color {
    let hex = match name {
        "tx1" | "dk1" => "#000000",
        "bg1" | "lt1" => "#ffffff",
        "accent1" => "#5b9bd5",
        "accent2" => "#ed7d31",
        "accent3" => "#a5a5a5",
        "accent4" => "#ffc000",
        "accent5" => "#4472c4",
        "accent6" => "#70ad47",
        _ => FALLBACK_SCHEME_COLOR,
    };
    Color::from_hex(hex)
}

/// Resolve the colour element inside a fill (`a:srgbClr`, `a:schemeClr`, `a:sysClr`).
fn color_choice(fill: &XmlElement) -> Option<Color> {
    fill.children.iter().find_map(|c| match c.name.as_str() {
        "srgbClr" => c.attr("val").map(Color::from_hex),
        "schemeClr" => Some(c.attr("val").map(scheme_color).unwrap_or_else(|| {
            Color::from_hex(FALLBACK_SCHEME_COLOR)
        })),
        "sysClr" => c.attr("lastClr").map(Color::from_hex),
        _ => None,
    })
}

/// Resolve the fill of a shape properties node (`p:spPr`).
///
/// Only `a:solidFill` produces a colour; `a:noFill` or no fill declaration
/// resolves to `None`.
pub fn resolve_fill_color(sp_pr: &XmlElement) -> Option<Color> {
    sp_pr.child("solidFill").and_then(color_choice)
}

/// Resolve the text colour of a paragraph (`a:p`) from its first run.
pub fn resolve_text_color(paragraph: &XmlElement) -> Option<Color> {
    paragraph
        .child("r")
        .and_then(|run| run.path(&["rPr", "solidFill"]))
        .and_then(color_choice)
}
