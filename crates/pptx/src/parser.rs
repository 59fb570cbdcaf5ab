//! PPTX conversion pipeline: package -> slide model.

use crate::geometry::resolve_canvas_size;
use crate::package::PptxPackage;
use crate::rels::resolve_relationships;
use crate::shape_tree::{GroupTransforms, ShapeTreeWalker};
use crate::xml;
use deck_core::{Element, Error, Presentation, Result, Slide};
use regex::Regex;
use std::sync::LazyLock;

/// Matches slide parts and captures their embedded index.
static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

/// Parser for PPTX (Office Open XML) packages.
#[derive(Debug, Clone, Default)]
pub struct PptxParser {
    group_transforms: GroupTransforms,
}

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how group child coordinates are interpreted.
    pub fn with_group_transforms(mut self, mode: GroupTransforms) -> Self {
        self.group_transforms = mode;
        self
    }

    /// Parse a PPTX package from raw bytes.
    pub fn parse(&self, bytes: &[u8]) -> Result<Presentation> {
        let package = PptxPackage::open(bytes)?;
        self.parse_package(&package)
    }

    /// Build the slide model of an opened package.
    ///
    /// Slides are processed one at a time in ascending index order. Fails with
    /// [`Error::EmptyPresentation`] when the package holds no slide parts.
    pub fn parse_package(&self, package: &PptxPackage) -> Result<Presentation> {
        let canvas = resolve_canvas_size(package);
        let slide_parts = slide_parts(package);
        if slide_parts.is_empty() {
            return Err(Error::EmptyPresentation);
        }

        let mut presentation = Presentation::new(canvas);
        for (number, path) in &slide_parts {
            let slide = self.parse_slide(package, path, *number)?;
            log::debug!("Slide {} ({}): {} elements", number, path, slide.elements.len());
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Parse a single slide part.
    fn parse_slide(&self, package: &PptxPackage, slide_path: &str, number: usize) -> Result<Slide> {
        let content = package
            .get_part_text(slide_path)
            .ok_or_else(|| Error::ContainerError(format!("Slide part '{}' not found", slide_path)))?;
        let root = xml::parse(&content).map_err(|e| with_part_context(e, slide_path))?;
        let relationships =
            resolve_relationships(package, slide_path).map_err(|e| with_part_context(e, slide_path))?;

        let elements = match root.path(&["cSld", "spTree"]) {
            Some(sp_tree) => ShapeTreeWalker::new(package, &relationships)
                .with_group_transforms(self.group_transforms)
                .walk(sp_tree),
            None => {
                log::warn!("Slide '{}' has no shape tree", slide_path);
                Vec::new()
            }
        };

        Ok(build_slide(number, elements))
    }
}

/// Wrap walker output for one slide, keeping traversal order as z-order.
pub fn build_slide(number: usize, elements: Vec<Element>) -> Slide {
    Slide::new(number, elements)
}

/// Slide parts of the package as `(index, path)`, sorted by index.
///
/// Container enumeration order is not meaningful; only the number embedded
/// in the part name decides the slide order.
pub fn slide_parts(package: &PptxPackage) -> Vec<(usize, String)> {
    let mut slides: Vec<(usize, String)> = package
        .part_names()
        .iter()
        .filter_map(|name| {
            let number = extract_slide_number(name)?;
            Some((number, name.clone()))
        })
        .collect();

    slides.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    slides
}

/// Extract the index of a slide part such as `ppt/slides/slide3.xml`.
fn extract_slide_number(part_name: &str) -> Option<usize> {
    SLIDE_PART_REGEX
        .captures(part_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn with_part_context(error: Error, part: &str) -> Error {
    match error {
        Error::XmlError(msg) => Error::XmlError(format!("{}: {}", part, msg)),
        other => other,
    }
}
