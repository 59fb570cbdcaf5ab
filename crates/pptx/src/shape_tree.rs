//! Shape tree classification and traversal.
//!
//! A slide's `p:spTree` is first classified into a closed [`TreeNode`] tree
//! (pictures, shapes, groups; anything else is dropped), then walked in
//! document order to produce positioned [`Element`]s. Markup-compatibility
//! wrappers contribute their `mc:Fallback` branch, or the first `mc:Choice`
//! when no fallback is present.

use crate::geometry::{Frame, Transform};
use crate::package::PptxPackage;
use crate::rels::Relationships;
use crate::style::{resolve_fill_color, resolve_text_color};
use crate::xml::XmlElement;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use deck_core::{Color, Element, PictureElement, ShapeElement};
use serde::{Deserialize, Serialize};

/// How child coordinates inside group shapes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupTransforms {
    /// Map children through the group's child frame onto its placement.
    #[default]
    Compose,
    /// Read child offsets as slide-absolute.
    Flat,
}

/// A classified shape tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode<'a> {
    Picture(PictureNode<'a>),
    Shape(ShapeNode<'a>),
    Group(GroupNode<'a>),
}

/// `p:pic`
#[derive(Debug, Clone, PartialEq)]
pub struct PictureNode<'a> {
    /// `r:embed` of the picture's blip.
    pub embed: Option<&'a str>,
    pub transform: Option<Transform>,
}

/// `p:sp`
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode<'a> {
    pub transform: Option<Transform>,
    pub fill_color: Option<Color>,
    pub is_ellipse: bool,
    pub text_body: Option<&'a XmlElement>,
}

/// `p:grpSp`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode<'a> {
    pub transform: Option<Transform>,
    pub children: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    /// Classify a raw XML node. Returns `None` for nodes that are not drawn
    /// (connectors, graphic frames, non-visual properties, ...).
    pub fn classify(node: &'a XmlElement) -> Option<Self> {
        match node.name.as_str() {
            "pic" => Some(TreeNode::Picture(PictureNode {
                embed: node
                    .path(&["blipFill", "blip"])
                    .and_then(|blip| blip.attr("embed")),
                transform: node.path(&["spPr", "xfrm"]).and_then(Transform::from_xfrm),
            })),
            "sp" => {
                let sp_pr = node.child("spPr");
                Some(TreeNode::Shape(ShapeNode {
                    transform: sp_pr
                        .and_then(|p| p.child("xfrm"))
                        .and_then(Transform::from_xfrm),
                    fill_color: sp_pr.and_then(resolve_fill_color),
                    is_ellipse: sp_pr
                        .and_then(|p| p.child("prstGeom"))
                        .and_then(|g| g.attr("prst"))
                        == Some("ellipse"),
                    text_body: node.child("txBody"),
                }))
            }
            "grpSp" => Some(TreeNode::Group(GroupNode {
                transform: node
                    .path(&["grpSpPr", "xfrm"])
                    .and_then(Transform::from_xfrm),
                children: classify_children(node),
            })),
            // `mc:AlternateContent` is transparent: its chosen branch is read
            // like the body of an untransformed group.
            "AlternateContent" => {
                let branch = node
                    .child("Fallback")
                    .or_else(|| node.child("Choice"))?;
                Some(TreeNode::Group(GroupNode {
                    transform: None,
                    children: classify_children(branch),
                }))
            }
            _ => None,
        }
    }
}

/// Classify the drawable children of a tree container (`p:spTree` or `p:grpSp`).
pub fn classify_children(container: &XmlElement) -> Vec<TreeNode<'_>> {
    container
        .children
        .iter()
        .filter_map(TreeNode::classify)
        .collect()
}

/// Walks one slide's shape tree.
pub struct ShapeTreeWalker<'a> {
    package: &'a PptxPackage,
    relationships: &'a Relationships,
    group_transforms: GroupTransforms,
}

impl<'a> ShapeTreeWalker<'a> {
    pub fn new(package: &'a PptxPackage, relationships: &'a Relationships) -> Self {
        Self {
            package,
            relationships,
            group_transforms: GroupTransforms::default(),
        }
    }

    pub fn with_group_transforms(mut self, mode: GroupTransforms) -> Self {
        self.group_transforms = mode;
        self
    }

    /// Walk the `p:spTree` of a slide, returning elements in z-order.
    pub fn walk(&self, sp_tree: &XmlElement) -> Vec<Element> {
        let mut elements = Vec::new();
        for node in classify_children(sp_tree) {
            self.visit(&node, &Frame::identity(), &mut elements);
        }
        elements
    }

    fn visit(&self, node: &TreeNode<'_>, frame: &Frame, out: &mut Vec<Element>) {
        match node {
            TreeNode::Picture(picture) => {
                if let Some(element) = self.picture_element(picture, frame) {
                    out.push(element);
                }
            }
            TreeNode::Shape(shape) => {
                if let Some(element) = shape_element(shape, frame) {
                    out.push(element);
                }
            }
            TreeNode::Group(group) => {
                let child_frame = match (self.group_transforms, &group.transform) {
                    (GroupTransforms::Compose, Some(t)) => frame.nested(t),
                    _ => *frame,
                };
                for child in &group.children {
                    self.visit(child, &child_frame, out);
                }
            }
        }
    }

    fn picture_element(&self, picture: &PictureNode<'_>, frame: &Frame) -> Option<Element> {
        let Some(embed) = picture.embed else {
            log::debug!("Skipping picture without an image reference");
            return None;
        };
        let Some(target) = self.relationships.get(embed) else {
            log::warn!("Skipping picture: unresolved reference '{}'", embed);
            return None;
        };
        let Some(data) = self.package.get_part(target) else {
            log::warn!("Skipping picture: part '{}' not found", target);
            return None;
        };
        let Some(transform) = &picture.transform else {
            log::debug!("Skipping picture '{}' without a transform", target);
            return None;
        };

        Some(Element::Picture(PictureElement {
            bounds: frame.to_bounds(transform),
            image_data: data_uri(target, data),
        }))
    }
}

fn shape_element(shape: &ShapeNode<'_>, frame: &Frame) -> Option<Element> {
    let transform = shape.transform.as_ref()?;
    let (text, text_color) = match shape.text_body {
        Some(body) => (
            extract_text(body),
            body.child("p").and_then(resolve_text_color),
        ),
        None => (String::new(), None),
    };

    ShapeElement::new(
        frame.to_bounds(transform),
        text,
        shape.fill_color.clone(),
        text_color,
        shape.is_ellipse,
    )
    .map(Element::Shape)
}

/// Text of a `txBody`: runs concatenated, paragraphs joined with `\n`.
/// Whitespace-only text counts as empty.
pub fn extract_text(text_body: &XmlElement) -> String {
    let paragraphs: Vec<String> = text_body
        .children_named("p")
        .map(|p| {
            let mut line = String::new();
            for child in &p.children {
                match child.name.as_str() {
                    "r" | "fld" => {
                        if let Some(t) = child.child("t") {
                            line.push_str(t.text());
                        }
                    }
                    "br" => line.push('\n'),
                    _ => {}
                }
            }
            line
        })
        .collect();

    let text = paragraphs.join("\n");
    if text.trim().is_empty() {
        String::new()
    } else {
        text.trim_matches('\n').to_string()
    }
}

/// Inline an image part as a `data:` URI.
pub fn data_uri(part_path: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type(part_path), BASE64.encode(data))
}

/// MIME type from a media part's extension.
fn mime_type(part_path: &str) -> &'static str {
    let ext = part_path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "emf" => "image/emf",
        "wmf" => "image/wmf",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{build_zip, picture, slide_xml, text_shape};
    use crate::xml::parse;

    const EMU: i64 = 9525;

    fn sp_tree(root: &XmlElement) -> &XmlElement {
        root.path(&["cSld", "spTree"]).unwrap()
    }

    fn walk_with(
        shapes: &str,
        relationships: &Relationships,
        entries: &[(&str, &[u8])],
        mode: GroupTransforms,
    ) -> Vec<Element> {
        let bytes = build_zip(entries);
        let package = PptxPackage::open(&bytes).unwrap();
        let root = parse(&slide_xml(shapes)).unwrap();
        ShapeTreeWalker::new(&package, relationships)
            .with_group_transforms(mode)
            .walk(sp_tree(&root))
    }

    fn walk(shapes: &str, relationships: &Relationships, entries: &[(&str, &[u8])]) -> Vec<Element> {
        walk_with(shapes, relationships, entries, GroupTransforms::Compose)
    }

    fn as_shape(element: &Element) -> &ShapeElement {
        match element {
            Element::Shape(s) => s,
            other => panic!("expected shape, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_skips_non_visual_nodes() {
        let root = parse(&slide_xml(
            r#"<p:cxnSp/><p:graphicFrame/><p:sp/><p:pic/><p:grpSp><p:sp/></p:grpSp>"#,
        ))
        .unwrap();
        let nodes = classify_children(sp_tree(&root));

        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[0], TreeNode::Shape(_)));
        assert!(matches!(nodes[1], TreeNode::Picture(_)));
        match &nodes[2] {
            TreeNode::Group(group) => assert_eq!(group.children.len(), 1),
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_text_shape_position_and_text() {
        let shapes = text_shape(100 * EMU, 50 * EMU, 300 * EMU, 40 * EMU, "Hello", None);
        let elements = walk(&shapes, &Relationships::new(), &[]);

        assert_eq!(elements.len(), 1);
        let shape = as_shape(&elements[0]);
        assert_eq!(shape.text, "Hello");
        assert_eq!(shape.bounds.x, 100.0);
        assert_eq!(shape.bounds.y, 50.0);
        assert_eq!(shape.bounds.w, 300.0);
        assert_eq!(shape.bounds.h, 40.0);
        assert!(!shape.is_ellipse);
        assert!(shape.fill_color.is_none());
    }

    #[test]
    fn test_empty_unfilled_shape_is_dropped() {
        let shapes = format!(
            "{}{}",
            text_shape(0, 0, 100 * EMU, 100 * EMU, "", None),
            text_shape(0, 0, 100 * EMU, 100 * EMU, "kept", None)
        );
        let elements = walk(&shapes, &Relationships::new(), &[]);
        assert_eq!(elements.len(), 1);
        assert_eq!(as_shape(&elements[0]).text, "kept");
    }

    #[test]
    fn test_filled_shape_without_text_is_kept() {
        let shapes = text_shape(0, 0, 100 * EMU, 100 * EMU, "", Some("123456"));
        let elements = walk(&shapes, &Relationships::new(), &[]);
        assert_eq!(elements.len(), 1);
        let shape = as_shape(&elements[0]);
        assert_eq!(shape.fill_color, Some(Color::from_hex("#123456")));
        assert!(shape.text.is_empty());
    }

    #[test]
    fn test_shape_without_transform_is_dropped() {
        let shapes = r#"<p:sp><p:spPr/><p:txBody><a:p><a:r><a:t>floating</a:t></a:r></a:p></p:txBody></p:sp>"#;
        assert!(walk(shapes, &Relationships::new(), &[]).is_empty());
    }

    #[test]
    fn test_ellipse_paragraphs_and_first_run_color() {
        let shapes = r#"<p:sp>
  <p:spPr>
    <a:xfrm><a:off x="0" y="0"/><a:ext cx="952500" cy="952500"/></a:xfrm>
    <a:prstGeom prst="ellipse"><a:avLst/></a:prstGeom>
    <a:solidFill><a:schemeClr val="accent2"/></a:solidFill>
  </p:spPr>
  <p:txBody>
    <a:bodyPr/>
    <a:p><a:r><a:rPr><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill></a:rPr><a:t>Line </a:t></a:r><a:r><a:t>one</a:t></a:r></a:p>
    <a:p><a:r><a:rPr><a:solidFill><a:srgbClr val="0000FF"/></a:solidFill></a:rPr><a:t>Line</a:t></a:r><a:br/><a:r><a:t>two</a:t></a:r></a:p>
  </p:txBody>
</p:sp>"#;
        let elements = walk(shapes, &Relationships::new(), &[]);
        let shape = as_shape(&elements[0]);

        assert!(shape.is_ellipse);
        assert_eq!(shape.text, "Line one\nLine\ntwo");
        assert_eq!(shape.text_color, Some(Color::from_hex("#00FF00")));
        assert_eq!(shape.fill_color, Some(Color::from_hex("#ed7d31")));
    }

    #[test]
    fn test_picture_is_inlined() {
        let mut rels = Relationships::new();
        rels.insert("rId2".to_string(), "ppt/media/image1.png".to_string());
        let shapes = picture(10 * EMU, 20 * EMU, 30 * EMU, 40 * EMU, "rId2");
        let elements = walk(&shapes, &rels, &[("ppt/media/image1.png", b"\x89PNG".as_slice())]);

        match &elements[0] {
            Element::Picture(p) => {
                assert_eq!(p.image_data, "data:image/png;base64,iVBORw==");
                assert_eq!(p.bounds.x, 10.0);
                assert_eq!(p.bounds.h, 40.0);
            }
            other => panic!("expected picture, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_picture_is_omitted_and_order_kept() {
        let mut rels = Relationships::new();
        rels.insert("rId5".to_string(), "ppt/media/missing.png".to_string());
        let shapes = format!(
            "{}{}{}{}",
            text_shape(0, 0, 10 * EMU, 10 * EMU, "first", None),
            picture(0, 0, 10 * EMU, 10 * EMU, "rId99"),
            picture(0, 0, 10 * EMU, 10 * EMU, "rId5"),
            text_shape(0, 0, 10 * EMU, 10 * EMU, "second", None),
        );
        let elements = walk(&shapes, &rels, &[]);

        assert_eq!(elements.len(), 2);
        assert_eq!(as_shape(&elements[0]).text, "first");
        assert_eq!(as_shape(&elements[1]).text, "second");
    }

    const GROUP: &str = r#"<p:grpSp>
  <p:nvGrpSpPr><p:cNvPr id="10" name="Group"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
  <p:grpSpPr>
    <a:xfrm><a:off x="952500" y="952500"/><a:ext cx="1905000" cy="1905000"/><a:chOff x="0" y="0"/><a:chExt cx="952500" cy="952500"/></a:xfrm>
  </p:grpSpPr>
  <p:sp>
    <p:spPr><a:xfrm><a:off x="95250" y="190500"/><a:ext cx="95250" cy="95250"/></a:xfrm></p:spPr>
    <p:txBody><a:p><a:r><a:t>child</a:t></a:r></a:p></p:txBody>
  </p:sp>
</p:grpSp>"#;

    #[test]
    fn test_group_children_composed_into_group_frame() {
        let elements = walk(GROUP, &Relationships::new(), &[]);
        let shape = as_shape(&elements[0]);
        // Group at 100px, child frame stretched 2x.
        assert_eq!(shape.bounds.x, 120.0);
        assert_eq!(shape.bounds.y, 140.0);
        assert_eq!(shape.bounds.w, 20.0);
        assert_eq!(shape.bounds.h, 20.0);
    }

    #[test]
    fn test_flat_group_mode_reads_children_as_is() {
        let elements = walk_with(GROUP, &Relationships::new(), &[], GroupTransforms::Flat);
        let shape = as_shape(&elements[0]);
        assert_eq!(shape.bounds.x, 10.0);
        assert_eq!(shape.bounds.y, 20.0);
        assert_eq!(shape.bounds.w, 10.0);
    }

    #[test]
    fn test_alternate_content_uses_fallback_branch() {
        let shapes = format!(
            "<mc:AlternateContent><mc:Choice Requires=\"p14\">{}</mc:Choice><mc:Fallback>{}</mc:Fallback></mc:AlternateContent>",
            text_shape(0, 0, 10 * EMU, 10 * EMU, "choice", None),
            text_shape(30 * EMU, 40 * EMU, 50 * EMU, 60 * EMU, "fallback", None),
        );
        let elements = walk(&shapes, &Relationships::new(), &[]);

        assert_eq!(elements.len(), 1);
        let shape = as_shape(&elements[0]);
        assert_eq!(shape.text, "fallback");
        assert_eq!(shape.bounds.x, 30.0);
        assert_eq!(shape.bounds.y, 40.0);
        assert_eq!(shape.bounds.w, 50.0);
        assert_eq!(shape.bounds.h, 60.0);
    }

    #[test]
    fn test_alternate_content_without_fallback_uses_first_choice() {
        let shapes = format!(
            "<mc:AlternateContent><mc:Choice Requires=\"p14\">{}</mc:Choice><mc:Choice Requires=\"p15\">{}</mc:Choice></mc:AlternateContent>{}",
            text_shape(0, 0, 10 * EMU, 10 * EMU, "first", None),
            text_shape(0, 0, 10 * EMU, 10 * EMU, "second", None),
            text_shape(0, 0, 10 * EMU, 10 * EMU, "after", None),
        );
        let elements = walk(&shapes, &Relationships::new(), &[]);

        assert_eq!(elements.len(), 2);
        assert_eq!(as_shape(&elements[0]).text, "first");
        assert_eq!(as_shape(&elements[1]).text, "after");
    }

    #[test]
    fn test_alternate_content_inside_group_is_composed() {
        let wrapped = GROUP
            .replacen("<p:sp>", "<mc:AlternateContent><mc:Fallback><p:sp>", 1)
            .replacen("</p:sp>", "</p:sp></mc:Fallback></mc:AlternateContent>", 1);
        let elements = walk(&wrapped, &Relationships::new(), &[]);
        let shape = as_shape(&elements[0]);
        assert_eq!(shape.bounds.x, 120.0);
        assert_eq!(shape.bounds.y, 140.0);
    }

    #[test]
    fn test_extract_text_whitespace_only_is_empty() {
        let body = parse("<p:txBody><a:p><a:r><a:t>   </a:t></a:r></a:p><a:p/></p:txBody>").unwrap();
        assert_eq!(extract_text(&body), "");
    }

    #[test]
    fn test_mime_types() {
        assert!(data_uri("ppt/media/a.JPG", b"").starts_with("data:image/jpeg;base64,"));
        assert!(data_uri("ppt/media/a.svg", b"").starts_with("data:image/svg+xml;base64,"));
        assert!(data_uri("ppt/media/a", b"").starts_with("data:application/octet-stream;base64,"));
    }
}
