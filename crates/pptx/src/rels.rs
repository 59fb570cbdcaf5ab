//! Relationship parts (`_rels/*.rels`) and target resolution.

use crate::package::PptxPackage;
use crate::xml;
use deck_core::Result;
use std::collections::HashMap;

/// Relationship id -> absolute part path (without a leading slash).
pub type Relationships = HashMap<String, String>;

/// Path of the relationship part owned by `part_path`:
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Load the relationships of a part.
///
/// A missing relationship part yields an empty map. Targets are resolved
/// against the owning part's directory; external targets are skipped.
pub fn resolve_relationships(package: &PptxPackage, part_path: &str) -> Result<Relationships> {
    let rels_path = rels_path_for(part_path);
    let Some(content) = package.get_part_text(&rels_path) else {
        log::debug!("No relationship part for {}", part_path);
        return Ok(Relationships::new());
    };

    let root = xml::parse(&content)?;
    let base_dir = part_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    let mut relationships = Relationships::new();

    for rel in root.children_named("Relationship") {
        let (Some(id), Some(target)) = (rel.attr("Id"), rel.attr("Target")) else {
            continue;
        };
        if rel.attr("TargetMode") == Some("External") {
            continue;
        }
        relationships.insert(id.to_string(), resolve_target(base_dir, target));
    }

    Ok(relationships)
}

/// Resolve a relationship target against the owning part's directory.
///
/// Absolute targets (`/ppt/media/a.png`) are taken from the package root;
/// `.` and `..` segments are collapsed.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if base_dir.is_empty() {
        target.to_string()
    } else {
        format!("{}/{}", base_dir, target)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
