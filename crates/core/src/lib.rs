//! Core domain types, layout, and pagination for presentation-to-document
//! conversion.

pub mod error;
pub mod layout;
pub mod paginate;
pub mod types;

pub use error::{Error, Result};
pub use layout::{LayoutRenderer, NodeContent, NodeStyle, Surface, SurfaceNode};
pub use paginate::{output_filename, HtmlPaginator, Orientation, PageOptions, Paginator};
pub use types::{
    BoundingBox, CanvasSize, Color, Element, PictureElement, Presentation, ShapeElement, Slide,
};
