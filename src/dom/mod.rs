//! Minimal element model the shell mounts into: boxes, image sources, ids.

mod document;
mod element;
mod geometry;

pub use document::Document;
pub use element::{Element, ElementId, ElementKind};
pub use geometry::Rect;
