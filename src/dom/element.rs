use std::fmt;

use serde::{Deserialize, Serialize};

use super::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(raw: u64) -> Self {
        ElementId(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Sentinel,
    Image,
}

/// A mounted node the visibility layer can watch.
///
/// Image elements render `src` and carry the real URL in `data_src` until it is
/// swapped in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    bounds: Rect,
    src: Option<String>,
    data_src: Option<String>,
    record_id: Option<String>,
}

impl Element {
    pub fn sentinel(id: ElementId, bounds: Rect) -> Self {
        Element {
            id,
            kind: ElementKind::Sentinel,
            bounds,
            src: None,
            data_src: None,
            record_id: None,
        }
    }

    pub fn image(
        id: ElementId,
        bounds: Rect,
        placeholder: impl Into<String>,
        data_src: Option<String>,
    ) -> Self {
        Element {
            id,
            kind: ElementKind::Image,
            bounds,
            src: Some(placeholder.into()),
            data_src,
            record_id: None,
        }
    }

    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Currently rendered source.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn set_src(&mut self, src: impl Into<String>) {
        self.src = Some(src.into());
    }

    /// Pending full-resolution URL, never rendered directly.
    pub fn data_src(&self) -> Option<&str> {
        self.data_src.as_deref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_starts_on_placeholder() {
        let img = Element::image(
            ElementId::new(3),
            Rect::default(),
            "ph",
            Some("u1".to_string()),
        )
        .with_record_id("a");

        assert_eq!(img.kind(), ElementKind::Image);
        assert_eq!(img.src(), Some("ph"));
        assert_eq!(img.data_src(), Some("u1"));
        assert_eq!(img.record_id(), Some("a"));
    }

    #[test]
    fn sentinel_renders_nothing() {
        let sentinel = Element::sentinel(ElementId::new(1), Rect::new(0.0, 10.0, 5.0, 0.0));
        assert_eq!(sentinel.kind(), ElementKind::Sentinel);
        assert_eq!(sentinel.src(), None);
        assert_eq!(sentinel.bounds().y, 10.0);
    }

    #[test]
    fn display_id() {
        assert_eq!(ElementId::new(42).to_string(), "#42");
    }
}
