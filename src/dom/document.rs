use std::collections::BTreeMap;

use super::{Element, ElementId, Rect};

/// Arena of the elements currently mounted by the shell.
///
/// Ids are handed out in mount order and never reused, so a stale id can only
/// miss, never alias a newer element.
#[derive(Debug, Default)]
pub struct Document {
    elements: BTreeMap<ElementId, Element>,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId::new(self.next_id)
    }

    pub fn mount_sentinel(&mut self, bounds: Rect) -> ElementId {
        let id = self.allocate();
        self.elements.insert(id, Element::sentinel(id, bounds));
        id
    }

    pub fn mount_image(
        &mut self,
        bounds: Rect,
        placeholder: &str,
        data_src: Option<String>,
        record_id: &str,
    ) -> ElementId {
        let id = self.allocate();
        let element = Element::image(id, bounds, placeholder, data_src).with_record_id(record_id);
        self.elements.insert(id, element);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementKind;

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut doc = Document::new();
        let a = doc.mount_sentinel(Rect::default());
        let b = doc.mount_image(Rect::default(), "ph", Some("u".into()), "r1");
        assert!(a < b);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get(b).unwrap().kind(), ElementKind::Image);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut doc = Document::new();
        let a = doc.mount_sentinel(Rect::default());
        assert!(doc.remove(a).is_some());
        assert!(!doc.contains(a));

        let b = doc.mount_sentinel(Rect::default());
        assert_ne!(a, b);
        assert!(doc.remove(a).is_none());
    }
}
