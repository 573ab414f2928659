use serde::{Deserialize, Serialize};

/// Axis-aligned box in document coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Same box shifted by `dy`, e.g. a viewport after scrolling.
    pub fn offset_y(&self, dy: f64) -> Rect {
        Rect {
            y: self.y + dy,
            ..*self
        }
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Share of this box's area that lies inside `root`, in `0.0..=1.0`.
    pub fn intersection_ratio(&self, root: &Rect) -> f64 {
        let area = self.area();
        if area == 0.0 {
            return if self.intersection(root).is_some() { 1.0 } else { 0.0 };
        }
        self.intersection(root)
            .map(|overlap| overlap.area() / area)
            .unwrap_or(0.0)
    }

    /// Whether this box counts as visible inside `root`.
    ///
    /// Zero-area boxes (a collapsed sentinel) are visible when they touch `root`,
    /// edges included. Anything else needs a non-zero overlap.
    pub fn is_visible_in(&self, root: &Rect) -> bool {
        self.intersection_ratio(root) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 400.0,
        height: 800.0,
    };

    #[test]
    fn fully_inside_has_ratio_one() {
        let card = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert_eq!(card.intersection_ratio(&VIEWPORT), 1.0);
        assert!(card.is_visible_in(&VIEWPORT));
    }

    #[test]
    fn half_inside_has_ratio_half() {
        let card = Rect::new(0.0, 750.0, 100.0, 100.0);
        assert_eq!(card.intersection_ratio(&VIEWPORT), 0.5);
    }

    #[test]
    fn edge_touching_box_is_not_visible() {
        let card = Rect::new(0.0, 800.0, 100.0, 100.0);
        assert_eq!(card.intersection_ratio(&VIEWPORT), 0.0);
        assert!(!card.is_visible_in(&VIEWPORT));
    }

    #[test]
    fn zero_height_sentinel_on_edge_is_visible() {
        let sentinel = Rect::new(0.0, 800.0, 400.0, 0.0);
        assert!(sentinel.is_visible_in(&VIEWPORT));
        assert!(!sentinel.is_visible_in(&VIEWPORT.offset_y(-1.0)));
    }

    #[test]
    fn offset_scrolls_viewport() {
        let card = Rect::new(0.0, 1000.0, 100.0, 100.0);
        assert!(!card.is_visible_in(&VIEWPORT));
        assert!(card.is_visible_in(&VIEWPORT.offset_y(300.0)));
    }
}
