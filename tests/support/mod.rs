//! Shared fixtures for session tests.

#![allow(dead_code)]

use lazy_feed::{ImageRecord, Rect};

pub const VIEWPORT_HEIGHT: f64 = 800.0;
pub const CARD_HEIGHT: f64 = 300.0;

/// Viewport scrolled to `scroll_top`.
pub fn viewport_at(scroll_top: f64) -> Rect {
    Rect::new(0.0, scroll_top, 400.0, VIEWPORT_HEIGHT)
}

/// A viewport far away from anything mounted.
pub fn offscreen() -> Rect {
    viewport_at(-10_000.0)
}

/// Single-column layout: card `index` sits directly below card `index - 1`.
pub fn column(index: usize, _record: &ImageRecord) -> Rect {
    Rect::new(0.0, index as f64 * CARD_HEIGHT, 400.0, CARD_HEIGHT)
}

/// Sentinel box right after `cards` cards.
pub fn sentinel_after(cards: usize) -> Rect {
    Rect::new(0.0, cards as f64 * CARD_HEIGHT, 400.0, 1.0)
}

pub fn records(prefix: &str, n: usize) -> Vec<ImageRecord> {
    (0..n)
        .map(|i| {
            ImageRecord::new(
                format!("{prefix}{i}"),
                format!("author {i}"),
                format!("https://img.example/{prefix}{i}.jpg"),
            )
        })
        .collect()
}

pub fn ids(records: &[ImageRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}
