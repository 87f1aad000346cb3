//! Queryable document abstraction
//!
//! The engine never touches `web_sys` directly. It discovers elements and
//! mutates them through [`Document`], which is implemented over the real DOM
//! in `crate::web` and in memory by [`MemoryDocument`].

pub mod selector;
pub mod memory;

pub use selector::Selector;
pub use memory::{MemoryDocument, MemoryElement};

use crate::error::Result;

/// Opaque handle to an element known to a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element bounds in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Pointer offset from the rectangle's geometric center
    pub fn offset_from_center(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let x = client_x - self.left;
        let y = client_y - self.top;
        (x - self.width / 2.0, y - self.height / 2.0)
    }
}

/// Which visibility subsystem owns an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    Reveal,
    Counter,
}

/// Options for a viewport-intersection observer
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

/// Host-neutral report of one element's intersection change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn visible(target: ElementId, ratio: f64) -> Self {
        Self { target, ratio, is_intersecting: ratio > 0.0 }
    }

    pub fn hidden(target: ElementId) -> Self {
        Self { target, ratio: 0.0, is_intersecting: false }
    }
}

/// Element discovery and mutation capability injected into the engine
pub trait Document {
    /// All attached elements matching the selector, in document order
    fn query_all(&mut self, selector: &Selector) -> Vec<ElementId>;

    fn has_class(&self, el: ElementId, class: &str) -> bool;

    fn add_class(&mut self, el: ElementId, class: &str);

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    fn text(&self, el: ElementId) -> String;

    fn set_text(&mut self, el: ElementId, text: &str);

    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    fn bounding_rect(&self, el: ElementId) -> Rect;

    /// Current vertical scroll offset of the page
    fn scroll_y(&self) -> f64;

    /// Evaluate a media query; `None` when the host cannot answer
    fn media_matches(&self, query: &str) -> Option<bool>;

    /// Start observing an element's viewport intersection
    fn observe(&mut self, kind: ObserverKind, options: &ObserverOptions, el: ElementId) -> Result<()>;

    /// Stop observing; unknown or detached elements are ignored
    fn unobserve(&mut self, kind: ObserverKind, el: ElementId);

    /// Integer with locale digit grouping
    fn format_integer(&self, value: u64) -> String {
        group_thousands(value, ',')
    }
}

/// Group decimal digits in threes: `1500` -> `1,500`
pub fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, ','), "0");
        assert_eq!(group_thousands(999, ','), "999");
        assert_eq!(group_thousands(1500, ','), "1,500");
        assert_eq!(group_thousands(1234567, ','), "1,234,567");
        assert_eq!(group_thousands(100000, '.'), "100.000");
    }

    #[test]
    fn test_offset_from_center() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(rect.offset_from_center(200.0, 100.0), (0.0, 0.0));
        assert_eq!(rect.offset_from_center(100.0, 50.0), (-100.0, -50.0));
        assert_eq!(rect.offset_from_center(300.0, 150.0), (100.0, 50.0));
    }
}
