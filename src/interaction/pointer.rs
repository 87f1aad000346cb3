//! Pointer tilt and magnet effects
//!
//! Stateless per event: every move recomputes the transform from the
//! element's current bounds, and leaving resets it to neutral.

use std::collections::HashSet;

use crate::config::PointerConfig;
use crate::dom::{Document, ElementId, Selector};

use super::{Transform, magnet_transform, tilt_transform};

fn discover<D: Document>(doc: &mut D, attribute: &str, reduced_motion: bool) -> Vec<ElementId> {
    if reduced_motion {
        return Vec::new();
    }
    doc.query_all(&Selector::attribute(attribute))
}

#[derive(Debug)]
pub struct PointerTiltEffect {
    config: PointerConfig,
    elements: HashSet<ElementId>,
}

impl PointerTiltEffect {
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            config: config.clone(),
            elements: HashSet::new(),
        }
    }

    pub fn attach<D: Document>(&mut self, doc: &mut D, reduced_motion: bool) -> Vec<ElementId> {
        let found = discover(doc, &self.config.tilt_attribute, reduced_motion);
        self.elements.extend(found.iter().copied());
        found
    }

    pub fn contains(&self, el: ElementId) -> bool {
        self.elements.contains(&el)
    }

    pub fn on_move<D: Document>(&self, doc: &mut D, el: ElementId, client_x: f64, client_y: f64) {
        if !self.contains(el) {
            return;
        }
        let rect = doc.bounding_rect(el);
        let transform = tilt_transform(&rect, client_x, client_y, &self.config);
        doc.set_style(el, "transform", &transform.to_string());
    }

    pub fn on_leave<D: Document>(&self, doc: &mut D, el: ElementId) {
        if !self.contains(el) {
            return;
        }
        let neutral = Transform::neutral_tilt(self.config.perspective_px);
        debug_assert!(neutral.is_neutral());
        doc.set_style(el, "transform", &neutral.to_string());
    }
}

#[derive(Debug)]
pub struct PointerMagnetEffect {
    config: PointerConfig,
    elements: HashSet<ElementId>,
}

impl PointerMagnetEffect {
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            config: config.clone(),
            elements: HashSet::new(),
        }
    }

    /// Attach to magnetic elements, skipping any already claimed by `exclude`
    pub fn attach<D: Document>(
        &mut self,
        doc: &mut D,
        reduced_motion: bool,
        exclude: &PointerTiltEffect,
    ) -> Vec<ElementId> {
        let found: Vec<ElementId> = discover(doc, &self.config.magnetic_attribute, reduced_motion)
            .into_iter()
            .filter(|&el| {
                let claimed = exclude.contains(el);
                if claimed {
                    tracing::debug!("Element {:?} is both tilt and magnetic; tilt wins", el);
                }
                !claimed
            })
            .collect();
        self.elements.extend(found.iter().copied());
        found
    }

    pub fn contains(&self, el: ElementId) -> bool {
        self.elements.contains(&el)
    }

    pub fn on_move<D: Document>(&self, doc: &mut D, el: ElementId, client_x: f64, client_y: f64) {
        if !self.contains(el) {
            return;
        }
        let rect = doc.bounding_rect(el);
        let transform = magnet_transform(&rect, client_x, client_y, &self.config);
        doc.set_style(el, "transform", &transform.to_string());
    }

    pub fn on_leave<D: Document>(&self, doc: &mut D, el: ElementId) {
        if !self.contains(el) {
            return;
        }
        let neutral = Transform::neutral_translate();
        debug_assert!(neutral.is_neutral());
        doc.set_style(el, "transform", &neutral.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, MemoryElement, Rect};

    fn card(doc: &mut MemoryDocument, attribute: &str) -> ElementId {
        doc.append(
            MemoryElement::new()
                .with_attr(attribute, "")
                .with_rect(Rect::new(100.0, 100.0, 200.0, 200.0)),
        )
    }

    #[test]
    fn test_tilt_follows_pointer_and_resets() {
        let mut doc = MemoryDocument::new();
        let el = card(&mut doc, "data-tilt");
        let mut tilt = PointerTiltEffect::new(&PointerConfig::default());
        assert_eq!(tilt.attach(&mut doc, false), vec![el]);

        tilt.on_move(&mut doc, el, 300.0, 100.0);
        assert_eq!(
            doc.style(el, "transform"),
            Some("perspective(1000px) rotateX(-10deg) rotateY(-10deg) scale3d(1.02, 1.02, 1.02)")
        );

        tilt.on_leave(&mut doc, el);
        assert_eq!(
            doc.style(el, "transform"),
            Some("perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)")
        );
    }

    #[test]
    fn test_tilt_uses_current_bounds() {
        let mut doc = MemoryDocument::new();
        let el = card(&mut doc, "data-tilt");
        let mut tilt = PointerTiltEffect::new(&PointerConfig::default());
        tilt.attach(&mut doc, false);

        // Element scrolled: the same pointer position is now its center
        doc.set_rect(el, Rect::new(200.0, 0.0, 200.0, 200.0));
        tilt.on_move(&mut doc, el, 300.0, 100.0);
        assert_eq!(
            doc.style(el, "transform"),
            Some("perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1.02, 1.02, 1.02)")
        );
    }

    #[test]
    fn test_magnet_follows_pointer_and_resets() {
        let mut doc = MemoryDocument::new();
        let el = card(&mut doc, "data-magnetic");
        let tilt = PointerTiltEffect::new(&PointerConfig::default());
        let mut magnet = PointerMagnetEffect::new(&PointerConfig::default());
        magnet.attach(&mut doc, false, &tilt);

        magnet.on_move(&mut doc, el, 250.0, 150.0);
        assert_eq!(doc.style(el, "transform"), Some("translate(15px, -15px)"));

        magnet.on_leave(&mut doc, el);
        assert_eq!(doc.style(el, "transform"), Some("translate(0px, 0px)"));
    }

    #[test]
    fn test_tilt_claims_dual_marked_elements() {
        let mut doc = MemoryDocument::new();
        let el = doc.append(MemoryElement::new().with_attr("data-tilt", "").with_attr("data-magnetic", ""));
        let mut tilt = PointerTiltEffect::new(&PointerConfig::default());
        let mut magnet = PointerMagnetEffect::new(&PointerConfig::default());

        tilt.attach(&mut doc, false);
        assert!(magnet.attach(&mut doc, false, &tilt).is_empty());
        assert!(tilt.contains(el));
        assert!(!magnet.contains(el));
    }

    #[test]
    fn test_reduced_motion_attaches_nothing() {
        let mut doc = MemoryDocument::new();
        let el = card(&mut doc, "data-tilt");
        let mut tilt = PointerTiltEffect::new(&PointerConfig::default());

        assert!(tilt.attach(&mut doc, true).is_empty());
        tilt.on_move(&mut doc, el, 0.0, 0.0);
        assert_eq!(doc.style(el, "transform"), None);
    }
}
