//! In-memory document
//!
//! A complete [`Document`] without a browser: element tree, classes,
//! attributes, text, inline styles and an observation registry. Text writes
//! and class additions are recorded so animation sequences can be inspected
//! after the fact.

use std::collections::{HashMap, HashSet};

use super::{Document, ElementId, ObserverKind, ObserverOptions, Rect, Selector};
use crate::error::{EngineError, Result};

/// A single element held by [`MemoryDocument`]
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    pub classes: Vec<String>,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub styles: HashMap<String, String>,
    pub rect: Rect,
    pub parent: Option<ElementId>,
    attached: bool,
    text_history: Vec<String>,
    class_history: Vec<String>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
    scroll_y: f64,
    media: HashMap<String, bool>,
    intersection_unsupported: bool,
    observations: HashMap<ObserverKind, HashSet<ElementId>>,
    observer_options: HashMap<ObserverKind, ObserverOptions>,
    observe_calls: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an element at the end of the document
    pub fn append(&mut self, mut element: MemoryElement) -> ElementId {
        element.attached = true;
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    /// Remove an element and its descendants from the document
    pub fn detach(&mut self, el: ElementId) {
        let ids: Vec<ElementId> = (0..self.elements.len())
            .map(ElementId)
            .filter(|&id| id == el || self.is_descendant_of(id, el))
            .collect();
        for id in ids {
            self.elements[id.0].attached = false;
        }
    }

    pub fn is_attached(&self, el: ElementId) -> bool {
        self.get(el).map(|e| e.attached).unwrap_or(false)
    }

    pub fn get(&self, el: ElementId) -> Option<&MemoryElement> {
        self.elements.get(el.0)
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Answer a media query; unanswered queries report the capability as absent
    pub fn set_media(&mut self, query: &str, matches: bool) {
        self.media.insert(query.to_string(), matches);
    }

    /// Simulate a host without viewport-intersection support
    pub fn disable_intersection(&mut self) {
        self.intersection_unsupported = true;
    }

    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        if let Some(element) = self.elements.get_mut(el.0) {
            element.rect = rect;
        }
    }

    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.get(el)
            .and_then(|e| e.styles.get(property))
            .map(|s| s.as_str())
    }

    /// Every value written with `set_text`, oldest first
    pub fn text_history(&self, el: ElementId) -> &[String] {
        self.get(el).map(|e| e.text_history.as_slice()).unwrap_or(&[])
    }

    /// Number of times `class` was added to the element
    pub fn class_additions(&self, el: ElementId, class: &str) -> usize {
        self.get(el)
            .map(|e| e.class_history.iter().filter(|c| *c == class).count())
            .unwrap_or(0)
    }

    pub fn is_observed(&self, kind: ObserverKind, el: ElementId) -> bool {
        self.observations
            .get(&kind)
            .map(|set| set.contains(&el))
            .unwrap_or(false)
    }

    pub fn active_observations(&self, kind: ObserverKind) -> usize {
        self.observations.get(&kind).map(|set| set.len()).unwrap_or(0)
    }

    /// Total `observe` calls across all observers
    pub fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    pub fn observer_options(&self, kind: ObserverKind) -> Option<&ObserverOptions> {
        self.observer_options.get(&kind)
    }

    fn is_descendant_of(&self, el: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.get(el).and_then(|e| e.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|e| e.parent);
        }
        false
    }

    fn has_ancestor_with_class(&self, el: ElementId, class: &str) -> bool {
        let mut current = self.get(el).and_then(|e| e.parent);
        while let Some(id) = current {
            match self.get(id) {
                Some(parent) if parent.has_class(class) => return true,
                Some(parent) => current = parent.parent,
                None => return false,
            }
        }
        false
    }

    fn matches(&self, el: ElementId, selector: &Selector) -> bool {
        let Some(element) = self.get(el) else {
            return false;
        };
        if !element.attached || selector.is_empty() {
            return false;
        }
        if !selector.any_class.is_empty()
            && !selector.any_class.iter().any(|c| element.has_class(c))
        {
            return false;
        }
        if let Some(attr) = &selector.attribute {
            if !element.attributes.contains_key(attr) {
                return false;
            }
        }
        if let Some(class) = &selector.without_class {
            if element.has_class(class) {
                return false;
            }
        }
        if let Some(class) = &selector.within_class {
            if !self.has_ancestor_with_class(el, class) {
                return false;
            }
        }
        true
    }
}

impl Document for MemoryDocument {
    fn query_all(&mut self, selector: &Selector) -> Vec<ElementId> {
        (0..self.elements.len())
            .map(ElementId)
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.get(el).map(|e| e.has_class(class)).unwrap_or(false)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(element) = self.elements.get_mut(el.0) {
            element.class_history.push(class.to_string());
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.get(el).and_then(|e| e.attributes.get(name).cloned())
    }

    fn text(&self, el: ElementId) -> String {
        self.get(el).map(|e| e.text.clone()).unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(el.0) {
            element.text = text.to_string();
            element.text_history.push(text.to_string());
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(el.0) {
            element.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        self.get(el).map(|e| e.rect).unwrap_or_default()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn media_matches(&self, query: &str) -> Option<bool> {
        self.media.get(query).copied()
    }

    fn observe(&mut self, kind: ObserverKind, options: &ObserverOptions, el: ElementId) -> Result<()> {
        if self.intersection_unsupported {
            return Err(EngineError::CapabilityMissing("IntersectionObserver"));
        }
        self.observe_calls += 1;
        self.observer_options.insert(kind, options.clone());
        self.observations.entry(kind).or_default().insert(el);
        Ok(())
    }

    fn unobserve(&mut self, kind: ObserverKind, el: ElementId) {
        if let Some(set) = self.observations.get_mut(&kind) {
            set.remove(&el);
        }
    }
}
