use std::collections::HashSet;

use crate::dom::{Document, ElementId, IntersectionEntry, ObserverKind, ObserverOptions, Selector};

/// Browsers may report a ratio fractionally below the threshold that fired
const RATIO_TOLERANCE: f64 = 1e-3;

/// Single-fire "element entered the viewport" detector
///
/// Each element is observed at most once. The first qualifying intersection
/// marks it complete, adds the completion class and releases the
/// observation; later reports for the same element are ignored.
#[derive(Debug)]
pub struct VisibilityTrigger {
    kind: ObserverKind,
    options: ObserverOptions,
    completion_class: String,
    observed: HashSet<ElementId>,
    completed: HashSet<ElementId>,
    /// Set once the host refuses to observe; the trigger then stays inert
    unavailable: bool,
}

impl VisibilityTrigger {
    pub fn new(kind: ObserverKind, options: ObserverOptions, completion_class: &str) -> Self {
        Self {
            kind,
            options,
            completion_class: completion_class.to_string(),
            observed: HashSet::new(),
            completed: HashSet::new(),
            unavailable: false,
        }
    }

    /// Observe every matching element that is neither complete nor already observed.
    /// Returns the number of new observations.
    pub fn scan<D: Document>(&mut self, doc: &mut D, selector: &Selector) -> usize {
        if self.unavailable {
            return 0;
        }
        let found = doc.query_all(selector);
        self.observe_all(doc, found)
    }

    /// Observe pre-filtered candidates, skipping complete and observed ones
    pub fn observe_all<D: Document>(
        &mut self,
        doc: &mut D,
        elements: impl IntoIterator<Item = ElementId>,
    ) -> usize {
        if self.unavailable {
            return 0;
        }

        let mut added = 0;
        for el in elements {
            if self.completed.contains(&el)
                || self.observed.contains(&el)
                || doc.has_class(el, &self.completion_class)
            {
                continue;
            }

            match doc.observe(self.kind, &self.options, el) {
                Ok(()) => {
                    self.observed.insert(el);
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!("{:?} visibility trigger disabled: {}", self.kind, e);
                    self.unavailable = true;
                    break;
                }
            }
        }

        added
    }

    /// Process intersection reports, returning the elements completed by them
    pub fn handle<D: Document>(&mut self, doc: &mut D, entries: &[IntersectionEntry]) -> Vec<ElementId> {
        let mut triggered = Vec::new();

        for entry in entries {
            if !entry.is_intersecting || entry.ratio + RATIO_TOLERANCE < self.options.threshold {
                continue;
            }
            if !self.observed.remove(&entry.target) {
                continue;
            }

            doc.unobserve(self.kind, entry.target);
            self.mark_complete(doc, entry.target);
            triggered.push(entry.target);
        }

        triggered
    }

    /// Apply the end state without observing
    pub fn complete_now<D: Document>(&mut self, doc: &mut D, el: ElementId) {
        if self.observed.remove(&el) {
            doc.unobserve(self.kind, el);
        }
        if !self.completed.contains(&el) {
            self.mark_complete(doc, el);
        }
    }

    fn mark_complete<D: Document>(&mut self, doc: &mut D, el: ElementId) {
        self.completed.insert(el);
        if !doc.has_class(el, &self.completion_class) {
            doc.add_class(el, &self.completion_class);
        }
    }

    pub fn is_observing(&self, el: ElementId) -> bool {
        self.observed.contains(&el)
    }

    pub fn is_complete(&self, el: ElementId) -> bool {
        self.completed.contains(&el)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub fn is_available(&self) -> bool {
        !self.unavailable
    }

    pub fn completion_class(&self) -> &str {
        &self.completion_class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, MemoryElement};

    fn trigger(threshold: f64) -> VisibilityTrigger {
        VisibilityTrigger::new(
            ObserverKind::Reveal,
            ObserverOptions { threshold, root_margin: "0px 0px -50px 0px".to_string() },
            "animated",
        )
    }

    fn selector() -> Selector {
        Selector::classes(&["fade-in"]).without("animated")
    }

    #[test]
    fn test_scan_observes_pending_elements() {
        let mut doc = MemoryDocument::new();
        let a = doc.append(MemoryElement::new().with_class("fade-in"));
        let _done = doc.append(MemoryElement::new().with_class("fade-in").with_class("animated"));

        let mut trigger = trigger(0.1);
        assert_eq!(trigger.scan(&mut doc, &selector()), 1);
        assert!(trigger.is_observing(a));
        assert_eq!(doc.active_observations(ObserverKind::Reveal), 1);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let mut doc = MemoryDocument::new();
        doc.append(MemoryElement::new().with_class("fade-in"));
        doc.append(MemoryElement::new().with_class("fade-in"));

        let mut trigger = trigger(0.1);
        assert_eq!(trigger.scan(&mut doc, &selector()), 2);
        assert_eq!(trigger.scan(&mut doc, &selector()), 0);
        assert_eq!(doc.observe_calls(), 2);
    }

    #[test]
    fn test_fires_exactly_once() {
        let mut doc = MemoryDocument::new();
        let el = doc.append(MemoryElement::new().with_class("fade-in"));
        let mut trigger = trigger(0.1);
        trigger.scan(&mut doc, &selector());

        let fired = trigger.handle(&mut doc, &[IntersectionEntry::visible(el, 0.3)]);
        assert_eq!(fired, vec![el]);
        assert!(trigger.is_complete(el));
        assert!(!doc.is_observed(ObserverKind::Reveal, el));

        // Oscillating in and out of view does nothing further
        trigger.handle(&mut doc, &[IntersectionEntry::hidden(el)]);
        let again = trigger.handle(&mut doc, &[IntersectionEntry::visible(el, 0.9)]);
        assert!(again.is_empty());
        assert_eq!(doc.class_additions(el, "animated"), 1);
    }

    #[test]
    fn test_below_threshold_ignored() {
        let mut doc = MemoryDocument::new();
        let el = doc.append(MemoryElement::new().with_class("fade-in"));
        let mut trigger = trigger(0.5);
        trigger.scan(&mut doc, &selector());

        assert!(trigger.handle(&mut doc, &[IntersectionEntry::visible(el, 0.2)]).is_empty());
        assert!(trigger.is_observing(el));

        assert_eq!(trigger.handle(&mut doc, &[IntersectionEntry::visible(el, 0.4995)]), vec![el]);
    }

    #[test]
    fn test_completed_not_reobserved() {
        let mut doc = MemoryDocument::new();
        let el = doc.append(MemoryElement::new().with_class("fade-in"));
        let mut trigger = trigger(0.1);
        trigger.scan(&mut doc, &selector());
        trigger.handle(&mut doc, &[IntersectionEntry::visible(el, 1.0)]);

        // Even a selector that ignores the completion class cannot re-observe it
        let loose = Selector::classes(&["fade-in"]);
        assert_eq!(trigger.scan(&mut doc, &loose), 0);
        assert!(!doc.is_observed(ObserverKind::Reveal, el));
    }

    #[test]
    fn test_detached_element_trigger_is_safe() {
        let mut doc = MemoryDocument::new();
        let el = doc.append(MemoryElement::new().with_class("fade-in"));
        let mut trigger = trigger(0.1);
        trigger.scan(&mut doc, &selector());

        doc.detach(el);
        let fired = trigger.handle(&mut doc, &[IntersectionEntry::visible(el, 1.0)]);
        assert_eq!(fired, vec![el]);
        assert_eq!(trigger.observed_count(), 0);
    }

    #[test]
    fn test_missing_capability_disables_trigger() {
        let mut doc = MemoryDocument::new();
        doc.disable_intersection();
        let el = doc.append(MemoryElement::new().with_class("fade-in"));

        let mut trigger = trigger(0.1);
        assert_eq!(trigger.scan(&mut doc, &selector()), 0);
        assert!(!trigger.is_available());
        assert!(!trigger.is_complete(el));
    }

    #[test]
    fn test_complete_now_releases_observation() {
        let mut doc = MemoryDocument::new();
        let el = doc.append(MemoryElement::new().with_class("fade-in"));
        let mut trigger = trigger(0.1);
        trigger.scan(&mut doc, &selector());

        trigger.complete_now(&mut doc, el);
        trigger.complete_now(&mut doc, el);

        assert!(!doc.is_observed(ObserverKind::Reveal, el));
        assert_eq!(doc.class_additions(el, "animated"), 1);
    }
}
