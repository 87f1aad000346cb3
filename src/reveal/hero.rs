use std::collections::HashSet;

use crate::config::HeroConfig;
use crate::dom::{Document, ElementId, Selector};
use crate::schedule::{Scheduler, Task};

/// Staggered load-time reveal of the above-the-fold group
#[derive(Debug)]
pub struct HeroReveal {
    selector: Selector,
    completion_class: String,
    base_delay_ms: f64,
    stagger_ms: f64,
    reduced_motion: bool,
    scheduled: HashSet<ElementId>,
}

impl HeroReveal {
    pub fn new(config: &HeroConfig, reduced_motion: bool) -> Self {
        Self {
            selector: Selector::classes(&config.item_classes)
                .within(&config.region_class)
                .without(&config.completion_class),
            completion_class: config.completion_class.clone(),
            base_delay_ms: config.base_delay_ms,
            stagger_ms: config.stagger_ms,
            reduced_motion,
            scheduled: HashSet::new(),
        }
    }

    /// Delay before the element at `index` is revealed
    pub fn delay_for(&self, index: usize) -> f64 {
        self.base_delay_ms + index as f64 * self.stagger_ms
    }

    /// Returns the number of hero elements found
    pub fn start<D: Document, S: Scheduler>(&mut self, doc: &mut D, scheduler: &mut S) -> usize {
        if self.selector.is_empty() {
            return 0;
        }

        let items = doc.query_all(&self.selector);

        if self.reduced_motion {
            for &el in &items {
                self.mark_complete(doc, el);
            }
            return items.len();
        }

        for (index, &el) in items.iter().enumerate() {
            if self.scheduled.insert(el) {
                scheduler.set_timeout(self.delay_for(index), Task::HeroReveal(el));
            }
        }

        items.len()
    }

    pub fn reveal<D: Document>(&mut self, doc: &mut D, el: ElementId) {
        if self.scheduled.remove(&el) {
            self.mark_complete(doc, el);
        }
    }

    /// Scroll reveal may already have finished an item that carries both markers
    fn mark_complete<D: Document>(&self, doc: &mut D, el: ElementId) {
        if !doc.has_class(el, &self.completion_class) {
            doc.add_class(el, &self.completion_class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, MemoryElement};
    use crate::schedule::ManualScheduler;

    fn hero_page() -> (MemoryDocument, Vec<ElementId>) {
        let mut doc = MemoryDocument::new();
        let hero = doc.append(MemoryElement::new().with_class("hero"));
        let items = ["hero-badge", "hero-title", "hero-subtitle"]
            .iter()
            .map(|class| doc.append(MemoryElement::new().with_class(class).with_parent(hero)))
            .collect();
        (doc, items)
    }

    #[test]
    fn test_staggered_reveal() {
        let (mut doc, items) = hero_page();
        let mut scheduler = ManualScheduler::default();
        let mut hero = HeroReveal::new(&HeroConfig::default(), false);

        assert_eq!(hero.start(&mut doc, &mut scheduler), 3);
        assert!(items.iter().all(|&el| !doc.has_class(el, "animated")));

        let mut revealed_at = Vec::new();
        while let Some(task) = scheduler.take_due(f64::MAX) {
            if let Task::HeroReveal(el) = task {
                hero.reveal(&mut doc, el);
                revealed_at.push((el, scheduler.now()));
            }
        }

        assert_eq!(
            revealed_at,
            vec![(items[0], 100.0), (items[1], 250.0), (items[2], 400.0)]
        );
        assert!(items.iter().all(|&el| doc.has_class(el, "animated")));
    }

    #[test]
    fn test_reduced_motion_is_synchronous() {
        let (mut doc, items) = hero_page();
        let mut scheduler = ManualScheduler::default();
        let mut hero = HeroReveal::new(&HeroConfig::default(), true);

        hero.start(&mut doc, &mut scheduler);

        assert!(items.iter().all(|&el| doc.has_class(el, "animated")));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_missing_hero_is_noop() {
        let mut doc = MemoryDocument::new();
        doc.append(MemoryElement::new().with_class("hero-title"));
        let mut scheduler = ManualScheduler::default();
        let mut hero = HeroReveal::new(&HeroConfig::default(), false);

        assert_eq!(hero.start(&mut doc, &mut scheduler), 0);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_already_revealed_item_is_not_marked_again() {
        let (mut doc, items) = hero_page();
        let mut scheduler = ManualScheduler::default();
        let mut hero = HeroReveal::new(&HeroConfig::default(), false);
        hero.start(&mut doc, &mut scheduler);

        // Scroll reveal finished the item before its hero slot came up
        doc.add_class(items[0], "animated");
        while let Some(task) = scheduler.take_due(f64::MAX) {
            if let Task::HeroReveal(el) = task {
                hero.reveal(&mut doc, el);
            }
        }

        assert!(items.iter().all(|&el| doc.class_additions(el, "animated") == 1));
    }

    #[test]
    fn test_unknown_reveal_ignored() {
        let (mut doc, items) = hero_page();
        let mut hero = HeroReveal::new(&HeroConfig::default(), false);
        hero.reveal(&mut doc, items[0]);
        assert!(!doc.has_class(items[0], "animated"));
    }
}
