use crate::config::RevealConfig;
use crate::dom::{Document, IntersectionEntry, ObserverKind, ObserverOptions, Selector};

use super::VisibilityTrigger;

/// Scroll reveal across every animation-class marker
///
/// The completion class is the only effect; the stylesheet owns the
/// transition it starts.
#[derive(Debug)]
pub struct ScrollRevealSet {
    trigger: VisibilityTrigger,
    selector: Selector,
    reduced_motion: bool,
}

impl ScrollRevealSet {
    pub fn new(config: &RevealConfig, root_margin: String, reduced_motion: bool) -> Self {
        let options = ObserverOptions {
            threshold: config.threshold,
            root_margin,
        };
        Self {
            trigger: VisibilityTrigger::new(ObserverKind::Reveal, options, &config.completion_class),
            selector: Selector::classes(&config.classes).without(&config.completion_class),
            reduced_motion,
        }
    }

    /// Discover pending elements. With reduced motion they complete on the spot.
    pub fn scan<D: Document>(&mut self, doc: &mut D) -> usize {
        if self.selector.is_empty() {
            return 0;
        }

        if self.reduced_motion {
            let pending = doc.query_all(&self.selector);
            for &el in &pending {
                self.trigger.complete_now(doc, el);
            }
            return pending.len();
        }

        self.trigger.scan(doc, &self.selector)
    }

    pub fn on_intersection<D: Document>(&mut self, doc: &mut D, entries: &[IntersectionEntry]) -> usize {
        let triggered = self.trigger.handle(doc, entries);
        if !triggered.is_empty() {
            tracing::debug!("Revealed {} element(s)", triggered.len());
        }
        triggered.len()
    }

    pub fn trigger(&self) -> &VisibilityTrigger {
        &self.trigger
    }
}
