use crate::config::ParallaxConfig;
use crate::dom::{Document, ElementId, Selector};
use crate::schedule::{Scheduler, Task};

use super::Transform;

/// Parallax parameters for one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxSpec {
    pub element: ElementId,
    pub speed: f64,
}

impl ParallaxSpec {
    pub fn offset_for(&self, scroll_y: f64) -> f64 {
        scroll_y * self.speed
    }
}

/// Frame-throttled scroll sampler
///
/// Scroll events only arm the `ticking` latch; at most one frame update is
/// pending at any time, and that update reads the scroll offset once.
#[derive(Debug, Default)]
pub struct ParallaxController {
    elements: Vec<ParallaxSpec>,
    ticking: bool,
}

impl ParallaxController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect parallax elements. Nothing attaches under reduced motion.
    pub fn attach<D: Document>(&mut self, doc: &mut D, config: &ParallaxConfig, reduced_motion: bool) -> usize {
        if reduced_motion {
            return 0;
        }

        let found = doc.query_all(&Selector::attribute(&config.speed_attribute));
        self.elements = found
            .into_iter()
            .map(|element| {
                let speed = doc
                    .attribute(element, &config.speed_attribute)
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .filter(|s| s.is_finite())
                    .unwrap_or(config.default_speed);
                ParallaxSpec { element, speed }
            })
            .collect();

        self.elements.len()
    }

    /// Whether the host should deliver scroll events at all
    pub fn is_active(&self) -> bool {
        !self.elements.is_empty()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn on_scroll<S: Scheduler>(&mut self, scheduler: &mut S) {
        if !self.is_active() || self.ticking {
            return;
        }
        self.ticking = true;
        scheduler.request_frame(Task::ParallaxFrame);
    }

    pub fn on_frame<D: Document>(&mut self, doc: &mut D) {
        self.ticking = false;

        let scroll_y = doc.scroll_y();
        for spec in &self.elements {
            let transform = Transform::TranslateY(spec.offset_for(scroll_y));
            doc.set_style(spec.element, "transform", &transform.to_string());
        }
    }

    pub fn elements(&self) -> &[ParallaxSpec] {
        &self.elements
    }
}
