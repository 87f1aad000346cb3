//! Count-up numbers
//!
//! A counter waits until it is substantially visible, then counts from 0 to
//! its target on display frames with an ease-out curve. Each counter keeps
//! its own start time; there is no shared clock between counters.

use std::collections::HashMap;

use super::easing::{Easing, ease};
use crate::config::CounterConfig;
use crate::dom::{Document, ElementId, IntersectionEntry, ObserverKind, ObserverOptions, Selector};
use crate::reveal::VisibilityTrigger;
use crate::schedule::{Scheduler, Task};

/// Counter parameters read from an element's attributes
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSpec {
    pub target: u64,
    pub duration_ms: f64,
    pub suffix: String,
}

impl CounterSpec {
    /// `None` when the target is missing or not a non-negative integer
    pub fn from_element<D: Document>(doc: &D, el: ElementId, config: &CounterConfig) -> Option<Self> {
        let target = doc
            .attribute(el, &config.target_attribute)?
            .trim()
            .parse::<u64>()
            .ok()?;

        let duration_ms = doc
            .attribute(el, &config.duration_attribute)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(config.default_duration_ms);

        let suffix = doc
            .attribute(el, &config.suffix_attribute)
            .unwrap_or_default();

        Some(Self { target, duration_ms, suffix })
    }

    /// Displayed value after `elapsed_ms`, and whether counting is finished
    pub fn value_at(&self, elapsed_ms: f64, easing: Easing) -> (u64, bool) {
        let progress = if self.duration_ms > 0.0 {
            (elapsed_ms.max(0.0) / self.duration_ms).min(1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            return (self.target, true);
        }

        let value = (self.target as f64 * ease(progress, easing)).floor() as u64;
        (value.min(self.target), false)
    }

    pub fn display<D: Document>(&self, doc: &D, value: u64) -> String {
        format!("{}{}", doc.format_integer(value), self.suffix)
    }
}

#[derive(Debug)]
struct CounterRun {
    spec: CounterSpec,
    started_at: Option<f64>,
}

#[derive(Debug)]
pub struct CounterAnimator {
    trigger: VisibilityTrigger,
    selector: Selector,
    config: CounterConfig,
    reduced_motion: bool,
    specs: HashMap<ElementId, CounterSpec>,
    runs: HashMap<ElementId, CounterRun>,
}

impl CounterAnimator {
    pub fn new(config: &CounterConfig, reduced_motion: bool) -> Self {
        let options = ObserverOptions {
            threshold: config.threshold,
            root_margin: "0px".to_string(),
        };
        Self {
            trigger: VisibilityTrigger::new(ObserverKind::Counter, options, &config.completion_class),
            selector: Selector::attribute(&config.target_attribute).without(&config.completion_class),
            config: config.clone(),
            reduced_motion,
            specs: HashMap::new(),
            runs: HashMap::new(),
        }
    }

    /// Discover counters. Malformed targets are skipped; with reduced motion
    /// the final value is written immediately.
    pub fn scan<D: Document>(&mut self, doc: &mut D) -> usize {
        let mut candidates = Vec::new();
        for el in doc.query_all(&self.selector) {
            match CounterSpec::from_element(&*doc, el, &self.config) {
                Some(spec) => {
                    self.specs.insert(el, spec);
                    candidates.push(el);
                }
                None => tracing::debug!("Skipping counter {:?} without a numeric target", el),
            }
        }

        if self.reduced_motion {
            for &el in &candidates {
                if let Some(spec) = self.specs.remove(&el) {
                    let text = spec.display(&*doc, spec.target);
                    doc.set_text(el, &text);
                    self.trigger.complete_now(doc, el);
                }
            }
            return candidates.len();
        }

        self.trigger.observe_all(doc, candidates)
    }

    /// Start counting for every counter that just became visible
    pub fn on_intersection<D: Document, S: Scheduler>(
        &mut self,
        doc: &mut D,
        scheduler: &mut S,
        entries: &[IntersectionEntry],
    ) -> usize {
        let triggered = self.trigger.handle(doc, entries);
        for &el in &triggered {
            let Some(spec) = self.specs.remove(&el) else {
                continue;
            };
            self.runs.insert(el, CounterRun { spec, started_at: None });
            scheduler.request_frame(Task::CounterStep(el));
        }
        triggered.len()
    }

    /// One frame of one counter
    pub fn step<D: Document, S: Scheduler>(&mut self, doc: &mut D, scheduler: &mut S, el: ElementId) {
        let Some(run) = self.runs.get_mut(&el) else {
            return;
        };

        let now = scheduler.now();
        let started_at = *run.started_at.get_or_insert(now);
        let (value, done) = run.spec.value_at(now - started_at, self.config.easing);

        let text = run.spec.display(&*doc, value);
        doc.set_text(el, &text);

        if done {
            self.runs.remove(&el);
        } else {
            scheduler.request_frame(Task::CounterStep(el));
        }
    }

    pub fn is_running(&self, el: ElementId) -> bool {
        self.runs.contains_key(&el)
    }

    pub fn trigger(&self) -> &VisibilityTrigger {
        &self.trigger
    }
}
