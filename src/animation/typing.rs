//! Typewriter text reveal
//!
//! Elements ship with their final text reserved and hidden so the layout
//! does not shift. On start the text is cleared, the element is made
//! visible, and one grapheme is appended per tick.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::TypingConfig;
use crate::dom::{Document, ElementId, Selector};
use crate::schedule::{Scheduler, Task};

/// Typing parameters read from an element's attributes
#[derive(Debug, Clone, PartialEq)]
pub struct TypingSpec {
    pub text: String,
    /// Milliseconds per character
    pub speed_ms: f64,
    pub delay_ms: f64,
}

impl TypingSpec {
    pub fn from_element<D: Document>(doc: &D, el: ElementId, config: &TypingConfig) -> Option<Self> {
        let text = doc.attribute(el, &config.text_attribute)?;
        Some(Self {
            text,
            speed_ms: parse_millis(doc.attribute(el, &config.speed_attribute), config.default_speed_ms),
            delay_ms: parse_millis(doc.attribute(el, &config.delay_attribute), config.default_delay_ms),
        })
    }
}

fn parse_millis(value: Option<String>, default: f64) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

/// Per-element typing progress
#[derive(Debug)]
struct TypingRun {
    graphemes: Vec<String>,
    revealed: usize,
    speed_ms: f64,
}

impl TypingRun {
    fn new(spec: &TypingSpec) -> Self {
        Self {
            graphemes: spec.text.graphemes(true).map(str::to_string).collect(),
            revealed: 0,
            speed_ms: spec.speed_ms,
        }
    }

    /// Reveal one more grapheme and return the visible text
    fn advance(&mut self) -> String {
        self.revealed = (self.revealed + 1).min(self.graphemes.len());
        self.graphemes[..self.revealed].concat()
    }

    fn is_done(&self) -> bool {
        self.revealed >= self.graphemes.len()
    }
}

#[derive(Debug)]
pub struct TypingEffect {
    selector: Selector,
    config: TypingConfig,
    reduced_motion: bool,
    started: bool,
    runs: HashMap<ElementId, TypingRun>,
}

impl TypingEffect {
    pub fn new(config: &TypingConfig, reduced_motion: bool) -> Self {
        Self {
            selector: Selector::attribute(&config.text_attribute),
            config: config.clone(),
            reduced_motion,
            started: false,
            runs: HashMap::new(),
        }
    }

    /// Startup offset the orchestrator waits before calling [`TypingEffect::start`]
    pub fn settle_delay_ms(&self) -> f64 {
        self.config.settle_delay_ms
    }

    /// Clear every typing element and schedule its first character.
    /// Runs once; later calls return 0.
    pub fn start<D: Document, S: Scheduler>(&mut self, doc: &mut D, scheduler: &mut S) -> usize {
        if self.started {
            return 0;
        }
        self.started = true;

        let elements = doc.query_all(&self.selector);
        for &el in &elements {
            let Some(spec) = TypingSpec::from_element(&*doc, el, &self.config) else {
                continue;
            };

            if self.reduced_motion {
                doc.set_text(el, &spec.text);
                doc.set_style(el, "visibility", "visible");
                continue;
            }

            doc.set_text(el, "");
            doc.set_style(el, "visibility", "visible");

            let run = TypingRun::new(&spec);
            if run.is_done() {
                continue;
            }
            self.runs.insert(el, run);
            scheduler.set_timeout(spec.delay_ms + spec.speed_ms, Task::TypeNext(el));
        }

        tracing::debug!("Typing effect started for {} element(s)", elements.len());
        elements.len()
    }

    /// One tick of one typing element
    pub fn type_next<D: Document, S: Scheduler>(&mut self, doc: &mut D, scheduler: &mut S, el: ElementId) {
        let Some(run) = self.runs.get_mut(&el) else {
            return;
        };

        let visible = run.advance();
        doc.set_text(el, &visible);

        if run.is_done() {
            self.runs.remove(&el);
        } else {
            scheduler.set_timeout(run.speed_ms, Task::TypeNext(el));
        }
    }

    pub fn is_typing(&self, el: ElementId) -> bool {
        self.runs.contains_key(&el)
    }
}
