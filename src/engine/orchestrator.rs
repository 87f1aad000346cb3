//! Engine composition root
//!
//! Owns the document, the scheduler and one instance of every subsystem.
//! Subsystems never see each other; the orchestrator routes host events and
//! scheduled tasks to the one that owns them.

use crate::animation::{CounterAnimator, TypingEffect};
use crate::config::EngineConfig;
use crate::dom::{Document, ElementId, IntersectionEntry, ObserverKind};
use crate::interaction::{ParallaxController, PointerMagnetEffect, PointerTiltEffect};
use crate::reveal::{HeroReveal, ScrollRevealSet};
use crate::schedule::{ManualScheduler, Scheduler, Task};

use super::MotionPreference;

pub struct Orchestrator<D: Document, S: Scheduler> {
    doc: D,
    scheduler: S,
    config: EngineConfig,
    preference: MotionPreference,
    initialized: bool,
    reveal: ScrollRevealSet,
    hero: HeroReveal,
    counters: CounterAnimator,
    parallax: ParallaxController,
    typing: TypingEffect,
    tilt: PointerTiltEffect,
    magnet: PointerMagnetEffect,
    pointer_targets: Vec<ElementId>,
}

impl<D: Document, S: Scheduler> Orchestrator<D, S> {
    /// Create an engine, reading the motion preference from the document
    pub fn new(doc: D, scheduler: S, config: EngineConfig) -> Self {
        let preference = MotionPreference::detect(&doc, &config.reduced_motion_query);
        Self::with_preference(doc, scheduler, config, preference)
    }

    pub fn with_preference(doc: D, scheduler: S, config: EngineConfig, preference: MotionPreference) -> Self {
        let reduced = preference.prefers_reduced_motion();
        Self {
            reveal: ScrollRevealSet::new(&config.reveal, config.reveal_root_margin(), reduced),
            hero: HeroReveal::new(&config.hero, reduced),
            counters: CounterAnimator::new(&config.counter, reduced),
            parallax: ParallaxController::new(),
            typing: TypingEffect::new(&config.typing, reduced),
            tilt: PointerTiltEffect::new(&config.pointer),
            magnet: PointerMagnetEffect::new(&config.pointer),
            pointer_targets: Vec::new(),
            doc,
            scheduler,
            config,
            preference,
            initialized: false,
        }
    }

    /// Discover elements and attach every subsystem. A second call only re-scans.
    pub fn initialize(&mut self) {
        if self.initialized {
            self.refresh();
            return;
        }
        self.initialized = true;

        let reduced = self.preference.prefers_reduced_motion();

        let revealed = self.reveal.scan(&mut self.doc);
        let hero = self.hero.start(&mut self.doc, &mut self.scheduler);
        let counters = self.counters.scan(&mut self.doc);
        let parallax = self.parallax.attach(&mut self.doc, &self.config.parallax, reduced);

        let tilt = self.tilt.attach(&mut self.doc, reduced);
        let magnet = self.magnet.attach(&mut self.doc, reduced, &self.tilt);
        self.pointer_targets = tilt.iter().chain(magnet.iter()).copied().collect();

        // Typing waits out layout-affecting entrance animations, unless there are none
        if reduced {
            self.typing.start(&mut self.doc, &mut self.scheduler);
        } else {
            self.scheduler
                .set_timeout(self.typing.settle_delay_ms(), Task::TypingStart);
        }

        tracing::info!(
            reduced_motion = reduced,
            reveal = revealed,
            hero,
            counters,
            parallax,
            tilt = tilt.len(),
            magnet = magnet.len(),
            "Motion engine initialized"
        );
    }

    /// Re-scan for scroll-reveal elements inserted after load. Safe to call any number of times.
    pub fn refresh(&mut self) {
        let added = self.reveal.scan(&mut self.doc);
        if added > 0 {
            tracing::debug!("Refresh picked up {} new reveal element(s)", added);
        }
    }

    pub fn on_intersection(&mut self, kind: ObserverKind, entries: &[IntersectionEntry]) {
        match kind {
            ObserverKind::Reveal => {
                self.reveal.on_intersection(&mut self.doc, entries);
            }
            ObserverKind::Counter => {
                self.counters
                    .on_intersection(&mut self.doc, &mut self.scheduler, entries);
            }
        }
    }

    pub fn on_scroll(&mut self) {
        self.parallax.on_scroll(&mut self.scheduler);
    }

    pub fn on_pointer_move(&mut self, el: ElementId, client_x: f64, client_y: f64) {
        self.tilt.on_move(&mut self.doc, el, client_x, client_y);
        self.magnet.on_move(&mut self.doc, el, client_x, client_y);
    }

    pub fn on_pointer_leave(&mut self, el: ElementId) {
        self.tilt.on_leave(&mut self.doc, el);
        self.magnet.on_leave(&mut self.doc, el);
    }

    /// Run one scheduled task
    pub fn dispatch(&mut self, task: Task) {
        match task {
            Task::CounterStep(el) => self.counters.step(&mut self.doc, &mut self.scheduler, el),
            Task::ParallaxFrame => self.parallax.on_frame(&mut self.doc),
            Task::TypingStart => {
                self.typing.start(&mut self.doc, &mut self.scheduler);
            }
            Task::TypeNext(el) => self.typing.type_next(&mut self.doc, &mut self.scheduler, el),
            Task::HeroReveal(el) => self.hero.reveal(&mut self.doc, el),
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.preference.prefers_reduced_motion()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the host needs to forward scroll events
    pub fn wants_scroll(&self) -> bool {
        self.parallax.is_active()
    }

    /// Elements the host should forward pointer move/leave events for
    pub fn pointer_targets(&self) -> &[ElementId] {
        &self.pointer_targets
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<D: Document> Orchestrator<D, ManualScheduler> {
    /// Advance the virtual clock, running every task that falls due
    pub fn advance_by(&mut self, ms: f64) {
        let until = self.scheduler.now() + ms;
        while let Some(task) = self.scheduler.take_due(until) {
            self.dispatch(task);
        }
        self.scheduler.set_now(until);
    }
}
