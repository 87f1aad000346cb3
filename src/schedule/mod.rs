//! Deferred work
//!
//! All suspension points of the engine are named [`Task`]s handed to a
//! [`Scheduler`]. The host decides when they run: on the next display frame,
//! or after a fixed delay.

mod manual;

pub use manual::ManualScheduler;

use crate::dom::ElementId;

/// A deferred engine callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Advance one counter by the elapsed time
    CounterStep(ElementId),
    /// Apply the latest scroll offset to every parallax element
    ParallaxFrame,
    /// Typing subsystem start after the settle delay
    TypingStart,
    /// Reveal the next character of one typing element
    TypeNext(ElementId),
    /// Add the completion marker to one hero element
    HeroReveal(ElementId),
}

/// Host clock, frame and timer capability
pub trait Scheduler {
    /// Monotonic time in milliseconds
    fn now(&self) -> f64;

    /// Run `task` on the next display frame
    fn request_frame(&mut self, task: Task);

    /// Run `task` once after `delay_ms`
    fn set_timeout(&mut self, delay_ms: f64, task: Task);
}
