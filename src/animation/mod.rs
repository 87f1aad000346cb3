//! Time-driven element animations
//!
//! Counters and typing reveals are small per-element state machines stepped
//! by scheduler tasks, so their progress can be driven by a real browser
//! clock or a virtual one in tests.

mod easing;
pub mod counter;
pub mod typing;

pub use easing::{Easing, ease};
pub use counter::{CounterAnimator, CounterSpec};
pub use typing::{TypingEffect, TypingSpec};
