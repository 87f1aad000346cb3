//! One-shot reveals
//!
//! Elements gain a completion marker class exactly once, either when they
//! scroll into view or, for the hero group, on a fixed stagger after load.

pub mod visibility;
pub mod scroll_reveal;
pub mod hero;

pub use visibility::VisibilityTrigger;
pub use scroll_reveal::ScrollRevealSet;
pub use hero::HeroReveal;
