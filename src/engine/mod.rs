//! Startup composition of every effect subsystem

pub mod preference;
pub mod orchestrator;

pub use preference::MotionPreference;
pub use orchestrator::Orchestrator;
