//! Scroll- and pointer-driven transforms

pub mod transform;
pub mod parallax;
pub mod pointer;

pub use transform::{Transform, tilt_transform, magnet_transform};
pub use parallax::{ParallaxController, ParallaxSpec};
pub use pointer::{PointerMagnetEffect, PointerTiltEffect};
