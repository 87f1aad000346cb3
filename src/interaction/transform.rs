//! CSS transform values
//!
//! Pointer effects are pure functions of the latest pointer position; the
//! result is a [`Transform`] rendered to a `transform` style value.

use std::fmt;

use crate::config::PointerConfig;
use crate::dom::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// 3-D card tilt
    Tilt {
        perspective_px: f64,
        rotate_x_deg: f64,
        rotate_y_deg: f64,
        scale: f64,
    },
    /// Planar offset
    Translate { x_px: f64, y_px: f64 },
    /// Vertical offset only
    TranslateY(f64),
}

impl Transform {
    /// Resting tilt: no rotation, unit scale
    pub fn neutral_tilt(perspective_px: f64) -> Self {
        Transform::Tilt {
            perspective_px,
            rotate_x_deg: 0.0,
            rotate_y_deg: 0.0,
            scale: 1.0,
        }
    }

    pub fn neutral_translate() -> Self {
        Transform::Translate { x_px: 0.0, y_px: 0.0 }
    }

    pub fn is_neutral(&self) -> bool {
        match *self {
            Transform::Tilt { rotate_x_deg, rotate_y_deg, scale, .. } => {
                rotate_x_deg == 0.0 && rotate_y_deg == 0.0 && scale == 1.0
            }
            Transform::Translate { x_px, y_px } => x_px == 0.0 && y_px == 0.0,
            Transform::TranslateY(y) => y == 0.0,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Transform::Tilt { perspective_px, rotate_x_deg, rotate_y_deg, scale } => write!(
                f,
                "perspective({}px) rotateX({}deg) rotateY({}deg) scale3d({}, {}, {})",
                perspective_px,
                round2(rotate_x_deg),
                round2(rotate_y_deg),
                scale,
                scale,
                scale
            ),
            Transform::Translate { x_px, y_px } => {
                write!(f, "translate({}px, {}px)", round2(x_px), round2(y_px))
            }
            Transform::TranslateY(y) => write!(f, "translateY({}px)", round2(y)),
        }
    }
}

/// Two decimals are below a device pixel; also normalizes `-0`
fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Tilt toward the pointer: the pointer's offset from center divided by the damping
pub fn tilt_transform(rect: &Rect, client_x: f64, client_y: f64, config: &PointerConfig) -> Transform {
    let (dx, dy) = rect.offset_from_center(client_x, client_y);
    Transform::Tilt {
        perspective_px: config.perspective_px,
        rotate_x_deg: dy / config.tilt_damping,
        rotate_y_deg: -dx / config.tilt_damping,
        scale: config.tilt_scale,
    }
}

/// Drift toward the pointer by a fraction of its offset from center
pub fn magnet_transform(rect: &Rect, client_x: f64, client_y: f64, config: &PointerConfig) -> Transform {
    let (dx, dy) = rect.offset_from_center(client_x, client_y);
    Transform::Translate {
        x_px: dx * config.magnet_strength,
        y_px: dy * config.magnet_strength,
    }
}
