//! Discrete gesture signal derived from one landmark sample

use std::fmt;

use crate::spatial::Point3D;

/// Coarse hand posture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    /// Fingers spread away from the wrist
    Open,
    /// Fingers curled toward the wrist
    Fist,
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Posture::Open => write!(f, "open"),
            Posture::Fist => write!(f, "fist"),
        }
    }
}

/// Gesture classification of a single detected hand.
///
/// Immutable; a new one replaces the previous value every detection cycle.
/// "No hand" is represented as `Option::<GestureSignal>::None`.
///
/// `is_open` and `is_pinching` are evaluated independently. With the
/// default thresholds a pinch with the other fingers spread is possible but
/// rare, so callers must not assume the two are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSignal {
    /// Mean wrist-to-fingertip distance exceeded the open threshold
    pub is_open: bool,
    /// Thumb and index tips are closer than the pinch threshold
    pub is_pinching: bool,
    /// Thumb-to-index distance in the image plane
    pub pinch_distance: f32,
    pub wrist: Point3D,
    pub index_tip: Point3D,
    pub thumb_tip: Point3D,
}

impl GestureSignal {
    /// Open or fist
    pub fn posture(&self) -> Posture {
        if self.is_open {
            Posture::Open
        } else {
            Posture::Fist
        }
    }

    /// Short human-readable summary for the HUD and logs
    pub fn describe(&self) -> String {
        if self.is_pinching {
            format!("{} + pinch @ x={:.2}", self.posture(), self.wrist.x)
        } else {
            format!("{} @ x={:.2}", self.posture(), self.wrist.x)
        }
    }
}
