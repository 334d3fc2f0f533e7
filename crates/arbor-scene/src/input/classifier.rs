//! Stateless landmark → gesture classification
//!
//! No smoothing or debouncing happens here. Temporal stability belongs to
//! whoever consumes the signal, so this stays a pure function that can be
//! tested one sample at a time.

use super::gesture::GestureSignal;
use super::landmark::LandmarkSample;

/// Mean wrist-to-fingertip distance above which a hand is open.
///
/// Tuned for normalized coordinates from a front-facing camera at typical
/// framing distance; not derived from anything.
pub const DEFAULT_OPEN_THRESHOLD: f32 = 0.25;

/// Thumb-to-index distance below which a hand is pinching
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.05;

/// Classifies landmark samples into gesture signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    pub open_threshold: f32,
    pub pinch_threshold: f32,
}

impl GestureClassifier {
    pub fn new(open_threshold: f32, pinch_threshold: f32) -> Self {
        Self {
            open_threshold,
            pinch_threshold,
        }
    }

    /// Classify one sample. Absent in, absent out.
    ///
    /// Distances are measured in the XY plane only; depth is ignored.
    pub fn classify(&self, sample: Option<&LandmarkSample>) -> Option<GestureSignal> {
        let sample = sample?;
        let wrist = sample.wrist();

        let tips = sample.fingertips();
        let avg_tip_distance =
            tips.iter().map(|tip| wrist.planar_distance(tip)).sum::<f32>() / tips.len() as f32;

        let thumb_tip = sample.thumb_tip();
        let index_tip = sample.index_tip();
        let pinch_distance = thumb_tip.planar_distance(&index_tip);

        Some(GestureSignal {
            is_open: avg_tip_distance > self.open_threshold,
            is_pinching: pinch_distance < self.pinch_threshold,
            pinch_distance,
            wrist,
            index_tip,
            thumb_tip,
        })
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_THRESHOLD, DEFAULT_PINCH_THRESHOLD)
    }
}
