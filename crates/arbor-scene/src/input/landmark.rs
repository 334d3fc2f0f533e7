//! Hand landmark samples as delivered by the detection service

use crate::spatial::Point3D;

/// Number of landmarks in one hand sample
pub const LANDMARK_COUNT: usize = 21;

/// Wrist
pub const WRIST: usize = 0;
/// Thumb tip
pub const THUMB_TIP: usize = 4;
/// Index finger tip
pub const INDEX_TIP: usize = 8;
/// Middle finger tip
pub const MIDDLE_TIP: usize = 12;
/// Ring finger tip
pub const RING_TIP: usize = 16;
/// Pinky tip
pub const PINKY_TIP: usize = 20;

/// The four non-thumb fingertips, index to pinky
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// A detector returned a hand with the wrong number of points
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 21 landmarks, got {0}")]
pub struct LandmarkCountError(pub usize);

/// One hand: 21 normalized points.
///
/// x and y lie in [0, 1] across the camera image; z is depth relative to
/// the wrist. Coordinates are taken as given. Out-of-range values are the
/// detector's problem, not something this type checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSample {
    points: [Point3D; LANDMARK_COUNT],
}

impl LandmarkSample {
    /// Wrap a full set of points
    pub fn new(points: [Point3D; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Copy points out of a detector buffer
    pub fn from_slice(points: &[Point3D]) -> Result<Self, LandmarkCountError> {
        let points: [Point3D; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkCountError(points.len()))?;
        Ok(Self { points })
    }

    /// Point at a landmark index
    pub fn point(&self, index: usize) -> Point3D {
        self.points[index]
    }

    /// All points in landmark order
    pub fn points(&self) -> &[Point3D; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Point3D {
        self.points[WRIST]
    }

    pub fn thumb_tip(&self) -> Point3D {
        self.points[THUMB_TIP]
    }

    pub fn index_tip(&self) -> Point3D {
        self.points[INDEX_TIP]
    }

    /// Index, middle, ring and pinky tips
    pub fn fingertips(&self) -> [Point3D; 4] {
        FINGERTIPS.map(|i| self.points[i])
    }
}

impl TryFrom<Vec<Point3D>> for LandmarkSample {
    type Error = LandmarkCountError;

    fn try_from(points: Vec<Point3D>) -> Result<Self, Self::Error> {
        Self::from_slice(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_checks_length() {
        let short = vec![Point3D::ORIGIN; 20];
        assert_eq!(LandmarkSample::from_slice(&short), Err(LandmarkCountError(20)));

        let mut full = vec![Point3D::ORIGIN; LANDMARK_COUNT];
        full[INDEX_TIP] = Point3D::new(0.1, 0.2, 0.0);
        let sample = LandmarkSample::try_from(full).unwrap();
        assert_eq!(sample.index_tip(), Point3D::new(0.1, 0.2, 0.0));
        assert_eq!(sample.fingertips()[0], sample.index_tip());
    }
}
