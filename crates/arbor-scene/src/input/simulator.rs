//! Simulated camera and detectors for development without hardware
//!
//! [`HandSimulator`] maps keyboard input to a [`HandPose`];
//! [`synthesize_landmarks`] turns a pose into a landmark sample that the
//! real classifier reads back as the same gesture. [`PoseDetector`] and
//! [`ScriptedDetector`] plug those into the detection loop in place of a
//! real landmark service.

use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::detection::{Camera, CameraError, CameraFrame, Detection, DetectorError, HandDetector};
use super::landmark::{LandmarkSample, FINGERTIPS, LANDMARK_COUNT, THUMB_TIP, WRIST};
use super::slot::SlotReader;
use crate::spatial::Point3D;

/// Fingertip reach for an open hand, in normalized image units
const OPEN_REACH: f32 = 0.32;
/// Fingertip reach for a fist
const FIST_REACH: f32 = 0.12;
/// Fan angles of the four fingers around straight up, index first
const FINGER_SPREAD: [f32; 4] = [-0.3, -0.1, 0.1, 0.3];

/// A simulated hand in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    /// Wrist position; x and y in [0, 1], y grows downward
    pub wrist: Point3D,
    pub open: bool,
    pub pinching: bool,
}

impl HandPose {
    pub fn new(wrist_x: f32, wrist_y: f32, open: bool, pinching: bool) -> Self {
        Self {
            wrist: Point3D::new(wrist_x, wrist_y, 0.0),
            open,
            pinching,
        }
    }
}

impl Default for HandPose {
    fn default() -> Self {
        Self::new(0.5, 0.7, false, false)
    }
}

/// Build a plausible 21-point hand for `pose`.
///
/// Fingertips fan out above the wrist at the open or fist reach. The thumb
/// tip sits next to the index tip when pinching and off to the side
/// otherwise. Intermediate joints are spaced along each finger.
pub fn synthesize_landmarks(pose: &HandPose) -> LandmarkSample {
    let wrist = pose.wrist;
    let reach = if pose.open { OPEN_REACH } else { FIST_REACH };
    let mut points = [wrist; LANDMARK_COUNT];

    for (finger, (&tip, &spread)) in FINGERTIPS.iter().zip(FINGER_SPREAD.iter()).enumerate() {
        let tip_point = Point3D::new(
            wrist.x + reach * spread.sin(),
            wrist.y - reach * spread.cos(),
            -0.02 * (finger as f32 + 1.0),
        );
        // Three joints between the wrist and each tip (e.g. 5, 6, 7 for the index)
        for (joint, fraction) in [0.4, 0.6, 0.8].into_iter().enumerate() {
            points[tip - 3 + joint] = wrist.lerp(&tip_point, fraction);
        }
        points[tip] = tip_point;
    }

    let index_tip = points[FINGERTIPS[0]];
    let thumb_tip = if pose.pinching {
        Point3D::new(index_tip.x + 0.01, index_tip.y + 0.01, index_tip.z)
    } else {
        Point3D::new(wrist.x + 0.12, wrist.y - 0.06, -0.01)
    };
    for (joint, fraction) in [0.25, 0.5, 0.75].into_iter().enumerate() {
        points[WRIST + 1 + joint] = wrist.lerp(&thumb_tip, fraction);
    }
    points[THUMB_TIP] = thumb_tip;

    LandmarkSample::new(points)
}

/// Keyboard-driven hand for the interactive terminal view.
///
/// - Left/Right: move the hand (mirrored like a front camera)
/// - Up/Down: raise/lower the hand
/// - `o`: toggle open/fist
/// - `p`: toggle pinch
/// - `h`: show/hide the hand
pub struct HandSimulator {
    pose: HandPose,
    visible: bool,
    /// Wrist movement per key press
    step: f32,
}

impl Default for HandSimulator {
    fn default() -> Self {
        Self {
            pose: HandPose::default(),
            visible: true,
            step: 0.05,
        }
    }
}

impl HandSimulator {
    /// Create a new hand simulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key press. Returns true when the key was consumed.
    pub fn process_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match key.code {
            // The camera image is mirrored: moving right lowers image x
            KeyCode::Right => {
                self.pose.wrist.x = (self.pose.wrist.x - self.step).max(0.0);
            }
            KeyCode::Left => {
                self.pose.wrist.x = (self.pose.wrist.x + self.step).min(1.0);
            }
            KeyCode::Up => {
                self.pose.wrist.y = (self.pose.wrist.y - self.step).max(0.0);
            }
            KeyCode::Down => {
                self.pose.wrist.y = (self.pose.wrist.y + self.step).min(1.0);
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.pose.open = !self.pose.open;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.pose.pinching = !self.pose.pinching;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.visible = !self.visible;
            }
            _ => return false,
        }
        true
    }

    /// Current pose, or `None` while the hand is hidden
    pub fn pose(&self) -> Option<HandPose> {
        self.visible.then_some(self.pose)
    }

    /// Reset simulator to default state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A camera producing empty frames at a fixed rate
pub struct SimulatedCamera {
    interval: Duration,
    next_due: Option<Instant>,
    index: u64,
    open: bool,
}

impl SimulatedCamera {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next_due: None,
            index: 0,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Camera for SimulatedCamera {
    fn open(&mut self) -> Result<(), CameraError> {
        self.open = true;
        self.next_due = Some(Instant::now());
        Ok(())
    }

    fn next_frame(&mut self) -> Option<CameraFrame> {
        if !self.open {
            return None;
        }

        let now = Instant::now();
        let due = self.next_due.unwrap_or(now);
        if due > now {
            thread::sleep(due - now);
        }
        // Skip ahead rather than burst if we fell behind
        self.next_due = Some(due.max(now) + self.interval);

        self.index += 1;
        Some(CameraFrame {
            index: self.index,
            captured_at: Instant::now(),
            width: 640,
            height: 480,
            pixels: Vec::new(),
        })
    }

    fn release(&mut self) {
        self.open = false;
        self.next_due = None;
    }
}

/// Detector that reports whatever pose the keyboard simulator last published
pub struct PoseDetector {
    poses: SlotReader<Option<HandPose>>,
}

impl PoseDetector {
    pub fn new(poses: SlotReader<Option<HandPose>>) -> Self {
        Self { poses }
    }
}

impl HandDetector for PoseDetector {
    fn initialize(&mut self) -> Result<(), DetectorError> {
        Ok(())
    }

    fn detect(&mut self, _frame: &CameraFrame) -> Detection {
        match self.poses.latest() {
            Some(pose) => Detection::single(synthesize_landmarks(&pose)),
            None => Detection::none(),
        }
    }
}

/// Detector that plays a fixed gesture script, for headless runs.
///
/// The script loops every [`ScriptedDetector::PERIOD`] seconds:
/// fist, open hand, a pinch sweeping right to left across the image, then
/// no hand.
pub struct ScriptedDetector {
    fps: f32,
}

impl ScriptedDetector {
    /// Script length in seconds
    pub const PERIOD: f32 = 12.0;

    /// `fps` is the camera rate, used to turn frame indices into time
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1) as f32,
        }
    }

    /// Pose at `t` seconds into the script
    pub fn pose_at(t: f32) -> Option<HandPose> {
        let t = t.rem_euclid(Self::PERIOD);
        match t {
            t if t < 3.0 => Some(HandPose::new(0.5, 0.7, false, false)),
            t if t < 6.0 => Some(HandPose::new(0.5, 0.6, true, false)),
            t if t < 10.0 => {
                let progress = (t - 6.0) / 4.0;
                Some(HandPose::new(0.9 - 0.8 * progress, 0.6, false, true))
            }
            _ => None,
        }
    }
}

impl HandDetector for ScriptedDetector {
    fn initialize(&mut self) -> Result<(), DetectorError> {
        Ok(())
    }

    fn detect(&mut self, frame: &CameraFrame) -> Detection {
        let t = frame.index.saturating_sub(1) as f32 / self.fps;
        match Self::pose_at(t) {
            Some(pose) => Detection::single(synthesize_landmarks(&pose)),
            None => Detection::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::classifier::GestureClassifier;
    use crossterm::event::KeyModifiers;

    fn classify(pose: &HandPose) -> crate::input::GestureSignal {
        GestureClassifier::default()
            .classify(Some(&synthesize_landmarks(pose)))
            .unwrap()
    }

    #[test]
    fn test_synthesized_hand_round_trips_through_classifier() {
        for open in [false, true] {
            for pinching in [false, true] {
                let pose = HandPose::new(0.3, 0.6, open, pinching);
                let signal = classify(&pose);
                assert_eq!(signal.is_open, open, "pose {:?}", pose);
                assert_eq!(signal.is_pinching, pinching, "pose {:?}", pose);
                assert_eq!(signal.wrist, pose.wrist);
            }
        }
    }

    #[test]
    fn test_keyboard_moves_mirrored() {
        let mut sim = HandSimulator::new();
        let start = sim.pose().unwrap().wrist.x;

        assert!(sim.process_key(KeyEvent::new(KeyCode::Right, KeyModifiers::empty())));
        assert!(sim.pose().unwrap().wrist.x < start);

        sim.process_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::empty()));
        assert!(sim.pose().unwrap().open);

        sim.process_key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::empty()));
        assert_eq!(sim.pose(), None);

        assert!(!sim.process_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::empty())));
    }

    #[test]
    fn test_wrist_stays_in_range() {
        let mut sim = HandSimulator::new();
        for _ in 0..100 {
            sim.process_key(KeyEvent::new(KeyCode::Left, KeyModifiers::empty()));
        }
        assert_eq!(sim.pose().unwrap().wrist.x, 1.0);
    }

    #[test]
    fn test_script_phases() {
        assert!(!ScriptedDetector::pose_at(1.0).unwrap().open);
        assert!(ScriptedDetector::pose_at(4.0).unwrap().open);

        let early = ScriptedDetector::pose_at(6.5).unwrap();
        let late = ScriptedDetector::pose_at(9.5).unwrap();
        assert!(early.pinching && late.pinching);
        assert!(early.wrist.x > late.wrist.x);

        assert_eq!(ScriptedDetector::pose_at(11.0), None);
        assert_eq!(ScriptedDetector::pose_at(13.0), ScriptedDetector::pose_at(1.0));
    }

    #[test]
    fn test_camera_release() {
        let mut camera = SimulatedCamera::new(1000);
        assert!(camera.next_frame().is_none());
        camera.open().unwrap();
        assert_eq!(camera.next_frame().unwrap().index, 1);
        camera.release();
        camera.release();
        assert!(!camera.is_open());
        assert!(camera.next_frame().is_none());
    }
}
