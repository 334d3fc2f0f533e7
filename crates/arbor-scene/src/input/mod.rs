//! Hand input: landmarks in, gesture signals out
//!
//! - [`LandmarkSample`]: 21 normalized hand points from a detector
//! - [`GestureClassifier`]: stateless open/pinch classification
//! - [`DetectionLoop`]: background camera → detector → classifier loop
//! - [`latest_slot`]: single-value handoff to the render loop
//! - [`simulator`]: keyboard and scripted stand-ins for real hardware

mod classifier;
mod detection;
mod gesture;
mod landmark;
mod slot;
pub mod simulator;

pub use classifier::{GestureClassifier, DEFAULT_OPEN_THRESHOLD, DEFAULT_PINCH_THRESHOLD};
pub use detection::{
    Camera, CameraError, CameraFrame, CameraGuard, Detection, DetectionError, DetectionHandle,
    DetectionLoop, DetectorError, HandDetector,
};
pub use gesture::{GestureSignal, Posture};
pub use landmark::{
    LandmarkCountError, LandmarkSample, FINGERTIPS, INDEX_TIP, LANDMARK_COUNT, MIDDLE_TIP,
    PINKY_TIP, RING_TIP, THUMB_TIP, WRIST,
};
pub use simulator::{
    synthesize_landmarks, HandPose, HandSimulator, PoseDetector, ScriptedDetector,
    SimulatedCamera,
};
pub use slot::{latest_slot, signal_slot, SignalPublisher, SignalReader, SlotReader, SlotWriter};
