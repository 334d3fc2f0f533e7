//! arbor-scene: hand-gesture input and scene rendering primitives
//!
//! - 3D math: points, vectors, quaternions, transforms
//! - Frame-rate independent smoothing toward per-frame targets
//! - Hand landmarks, gesture classification and a background detection loop
//! - Render backends (terminal and in-memory) and a fixed-rate frame runner

pub mod animation;
pub mod app;
pub mod input;
pub mod renderer;
pub mod spatial;

// Re-export commonly used types
pub use animation::{SmoothedTransform, Smoother};
pub use app::{SceneApp, SceneAppRunner};
pub use input::{
    DetectionHandle, DetectionLoop, GestureClassifier, GestureSignal, LandmarkSample,
    SignalReader,
};
pub use renderer::{
    Color, RecordingBackend, RenderBackend, RenderError, RenderGlyph, TextureHandle,
};
pub use spatial::{Point3D, Quaternion, Transform, Vector3D};
