//! Rendering backend abstraction for the scene
//!
//! - [`terminal::TerminalBackend`]: crossterm, depth buffered, diff rendering
//! - [`RecordingBackend`]: captures frames in memory for headless runs and tests

mod backend;
mod recording;
mod surface;
pub mod terminal;

pub use backend::{RenderBackend, RenderError, RenderGlyph, TextureHandle};
pub use recording::{RecordedFrame, RecordingBackend};
pub use surface::{Color, SurfaceCapabilities};
