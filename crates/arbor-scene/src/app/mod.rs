//! Frame-driven application framework

mod framework;

pub use framework::{SceneApp, SceneAppRunner, DEFAULT_FPS};
