//! Configuration schema and defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArborConfig {
    pub scene: SceneConfig,
    pub gesture: GestureConfig,
    pub controller: ControllerConfig,
    pub motion: MotionConfig,
    pub photos: PhotoConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

impl ArborConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ArborConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.scene.particle_count == 0 {
            return Err(invalid("scene.particle_count", "must be at least 1"));
        }
        positive("scene.tree_height", self.scene.tree_height)?;
        positive("scene.base_radius", self.scene.base_radius)?;
        if self.scene.shell_inner < 0.0 || self.scene.shell_inner >= self.scene.shell_outer {
            return Err(invalid(
                "scene.shell_inner",
                format!(
                    "expected 0 <= inner < outer, got {} and {}",
                    self.scene.shell_inner, self.scene.shell_outer
                ),
            ));
        }

        positive("gesture.open_threshold", self.gesture.open_threshold)?;
        positive("gesture.pinch_threshold", self.gesture.pinch_threshold)?;

        if self.controller.mode == FormationMode::Debounce && self.controller.dwell_frames == 0 {
            return Err(invalid(
                "controller.dwell_frames",
                "debounce mode needs at least 1 frame",
            ));
        }

        positive("motion.particle_rate", self.motion.particle_rate)?;
        positive("motion.image_rate", self.motion.image_rate)?;

        positive("photos.ring_radius", self.photos.ring_radius)?;
        positive("photos.active_scale", self.photos.active_scale)?;
        positive("photos.idle_scale", self.photos.idle_scale)?;

        if self.display.fps == 0 {
            return Err(invalid("display.fps", "must be at least 1"));
        }
        if self.display.detection_fps == 0 {
            return Err(invalid("display.detection_fps", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {}", value)))
    }
}

/// Particle cloud generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of decorative entities, fixed for the session
    pub particle_count: usize,
    /// Seed for the entity table; unset means a fresh seed per session
    pub seed: Option<u64>,
    /// Total tree height, centered on the origin
    pub tree_height: f32,
    /// Radius at the base of the cone spiral
    pub base_radius: f32,
    /// Inner radius of the exploded shell
    pub shell_inner: f32,
    /// Outer radius of the exploded shell
    pub shell_outer: f32,
    /// Angular rate of the exploded swirl (rad/s)
    pub swirl_rate: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: 400,
            seed: None,
            tree_height: 12.0,
            base_radius: 5.0,
            shell_inner: 9.0,
            shell_outer: 15.0,
            swirl_rate: 0.15,
        }
    }
}

/// Gesture classification thresholds, in normalized image units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Mean wrist-to-fingertip distance above which the hand counts as open
    pub open_threshold: f32,
    /// Thumb-to-index distance below which the hand counts as pinching
    pub pinch_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            open_threshold: 0.25,
            pinch_threshold: 0.05,
        }
    }
}

/// How formation changes respond to the gesture signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationMode {
    /// Follow the signal every frame
    Immediate,
    /// Wait for `dwell_frames` consistent frames before toggling
    #[default]
    Debounce,
}

/// Scene-state controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub mode: FormationMode,
    pub dwell_frames: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mode: FormationMode::Debounce,
            dwell_frames: 3,
        }
    }
}

/// Exponential smoothing rates (per second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub particle_rate: f32,
    pub image_rate: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            particle_rate: 4.0,
            image_rate: 5.0,
        }
    }
}

/// Image ring layout and presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// Radius of the ring of idle images
    pub ring_radius: f32,
    /// Vertical offset of the alternating bands
    pub band_height: f32,
    /// Where a grabbed image is presented
    pub presentation_point: [f32; 3],
    pub active_scale: f32,
    pub idle_scale: f32,
    /// Amplitude of the idle vertical bob
    pub bob_amplitude: f32,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            ring_radius: 7.0,
            band_height: 2.5,
            presentation_point: [0.0, 0.0, -14.0],
            active_scale: 3.0,
            idle_scale: 1.0,
            bob_amplitude: 0.25,
        }
    }
}

/// Frame pacing and viewer placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Render loop rate
    pub fps: u32,
    /// Simulated camera rate feeding the detection loop
    pub detection_fps: u32,
    /// Viewer position; the view looks toward the origin along +Z
    pub camera_position: [f32; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            detection_fps: 30,
            camera_position: [0.0, 0.0, -24.0],
        }
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Log file used while the terminal view is active
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
