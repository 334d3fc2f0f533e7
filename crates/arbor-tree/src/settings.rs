//! Runtime settings assembled from configuration and command-line overrides

use arbor_config::ArborConfig;
use arbor_scene::{GestureClassifier, Point3D, Smoother};

use crate::controller::FormationPolicy;
use crate::formation::FormationParams;
use crate::photos::{ImageSource, PhotoParams};

/// Everything a session needs, already validated
#[derive(Debug, Clone)]
pub struct Settings {
    pub formation: FormationParams,
    pub seed: Option<u64>,
    pub policy: FormationPolicy,
    pub classifier: GestureClassifier,
    pub particle_smoother: Smoother,
    pub photos: PhotoParams,
    pub image_smoother: Smoother,
    pub images: Vec<ImageSource>,
    pub fps: u32,
    pub detection_fps: u32,
    pub viewer: Point3D,
}

impl From<&ArborConfig> for Settings {
    fn from(config: &ArborConfig) -> Self {
        let viewer = Point3D::from_array(config.display.camera_position);
        Self {
            formation: FormationParams::from(&config.scene),
            seed: config.scene.seed,
            policy: FormationPolicy::from(&config.controller),
            classifier: GestureClassifier::new(
                config.gesture.open_threshold,
                config.gesture.pinch_threshold,
            ),
            particle_smoother: Smoother::new(config.motion.particle_rate),
            photos: PhotoParams::from(&config.photos).with_viewer(viewer),
            image_smoother: Smoother::new(config.motion.image_rate),
            images: Vec::new(),
            fps: config.display.fps,
            detection_fps: config.display.detection_fps,
            viewer,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&ArborConfig::default())
    }
}

impl Settings {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_particles(mut self, count: usize) -> Self {
        self.formation.count = count.max(1);
        self
    }

    pub fn with_policy(mut self, policy: FormationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_images(mut self, images: Vec<ImageSource>) -> Self {
        self.images = images;
        self
    }
}
