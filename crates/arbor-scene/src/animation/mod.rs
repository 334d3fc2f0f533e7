//! Motion smoothing for displayed transforms

mod smoothing;

pub use smoothing::{SmoothedTransform, Smoother, IMAGE_RATE, PARTICLE_RATE};
