//! Selectable images and their transitions
//!
//! Idle images hang on a ring around the tree and bob gently. The selected
//! image flies to the presentation point in front of the viewer, faces it,
//! and plays its transition style for as long as it stays selected.

use std::f32::consts::TAU;
use std::fmt;
use std::path::Path;

use arbor_config::{DisplayConfig, PhotoConfig};
use arbor_scene::renderer::TextureHandle;
use arbor_scene::{Point3D, Quaternion, SmoothedTransform, Smoother, Transform, Vector3D};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Mixed into the id before seeding per-image bob parameters
const BOB_SEED_SALT: u64 = 0x6172_626f_725f_626f;

/// Identifier of an ingested image. Ids are assigned in upload order
/// starting at 0 and images are never removed, so an id is also the
/// image's position in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u32);

impl ImageId {
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// Where an image came from: a path or URL as given by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource(String);

impl ImageSource {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn location(&self) -> &str {
        &self.0
    }

    /// File stem for display, falling back to the full location
    pub fn name(&self) -> &str {
        Path::new(&self.0)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(&self.0)
    }
}

impl From<&str> for ImageSource {
    fn from(location: &str) -> Self {
        Self::new(location)
    }
}

impl From<String> for ImageSource {
    fn from(location: String) -> Self {
        Self(location)
    }
}

/// Periodic motion layered on a presented image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStyle {
    /// Roll `0.12 sin(3t)`
    Wobble,
    /// Horizontal `0.6 sin(2t)`
    Slide,
    /// Scale `1 + 0.08 sin(4t)`
    Pulse,
    /// Vertical `0.35 sin(2t)`
    Float,
}

/// Offsets a style contributes at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleOffset {
    pub position: Vector3D,
    /// Roll about the viewing axis, radians
    pub roll: f32,
    /// Multiplier on the active scale
    pub scale: f32,
}

impl TransitionStyle {
    pub const ALL: [TransitionStyle; 4] = [
        TransitionStyle::Wobble,
        TransitionStyle::Slide,
        TransitionStyle::Pulse,
        TransitionStyle::Float,
    ];

    /// Cyclic assignment by upload position
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Offset at `t` seconds. Bounded and periodic.
    pub fn offset(&self, t: f32) -> StyleOffset {
        let mut offset = StyleOffset {
            position: Vector3D::ZERO,
            roll: 0.0,
            scale: 1.0,
        };
        match self {
            TransitionStyle::Wobble => offset.roll = 0.12 * (3.0 * t).sin(),
            TransitionStyle::Slide => offset.position.x = 0.6 * (2.0 * t).sin(),
            TransitionStyle::Pulse => offset.scale = 1.0 + 0.08 * (4.0 * t).sin(),
            TransitionStyle::Float => offset.position.y = 0.35 * (2.0 * t).sin(),
        }
        offset
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransitionStyle::Wobble => "wobble",
            TransitionStyle::Slide => "slide",
            TransitionStyle::Pulse => "pulse",
            TransitionStyle::Float => "float",
        }
    }
}

/// Layout and presentation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoParams {
    pub ring_radius: f32,
    pub band_height: f32,
    pub presentation_point: Point3D,
    pub active_scale: f32,
    pub idle_scale: f32,
    pub bob_amplitude: f32,
    /// Where the viewer stands; presented images face this point
    pub viewer: Point3D,
}

impl From<&PhotoConfig> for PhotoParams {
    fn from(config: &PhotoConfig) -> Self {
        Self {
            ring_radius: config.ring_radius,
            band_height: config.band_height,
            presentation_point: Point3D::from_array(config.presentation_point),
            active_scale: config.active_scale,
            idle_scale: config.idle_scale,
            bob_amplitude: config.bob_amplitude,
            viewer: Point3D::from_array(DisplayConfig::default().camera_position),
        }
    }
}

impl PhotoParams {
    pub fn with_viewer(mut self, viewer: Point3D) -> Self {
        self.viewer = viewer;
        self
    }
}

impl Default for PhotoParams {
    fn default() -> Self {
        Self::from(&PhotoConfig::default())
    }
}

/// Idle vertical bob: `amplitude * sin(frequency * t + phase)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bob {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl Bob {
    /// Frequency and phase derived from the id alone
    fn for_image(id: ImageId, amplitude: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(id.0 as u64 ^ BOB_SEED_SALT);
        Self {
            amplitude,
            frequency: rng.gen_range(0.8..1.6),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    pub fn height(&self, t: f32) -> f32 {
        self.amplitude * (self.frequency * t + self.phase).sin()
    }
}

/// One selectable image
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub id: ImageId,
    pub source: ImageSource,
    /// Filled in by the renderer once the image is loaded
    pub texture: Option<TextureHandle>,
    pub style: TransitionStyle,
    /// Ring position and facing, fixed at creation
    pub slot: Transform,
    pub bob: Bob,
    smoothed: SmoothedTransform,
    selected: bool,
}

impl ImageEntry {
    /// Displayed transform
    pub fn transform(&self) -> &Transform {
        self.smoothed.current()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Owns every image and drives their transforms each frame
#[derive(Debug, Clone)]
pub struct PhotoTransitionEngine {
    params: PhotoParams,
    smoother: Smoother,
    entries: Vec<ImageEntry>,
}

impl PhotoTransitionEngine {
    pub fn new(params: PhotoParams, smoother: Smoother) -> Self {
        Self {
            params,
            smoother,
            entries: Vec::new(),
        }
    }

    pub fn params(&self) -> &PhotoParams {
        &self.params
    }

    /// Append a batch of images, returning their ids in order.
    ///
    /// Slots are laid out against the collection size after this batch.
    /// Images added earlier keep the slots they were given.
    pub fn ingest(&mut self, sources: Vec<ImageSource>) -> Vec<ImageId> {
        let count = self.entries.len() + sources.len();
        let mut ids = Vec::with_capacity(sources.len());

        for source in sources {
            let index = self.entries.len();
            let id = ImageId::from_index(index);
            let slot = self.slot_transform(index, count);
            let initial = slot.with_uniform_scale(self.params.idle_scale);

            debug!(%id, source = source.location(), "Image added");
            self.entries.push(ImageEntry {
                id,
                source,
                texture: None,
                style: TransitionStyle::for_index(index),
                slot,
                bob: Bob::for_image(id, self.params.bob_amplitude),
                smoothed: SmoothedTransform::new(initial),
                selected: false,
            });
            ids.push(id);
        }

        info!(added = ids.len(), total = self.entries.len(), "Ingested images");
        ids
    }

    /// Ring slot for `index` of `count`: even indices on the upper band,
    /// odd on the lower, facing outward from the ring's axis
    fn slot_transform(&self, index: usize, count: usize) -> Transform {
        let angle = index as f32 / count.max(1) as f32 * TAU;
        let y = if index % 2 == 0 {
            self.params.band_height
        } else {
            -self.params.band_height
        };
        let outward = Vector3D::new(angle.cos(), 0.0, angle.sin());
        Transform::from_position(Point3D::new(
            self.params.ring_radius * outward.x,
            y,
            self.params.ring_radius * outward.z,
        ))
        .with_rotation(Quaternion::look_rotation(outward))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageEntry> {
        self.entries.get(id.index())
    }

    /// Attach a loaded texture. Returns false for an unknown id.
    pub fn set_texture(&mut self, id: ImageId, texture: TextureHandle) -> bool {
        match self.entries.get_mut(id.index()) {
            Some(entry) => {
                entry.texture = Some(texture);
                true
            }
            None => false,
        }
    }

    /// Target for `entry` at `elapsed` seconds
    pub fn target_for(&self, entry: &ImageEntry, selected: bool, elapsed: f32) -> Transform {
        if selected {
            let offset = entry.style.offset(elapsed);
            let position = self.params.presentation_point + offset.position;
            let facing = Quaternion::look_rotation(self.params.viewer - position);
            let roll = Quaternion::from_axis_angle(Vector3D::FORWARD, offset.roll);
            Transform::from_position(position)
                .with_rotation(facing * roll)
                .with_uniform_scale(self.params.active_scale * offset.scale)
        } else {
            let bob = Vector3D::new(0.0, entry.bob.height(elapsed), 0.0);
            Transform::from_position(entry.slot.position + bob)
                .with_rotation(entry.slot.rotation)
                .with_uniform_scale(self.params.idle_scale)
        }
    }

    /// Move every image one frame toward its target.
    ///
    /// A selected image's orientation snaps to face the viewer; everything
    /// else goes through the smoother.
    pub fn update(&mut self, selection: Option<ImageId>, elapsed: f32, dt: f32) {
        for index in 0..self.entries.len() {
            let selected = selection.is_some_and(|id| id.index() == index);
            let target = self.target_for(&self.entries[index], selected, elapsed);

            let entry = &mut self.entries[index];
            if selected != entry.selected {
                debug!(id = %entry.id, selected, "Selection changed");
                entry.selected = selected;
            }
            if selected {
                entry.smoothed.approach_with_rotation(&self.smoother, &target, dt);
            } else {
                entry.smoothed.approach(&self.smoother, &target, dt);
            }
        }
    }

    /// Currently selected entry, if any
    pub fn selected(&self) -> Option<&ImageEntry> {
        self.entries.iter().find(|entry| entry.selected)
    }
}
