//! Procedural particle formations
//!
//! The table is generated once per session. Every entity carries a fixed
//! tree target and a fixed exploded offset; the exploded target moves only
//! because the whole shell swirls about +Y over time.

use std::f32::consts::TAU;
use std::fmt;
use std::ops::Index;

use arbor_config::SceneConfig;
use arbor_scene::{Color, Point3D, Quaternion, Transform, Vector3D};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::controller::FormationState;

/// Spiral turns from base to tip, i.e. `angle = t * 20π`
pub const TREE_TURNS: f32 = 10.0;

/// Half-size of the box entities spawn in
const SPAWN_EXTENT: f32 = 20.0;

/// Symbols used by glyph entities
pub const GLYPH_SYMBOLS: [char; 5] = ['*', '+', 'o', '@', '$'];

/// Geometry of both formations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationParams {
    pub count: usize,
    /// Total tree height, centered on the origin
    pub tree_height: f32,
    /// Spiral radius at the base
    pub base_radius: f32,
    pub shell_inner: f32,
    pub shell_outer: f32,
    /// Exploded swirl, radians per second
    pub swirl_rate: f32,
}

impl From<&SceneConfig> for FormationParams {
    fn from(config: &SceneConfig) -> Self {
        Self {
            count: config.particle_count,
            tree_height: config.tree_height,
            base_radius: config.base_radius,
            shell_inner: config.shell_inner,
            shell_outer: config.shell_outer,
            swirl_rate: config.swirl_rate,
        }
    }
}

impl Default for FormationParams {
    fn default() -> Self {
        Self::from(&SceneConfig::default())
    }
}

/// Point on the cone spiral at parameter `t` in [0, 1].
///
/// `t = 0` is the base (full radius, bottom), `t = 1` the tip.
pub fn tree_position(t: f32, params: &FormationParams) -> Point3D {
    let angle = t * TAU * TREE_TURNS;
    let height = -params.tree_height / 2.0 + t * params.tree_height;
    let radius = params.base_radius * (1.0 - t);
    Point3D::new(radius * angle.cos(), height, radius * angle.sin())
}

/// Index of an entity in its [`FormationTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{}", self.0)
    }
}

/// What an entity looks like. The renderer switches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Sphere,
    Cube,
    Cone,
    Glyph { symbol: char },
}

impl VisualKind {
    /// Kind for a roll in [0, 1): 45% sphere, 25% cube, 20% cone, 10% glyph
    pub fn from_roll(roll: f32, symbol: char) -> Self {
        if roll < 0.45 {
            VisualKind::Sphere
        } else if roll < 0.70 {
            VisualKind::Cube
        } else if roll < 0.90 {
            VisualKind::Cone
        } else {
            VisualKind::Glyph { symbol }
        }
    }

    /// Terminal symbol
    pub fn symbol(&self) -> char {
        match self {
            VisualKind::Sphere => 'o',
            VisualKind::Cube => '#',
            VisualKind::Cone => '^',
            VisualKind::Glyph { symbol } => *symbol,
        }
    }

    /// Candidate colors; each entity picks one at generation time
    fn palette(&self) -> &'static [Color] {
        match self {
            VisualKind::Sphere => &[Color::ORNAMENT_RED, Color::GOLD, Color::SNOW],
            VisualKind::Cube => &[Color::NEEDLE, Color::NEEDLE_DARK],
            VisualKind::Cone => &[Color::NEEDLE_DARK],
            VisualKind::Glyph { .. } => &[Color::GOLD],
        }
    }
}

/// One decorative entity. Immutable after generation.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityConfig {
    pub id: EntityId,
    pub kind: VisualKind,
    pub color: Color,
    pub spawn: Point3D,
    pub tree_target: Point3D,
    /// Offset on the spherical shell before swirl
    pub exploded_offset: Point3D,
    pub scale: f32,
    /// Spin rate per axis, radians per second
    pub spin: Vector3D,
}

impl EntityConfig {
    /// Exploded target after `elapsed` seconds of swirl
    pub fn exploded_target(&self, elapsed: f32, swirl_rate: f32) -> Point3D {
        self.exploded_offset.rotate_about_y(elapsed * swirl_rate)
    }

    /// Transform the entity starts from
    pub fn spawn_transform(&self) -> Transform {
        Transform::from_position(self.spawn).with_uniform_scale(self.scale)
    }
}

/// Generated entities for one session, indexed by [`EntityId`]
#[derive(Debug, Clone)]
pub struct FormationTable {
    params: FormationParams,
    seed: u64,
    entities: Vec<EntityConfig>,
}

impl FormationTable {
    /// Generate `params.count` entities.
    ///
    /// With `seed: None` a seed is drawn from OS entropy and logged, so any
    /// session can be replayed.
    pub fn generate(params: &FormationParams, seed: Option<u64>) -> Self {
        let seed = match seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!(seed, "No formation seed configured, drew one from entropy");
                seed
            }
        };

        let mut rng = StdRng::seed_from_u64(seed);
        let count = params.count;
        let entities = (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                generate_entity(&mut rng, EntityId(i), t, params)
            })
            .collect();

        info!(count, seed, "Generated formation table");

        Self {
            params: *params,
            seed,
            entities,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &FormationParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityConfig> {
        self.entities.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityConfig> {
        self.entities.iter()
    }

    /// Where `entity` should be this frame.
    ///
    /// Rotation follows the entity's spin in both formations.
    pub fn target_transform(
        &self,
        entity: &EntityConfig,
        formation: FormationState,
        elapsed: f32,
    ) -> Transform {
        let position = match formation {
            FormationState::Tree => entity.tree_target,
            FormationState::Exploded => entity.exploded_target(elapsed, self.params.swirl_rate),
        };
        Transform::from_position(position)
            .with_rotation(Quaternion::from_spin(entity.spin * elapsed))
            .with_uniform_scale(entity.scale)
    }
}

impl Index<EntityId> for FormationTable {
    type Output = EntityConfig;

    fn index(&self, id: EntityId) -> &EntityConfig {
        &self.entities[id.0]
    }
}

fn generate_entity(
    rng: &mut StdRng,
    id: EntityId,
    t: f32,
    params: &FormationParams,
) -> EntityConfig {
    let symbol = GLYPH_SYMBOLS[rng.gen_range(0..GLYPH_SYMBOLS.len())];
    let kind = VisualKind::from_roll(rng.gen::<f32>(), symbol);
    let palette = kind.palette();
    let color = palette[rng.gen_range(0..palette.len())];

    let spawn = Point3D::new(
        rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
        rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
        rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
    );

    // Uniform on the sphere: theta uniform, phi by inverse transform
    let theta = rng.gen_range(0.0..TAU);
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let radius = if params.shell_outer > params.shell_inner {
        rng.gen_range(params.shell_inner..params.shell_outer)
    } else {
        params.shell_inner
    };
    let exploded_offset = Point3D::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    );

    let scale = rng.gen_range(0.6..1.2);
    let spin = Vector3D::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );

    EntityConfig {
        id,
        kind,
        color,
        spawn,
        tree_target: tree_position(t, params),
        exploded_offset,
        scale,
        spin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Horizontal distance from the Y axis
    fn radius_xz(p: &Point3D) -> f32 {
        (p.x * p.x + p.z * p.z).sqrt()
    }

    fn params(count: usize) -> FormationParams {
        FormationParams {
            count,
            ..FormationParams::default()
        }
    }

    #[test]
    fn test_tree_endpoints() {
        let p = params(300);

        let base = tree_position(0.0, &p);
        assert!((radius_xz(&base) - p.base_radius).abs() < 1e-5);
        assert!((base.y + p.tree_height / 2.0).abs() < 1e-5);

        let tip = tree_position(1.0, &p);
        assert!(radius_xz(&tip) < 1e-5);
        assert!((tip.y - p.tree_height / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_generated_table_spans_the_tree() {
        let p = params(300);
        let table = FormationTable::generate(&p, Some(7));
        assert_eq!(table.len(), 300);

        let first = &table[EntityId(0)];
        assert!((radius_xz(&first.tree_target) - p.base_radius).abs() < 1e-5);
        assert!((first.tree_target.y + p.tree_height / 2.0).abs() < 1e-5);

        // The last entity sits one step short of the tip
        let last = &table[EntityId(299)];
        assert!(radius_xz(&last.tree_target) < p.base_radius / 250.0);
        assert!(last.tree_target.y < p.tree_height / 2.0);
        assert!(last.tree_target.y > p.tree_height / 2.0 - p.tree_height / 250.0);
    }

    #[test]
    fn test_radius_shrinks_and_height_grows() {
        let p = params(100);
        let table = FormationTable::generate(&p, Some(1));
        let targets: Vec<_> = table.iter().map(|e| e.tree_target).collect();
        for pair in targets.windows(2) {
            assert!(radius_xz(&pair[1]) < radius_xz(&pair[0]));
            assert!(pair[1].y > pair[0].y);
        }
    }

    #[test]
    fn test_exploded_offsets_in_shell() {
        let p = params(500);
        let table = FormationTable::generate(&p, Some(42));
        for entity in table.iter() {
            let r = entity.exploded_offset.to_vector().magnitude();
            assert!(r >= p.shell_inner - 1e-3 && r < p.shell_outer + 1e-3, "r = {}", r);
            assert!((0.6..1.2).contains(&entity.scale));
            for c in [entity.spin.x, entity.spin.y, entity.spin.z] {
                assert!((-1.0..1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_swirl_preserves_radius_and_height() {
        let table = FormationTable::generate(&params(20), Some(3));
        for entity in table.iter() {
            let later = entity.exploded_target(12.5, 0.15);
            assert!((later.radial_distance() - entity.exploded_offset.radial_distance()).abs() < 1e-3);
            assert!((later.y - entity.exploded_offset.y).abs() < 1e-5);
        }
        let entity = &table[EntityId(0)];
        assert_eq!(entity.exploded_target(0.0, 0.15), entity.exploded_offset);
    }

    #[test]
    fn test_same_seed_same_table() {
        let p = params(64);
        let a = FormationTable::generate(&p, Some(99));
        let b = FormationTable::generate(&p, Some(99));
        let c = FormationTable::generate(&p, Some(100));
        assert!(a.iter().eq(b.iter()));
        assert!(!a.iter().eq(c.iter()));
    }

    #[test]
    fn test_unseeded_table_records_seed() {
        let p = params(16);
        let a = FormationTable::generate(&p, None);
        let replay = FormationTable::generate(&p, Some(a.seed()));
        assert!(a.iter().eq(replay.iter()));
    }

    #[test]
    fn test_kind_bands() {
        assert_eq!(VisualKind::from_roll(0.0, '*'), VisualKind::Sphere);
        assert_eq!(VisualKind::from_roll(0.45, '*'), VisualKind::Cube);
        assert_eq!(VisualKind::from_roll(0.70, '*'), VisualKind::Cone);
        assert_eq!(VisualKind::from_roll(0.95, '+'), VisualKind::Glyph { symbol: '+' });
        assert_eq!(VisualKind::Glyph { symbol: '+' }.symbol(), '+');
    }

    #[test]
    fn test_mixture_is_varied() {
        let table = FormationTable::generate(&params(400), Some(5));
        let spheres = table.iter().filter(|e| e.kind == VisualKind::Sphere).count();
        let glyphs = table
            .iter()
            .filter(|e| matches!(e.kind, VisualKind::Glyph { .. }))
            .count();
        assert!(spheres > 100 && spheres < 260);
        assert!(glyphs > 10 && glyphs < 90);
    }

    #[test]
    fn test_target_follows_formation() {
        let table = FormationTable::generate(&params(10), Some(11));
        let entity = &table[EntityId(4)];

        let tree = table.target_transform(entity, FormationState::Tree, 3.0);
        assert_eq!(tree.position, entity.tree_target);

        let exploded = table.target_transform(entity, FormationState::Exploded, 3.0);
        assert_eq!(exploded.position, entity.exploded_target(3.0, table.params().swirl_rate));
        assert_eq!(exploded.scale, Vector3D::splat(entity.scale));
    }
}
