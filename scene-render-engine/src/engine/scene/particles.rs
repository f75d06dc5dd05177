use bevy::asset::RenderAssetUsages;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use constants::path::LOGO_TEXTURE_PATH;
use constants::scene::{PARTICLE_COUNT, PARTICLE_SPREAD, PARTICLE_TIME_SCALE, ParticleScene};
use constants::transition::NEUTRAL_POINT;

use crate::engine::loading::asset_watch::AssetLoadWatch;
use crate::engine::scene::slot::SceneSlot;

const LOGO_WIDTH: f32 = 2.5;
const LOGO_HEIGHT: f32 = 1.0;
const LOGO_OPACITY: f32 = 0.15;
const MAX_TILT: f32 = 6.0;

/// Seeded xorshift32 stream so every slot scatters the same way on each run.
pub struct ParticleRng(u32);

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    /// Uniform in `0..1`.
    pub fn next_unit(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Uniform in `-extent..extent`.
    pub fn next_signed(&mut self, extent: f32) -> f32 {
        (self.next_unit() * 2.0 - 1.0) * extent
    }
}

/// One rotating, hue-cycling layer of points.
#[derive(Component, Debug, Clone, Copy)]
pub struct ParticleField {
    /// Multiplier of the animation clock around Y. Layers past the fourth turn backwards.
    pub spin: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub tilt: Vec2,
}

impl ParticleField {
    pub fn rotation_at(&self, clock: f32) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.tilt.x, clock * self.spin, self.tilt.y)
    }

    pub fn colour_at(&self, clock: f32) -> Color {
        Color::hsl(particle_hue(self.hue, clock) * 360.0, self.saturation, self.lightness)
    }
}

/// Hue in `0..1` after `clock` turns of the colour wheel.
pub fn particle_hue(base: f32, clock: f32) -> f32 {
    (base + clock).rem_euclid(1.0)
}

pub fn layer_spin(layer_index: usize) -> f32 {
    let turns = (layer_index + 1) as f32;
    if layer_index < 4 { turns } else { -turns }
}

pub fn particle_mesh(rng: &mut ParticleRng) -> Mesh {
    let positions: Vec<[f32; 3]> = (0..PARTICLE_COUNT)
        .map(|_| {
            [
                rng.next_signed(PARTICLE_SPREAD),
                rng.next_signed(PARTICLE_SPREAD),
                rng.next_signed(PARTICLE_SPREAD),
            ]
        })
        .collect();

    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

/// Populate a particle slot's render layer.
pub fn spawn_particle_scene(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    slot: SceneSlot,
    scene: &ParticleScene,
) {
    let mut rng = ParticleRng::new(scene.seed);

    for (index, layer) in scene.layers.iter().enumerate() {
        let field = ParticleField {
            spin: layer_spin(index),
            hue: layer.hue,
            saturation: layer.saturation,
            lightness: layer.lightness,
            tilt: Vec2::new(rng.next_unit() * MAX_TILT, rng.next_unit() * MAX_TILT),
        };
        let material = materials.add(StandardMaterial {
            base_color: field.colour_at(0.0),
            unlit: true,
            ..default()
        });

        commands.spawn((
            Mesh3d(meshes.add(particle_mesh(&mut rng))),
            MeshMaterial3d(material),
            Transform::from_rotation(field.rotation_at(0.0)),
            slot.render_layers(),
            field,
        ));
    }
}

pub fn particle_fog(scene: &ParticleScene) -> Option<DistanceFog> {
    scene.fog.as_ref().map(|fog| DistanceFog {
        color: fog.colour,
        falloff: FogFalloff::ExponentialSquared {
            density: fog.density,
        },
        ..default()
    })
}

/// Landscape plane matching the logo texture's 5:2 proportions.
pub fn logo_plane() -> Rectangle {
    Rectangle::new(LOGO_WIDTH, LOGO_HEIGHT)
}

/// Translucent logo sitting on the neutral point the transition flies into.
pub fn spawn_logo(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    watch: &mut AssetLoadWatch,
) {
    let texture: Handle<Image> = asset_server.load(LOGO_TEXTURE_PATH);
    watch.watch(LOGO_TEXTURE_PATH, texture.clone().untyped());

    commands.spawn((
        Mesh3d(meshes.add(logo_plane())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(LOGO_OPACITY),
            base_color_texture: Some(texture),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::from_translation(NEUTRAL_POINT),
        SceneSlot::First.render_layers(),
    ));
}

/// Ambient hook of the particle slots; runs whether or not the slot is displayed.
pub fn animate_particle_fields(
    time: Res<Time>,
    mut fields: Query<(&ParticleField, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let clock = time.elapsed_secs() * PARTICLE_TIME_SCALE;

    for (field, mut transform, material) in &mut fields {
        transform.rotation = field.rotation_at(clock);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = field.colour_at(clock);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_stays_in_unit_range_and_is_repeatable() {
        let mut a = ParticleRng::new(7);
        let mut b = ParticleRng::new(7);
        for _ in 0..1000 {
            let value = a.next_unit();
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, b.next_unit());
        }
    }

    #[test]
    fn zero_seed_does_not_stall() {
        let mut rng = ParticleRng::new(0);
        let first = rng.next_unit();
        let second = rng.next_unit();
        assert_ne!(first, second);
    }

    #[test]
    fn particles_fill_the_spread_cube() {
        let mesh = particle_mesh(&mut ParticleRng::new(42));
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attribute| attribute.as_float3())
            .expect("positions are float3");

        assert_eq!(positions.len(), PARTICLE_COUNT);
        assert!(
            positions
                .iter()
                .flatten()
                .all(|component| component.abs() <= PARTICLE_SPREAD)
        );
    }

    #[test]
    fn hue_wraps_around_the_wheel() {
        assert!((particle_hue(0.9, 0.0) - 0.9).abs() < 1e-6);
        assert!((particle_hue(0.9, 0.3) - 0.2).abs() < 1e-5);
        assert!((particle_hue(0.5, 2.0) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn outer_layers_spin_backwards() {
        let spins: Vec<f32> = (0..5).map(layer_spin).collect();
        assert_eq!(spins, vec![1.0, 2.0, 3.0, 4.0, -5.0]);
    }

    #[test]
    fn only_foggy_scenes_get_fog() {
        let [first, second, _] = &constants::scene::PARTICLE_SCENES;
        let fog = particle_fog(first).expect("first scene is foggy");
        assert_eq!(fog.color, Color::WHITE);
        assert!(matches!(
            fog.falloff,
            FogFalloff::ExponentialSquared { density } if (density - 0.01).abs() < 1e-6
        ));
        assert!(particle_fog(second).is_none());
    }

    #[test]
    fn logo_keeps_its_landscape_proportions() {
        let plane = logo_plane();
        assert_eq!(plane.size(), Vec2::new(2.5, 1.0));
    }
}
