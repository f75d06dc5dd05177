use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use constants::scene::{WALKTHROUGH_AMBIENT_BRIGHTNESS, WALKTHROUGH_SUN_ILLUMINANCE};

use crate::engine::camera::look_controller::LookController;
use crate::engine::movement::integrator::PlayerMotion;
use crate::engine::scene::slot::SceneSlot;

/// The walkthrough camera doubles as the player body.
#[derive(Component, Debug)]
pub struct WalkthroughPlayer;

/// Entity holding the loaded model's `SceneRoot`.
#[derive(Component, Debug, Clone, Copy)]
pub struct WalkthroughModel {
    /// Whether model meshes join the ground probe's collidable set.
    pub collidable: bool,
}

/// Blocks the line of sight to points of interest.
#[derive(Component, Debug)]
pub struct Occluder;

/// Tested by the ground probe.
#[derive(Component, Debug)]
pub struct Collidable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelNodeKind {
    Mesh,
    Other,
}

impl ModelNodeKind {
    pub fn classify(has_mesh: bool) -> Self {
        if has_mesh { Self::Mesh } else { Self::Other }
    }
}

/// Turn a slot camera into the first person player.
pub fn make_walkthrough_player(commands: &mut Commands, camera: Entity) {
    commands.entity(camera).insert((
        WalkthroughPlayer,
        LookController::default(),
        PlayerMotion::default(),
    ));
}

pub fn spawn_walkthrough_lights(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: WALKTHROUGH_AMBIENT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: WALKTHROUGH_SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-1.0, 2.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        SceneSlot::Walkthrough.render_layers(),
    ));
}

/// Spawn the (still empty) model root; the scene itself is attached once loaded.
pub fn spawn_model_root(commands: &mut Commands, collidable: bool) -> Entity {
    commands
        .spawn((
            WalkthroughModel { collidable },
            Transform::default(),
            Visibility::default(),
            SceneSlot::Walkthrough.render_layers(),
        ))
        .id()
}

/// Tag every node of a freshly instanced model once, by kind.
pub fn tag_model_nodes(
    trigger: Trigger<SceneInstanceReady>,
    models: Query<&WalkthroughModel>,
    children: Query<&Children>,
    meshes: Query<(), With<Mesh3d>>,
    mut commands: Commands,
) {
    let root = trigger.target();
    let Ok(model) = models.get(root) else {
        return;
    };

    let mesh_nodes = tag_descendants(root, model, &children, &meshes, &mut commands);
    println!("✓ Walkthrough model ready ({} mesh nodes)", mesh_nodes);
}

/// Returns the number of mesh nodes tagged.
pub fn tag_descendants(
    root: Entity,
    model: &WalkthroughModel,
    children: &Query<&Children>,
    meshes: &Query<(), With<Mesh3d>>,
    commands: &mut Commands,
) -> usize {
    let layers = SceneSlot::Walkthrough.render_layers();
    let mut mesh_nodes = 0;
    for node in children.iter_descendants(root) {
        let mut entity = commands.entity(node);
        entity.insert(layers.clone());

        if ModelNodeKind::classify(meshes.contains(node)) == ModelNodeKind::Mesh {
            entity.insert(Occluder);
            if model.collidable {
                entity.insert(Collidable);
            }
            mesh_nodes += 1;
        }
    }
    mesh_nodes
}
