//! Scene slots and their contents.
//!
//! Every slot lives on its own render layer and is drawn into its own
//! offscreen image each frame, whether or not it is the displayed one.

/// Rotating hue-cycling point fields shown in slots one to three.
pub mod particles;

/// Slot identifiers, render layers and slot camera spawning.
pub mod slot;

/// The walkthrough slot: player camera, lights and model tagging.
pub mod walkthrough;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::scene::{PARTICLE_SCENES, WALKTHROUGH_BACKGROUND};

use crate::engine::loading::asset_watch::AssetLoadWatch;
use crate::engine::render::render_targets::{
    SlotRenderTargets, create_render_target, render_target_extent, viewport_aspect_ratio,
};
use particles::{particle_fog, spawn_logo, spawn_particle_scene};
use slot::{SceneSlot, spawn_slot_camera};
use walkthrough::{make_walkthrough_player, spawn_walkthrough_lights};

const FALLBACK_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Create the four render targets, their cameras and the static contents of every slot.
pub fn setup_scene_slots(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut watch: ResMut<AssetLoadWatch>,
) {
    let (logical_size, scale_factor) = windows
        .single()
        .map(|window| (window.size(), window.scale_factor()))
        .unwrap_or((FALLBACK_VIEWPORT, 1.0));
    let extent = render_target_extent(logical_size, scale_factor);
    let aspect_ratio = viewport_aspect_ratio(logical_size);

    let handles = SceneSlot::ALL.map(|_| images.add(create_render_target(extent)));

    for (slot, scene) in SceneSlot::ALL.into_iter().zip(PARTICLE_SCENES.iter()) {
        let camera = spawn_slot_camera(
            &mut commands,
            slot,
            handles[slot.index()].clone(),
            scene.background,
            aspect_ratio,
        );
        if let Some(fog) = particle_fog(scene) {
            commands.entity(camera).insert(fog);
        }
        spawn_particle_scene(&mut commands, &mut meshes, &mut materials, slot, scene);
    }
    spawn_logo(
        &mut commands,
        &mut meshes,
        &mut materials,
        &asset_server,
        &mut watch,
    );

    let walkthrough_camera = spawn_slot_camera(
        &mut commands,
        SceneSlot::Walkthrough,
        handles[SceneSlot::Walkthrough.index()].clone(),
        WALKTHROUGH_BACKGROUND,
        aspect_ratio,
    );
    make_walkthrough_player(&mut commands, walkthrough_camera);
    spawn_walkthrough_lights(&mut commands);

    commands.insert_resource(SlotRenderTargets::new(handles));
    println!(
        "✓ {} scene slots ready ({}x{})",
        SceneSlot::ALL.len(),
        extent.width,
        extent.height
    );
}
