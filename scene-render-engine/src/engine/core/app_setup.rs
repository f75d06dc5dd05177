use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::ecs::schedule::ScheduleConfigs;
use bevy::ecs::system::ScheduleSystem;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::experience_manifest::ExperienceManifest;
use crate::engine::camera::look_controller::{
    mouse_look_system, pointer_lock_system, request_pointer_lock_from_input,
};
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::asset_watch::{AssetLoadWatch, report_failed_assets};
use crate::engine::loading::manifest_loader::{
    ManifestLoader, apply_experience_manifest, load_manifest_system, start_loading,
    transition_to_running,
};
use crate::engine::loading::model_loader::{WalkthroughAssets, attach_walkthrough_model};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::movement::input::{MovementInput, update_movement_input};
use crate::engine::movement::integrator::move_player;
use crate::engine::overlay::markers::sync_poi_markers;
use crate::engine::overlay::panels::{
    OverlayPanels, highlight_scene_buttons, setup_overlay_ui, sync_blocker, sync_content_panels,
};
use crate::engine::render::compositor::{
    SceneCompositor, composite_active_slot, setup_display, walkthrough_active,
};
use crate::engine::render::render_targets::resize_render_targets;
use crate::engine::scene::particles::animate_particle_fields;
use crate::engine::scene::setup_scene_slots;
use crate::engine::scene::walkthrough::tag_model_nodes;
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};
use crate::engine::systems::pointer_tracking::{PointerTracker, track_pointer};
use crate::engine::transition::controller::TransitionController;
use crate::engine::transition::selection::{
    handle_scene_buttons, handle_scene_keyboard_shortcuts,
};
use crate::engine::transition::systems::{advance_transition, process_scene_selection};
use crate::engine::visibility::points_of_interest::toggle_poi_overlays;
use crate::engine::visibility::resolver::resolve_points_of_interest;
use crate::rpc::web_rpc::WebRpcPlugin;

const LOG_FILTER: &str = "wgpu=error,naga=warn,bevy_render=info,scene_render_engine=debug";

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ExperienceManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ExperienceManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<WalkthroughAssets>()
        .init_resource::<AssetLoadWatch>()
        .init_resource::<SceneCompositor>()
        .init_resource::<TransitionController>()
        .init_resource::<OverlayPanels>()
        .init_resource::<MovementInput>()
        .init_resource::<PointerTracker>()
        .add_observer(tag_model_nodes);

    app.add_systems(
        Startup,
        (setup_scene_slots, setup_display, setup_overlay_ui, start_loading).chain(),
    );

    // Loading phase systems
    app.add_systems(
        Update,
        (
            load_manifest_system,
            apply_experience_manifest.run_if(resource_added::<ExperienceManifest>),
            transition_to_running,
        )
            .chain()
            .run_if(in_state(AppState::Loading)),
    );

    // Per-frame order: input adapters, resize, ambient hooks, walkthrough hooks,
    // transitions, visibility and overlay sync, compositing.
    let input_systems = (
        update_movement_input,
        track_pointer,
        handle_scene_buttons,
        handle_scene_keyboard_shortcuts, // Native shortcuts or no-op for WASM
        request_pointer_lock_from_input,
        highlight_scene_buttons,
    );

    let visibility_systems = (
        walkthrough_visibility_hooks(),
        sync_poi_markers,
        sync_blocker,
        sync_content_panels,
    )
        .chain();

    app.add_systems(
        Update,
        (
            input_systems,
            resize_render_targets,
            animate_particle_fields,
            walkthrough_movement_hooks(),
            (process_scene_selection, advance_transition).chain(),
            visibility_systems,
            composite_active_slot,
        )
            .chain(),
    );

    app.add_systems(
        Update,
        (attach_walkthrough_model, report_failed_assets, fps_notification_system),
    );

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

/// Look and movement for slot 4. Lock handling runs every frame so leaving the
/// walkthrough releases the pointer.
fn walkthrough_movement_hooks() -> ScheduleConfigs<ScheduleSystem> {
    (
        pointer_lock_system,
        (mouse_look_system, move_player)
            .chain()
            .run_if(walkthrough_active),
    )
        .chain()
        .into_configs()
}

fn walkthrough_visibility_hooks() -> ScheduleConfigs<ScheduleSystem> {
    (
        resolve_points_of_interest
            .run_if(walkthrough_active)
            .run_if(in_state(AppState::Running)),
        toggle_poi_overlays.run_if(walkthrough_active),
    )
        .chain()
        .into_configs()
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: LOG_FILTER.to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::look_controller::{LookController, PointerLockRequest};
    use crate::engine::movement::integrator::PlayerMotion;
    use crate::engine::scene::particles::ParticleField;
    use crate::engine::scene::slot::SceneSlot;
    use crate::engine::scene::walkthrough::WalkthroughPlayer;
    use crate::engine::visibility::points_of_interest::{
        PoiOverlay, PoiVisibility, PointOfInterest,
    };
    use crate::rpc::web_rpc::WebRpcInterface;
    use bevy::input::mouse::MouseMotion;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use constants::render_settings::CAMERA_FAR;
    use constants::transition::WALKTHROUGH_RESTING_POSITION;
    use std::time::Duration;

    struct Handles {
        player: Entity,
        field: Entity,
        point: Entity,
    }

    /// Headless app running the per-slot hooks in their production order.
    fn hook_app() -> (App, Handles) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
                1.0 / 60.0,
            )))
            .init_resource::<SceneCompositor>()
            .init_resource::<MovementInput>()
            .init_resource::<WebRpcInterface>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_event::<PointerLockRequest>()
            .add_event::<MouseMotion>()
            .add_systems(
                Update,
                (
                    animate_particle_fields,
                    walkthrough_movement_hooks(),
                    walkthrough_visibility_hooks(),
                )
                    .chain(),
            );

        let world = app.world_mut();
        world
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);

        let player = world
            .spawn((
                Transform::from_translation(WALKTHROUGH_RESTING_POSITION),
                Projection::from(PerspectiveProjection {
                    far: CAMERA_FAR,
                    ..default()
                }),
                WalkthroughPlayer,
                LookController::default(),
                PlayerMotion::default(),
            ))
            .id();
        let field = world
            .spawn((
                ParticleField {
                    spin: 1.0,
                    hue: 0.5,
                    saturation: 0.5,
                    lightness: 0.5,
                    tilt: Vec2::ZERO,
                },
                Transform::default(),
                MeshMaterial3d::<StandardMaterial>(Handle::default()),
            ))
            .id();
        let point = world
            .spawn((
                PointOfInterest {
                    id: "poi-ahead".to_string(),
                    selector: "#poi-ahead".to_string(),
                    position: WALKTHROUGH_RESTING_POSITION - Vec3::Z * 2.0,
                },
                PoiOverlay::default(),
            ))
            .id();

        (app, Handles { player, field, point })
    }

    fn run(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    fn translation(app: &App, entity: Entity) -> Vec3 {
        app.world()
            .get::<Transform>(entity)
            .map(|transform| transform.translation)
            .expect("entity has a transform")
    }

    fn rotation(app: &App, entity: Entity) -> Quat {
        app.world()
            .get::<Transform>(entity)
            .map(|transform| transform.rotation)
            .expect("entity has a transform")
    }

    fn visibility(app: &App, entity: Entity) -> PoiVisibility {
        app.world()
            .get::<PoiOverlay>(entity)
            .map(|overlay| overlay.visibility)
            .expect("point has an overlay")
    }

    #[test]
    fn walkthrough_hooks_wait_for_the_walkthrough_slot() {
        let (mut app, handles) = hook_app();

        run(&mut app, 5);
        assert_eq!(translation(&app, handles.player), WALKTHROUGH_RESTING_POSITION);
        assert_eq!(visibility(&app, handles.point), PoiVisibility::Hidden);
        assert_ne!(rotation(&app, handles.field), Quat::IDENTITY);

        app.world_mut()
            .resource_mut::<SceneCompositor>()
            .activate(SceneSlot::Walkthrough);
        run(&mut app, 2);

        assert!(translation(&app, handles.player).y < WALKTHROUGH_RESTING_POSITION.y);
        assert_eq!(visibility(&app, handles.point), PoiVisibility::Interactive);
    }

    #[test]
    fn particle_fields_keep_turning_in_every_slot() {
        let (mut app, handles) = hook_app();

        for slot in SceneSlot::ALL {
            app.world_mut()
                .resource_mut::<SceneCompositor>()
                .activate(slot);
            let before = rotation(&app, handles.field);
            run(&mut app, 2);
            assert_ne!(rotation(&app, handles.field), before, "{slot:?}");
        }
    }
}
