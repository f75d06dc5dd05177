use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::EXPERIENCE_MANIFEST_PATH;

use crate::engine::assets::experience_manifest::{ConfigError, ExperienceManifest};
use crate::engine::core::app_state::AppState;
use crate::engine::loading::asset_watch::AssetLoadWatch;
use crate::engine::loading::model_loader::{WalkthroughAssets, request_walkthrough_assets};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::overlay::markers::spawn_poi_marker;
use crate::engine::scene::walkthrough::WalkthroughPlayer;
use crate::engine::visibility::points_of_interest::{PointOfInterest, spawn_point_of_interest};
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<ExperienceManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    manifest_loader.handle = Some(asset_server.load(EXPERIENCE_MANIFEST_PATH));
}

/// Publish the manifest as a resource once loaded. A missing or malformed manifest
/// falls back to the defaults.
pub fn load_manifest_system(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    manifests: Res<Assets<ExperienceManifest>>,
    asset_server: Res<AssetServer>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
) {
    if loading_progress.manifest_loaded {
        return;
    }
    let Some(ref handle) = manifest_loader.handle else {
        return;
    };

    let manifest = if let Some(manifest) = manifests.get(handle) {
        println!("✓ Experience manifest loaded");
        manifest.clone()
    } else if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle.id()) {
        error!(
            "Failed to load {}: {}; using defaults",
            EXPERIENCE_MANIFEST_PATH, error
        );
        rpc_interface.send_notification(
            "asset_load_failed",
            serde_json::json!({
                "asset": EXPERIENCE_MANIFEST_PATH,
                "error": error.to_string()
            }),
        );
        ExperienceManifest::default()
    } else {
        return;
    };

    commands.insert_resource(manifest);
    loading_progress.manifest_loaded = true;
}

/// Spawn everything the manifest describes: model root, environment and points of interest.
pub fn apply_experience_manifest(
    manifest: Res<ExperienceManifest>,
    asset_server: Res<AssetServer>,
    players: Query<Entity, With<WalkthroughPlayer>>,
    mut walkthrough_assets: ResMut<WalkthroughAssets>,
    mut watch: ResMut<AssetLoadWatch>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
) {
    request_walkthrough_assets(
        &mut commands,
        &asset_server,
        &manifest.walkthrough,
        players.single().ok(),
        &mut walkthrough_assets,
        &mut watch,
    );

    match spawn_points_of_interest(&mut commands, &manifest) {
        Ok(count) => println!("✓ {} points of interest bound", count),
        Err(config_error) => {
            error!("Points of interest disabled: {}", config_error);
            rpc_interface.send_notification(
                "configuration_error",
                serde_json::json!({
                    "message": config_error.to_string()
                }),
            );
        }
    }

    loading_progress.experience_applied = true;
}

/// All points are validated before any is spawned, so a bad manifest spawns none.
pub fn spawn_points_of_interest(
    commands: &mut Commands,
    manifest: &ExperienceManifest,
) -> Result<usize, ConfigError> {
    let bound = manifest.bound_points()?;

    for binding in &bound {
        let poi = spawn_point_of_interest(
            commands,
            PointOfInterest {
                id: binding.point.id.clone(),
                selector: binding.point.selector.clone(),
                position: binding.point.world_position(),
            },
        );
        spawn_poi_marker(commands, poi, binding.overlay);
    }

    Ok(bound.len())
}

pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.ready_to_run() {
        println!("→ Experience ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
