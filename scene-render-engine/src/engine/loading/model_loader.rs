use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::assets::experience_manifest::WalkthroughConfig;
use crate::engine::loading::asset_watch::AssetLoadWatch;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::walkthrough::spawn_model_root;

#[derive(Resource, Default)]
pub struct WalkthroughAssets {
    pub model: Option<Handle<Gltf>>,
    root: Option<Entity>,
}

/// Start the model load and attach environment lighting to the player camera.
pub fn request_walkthrough_assets(
    commands: &mut Commands,
    asset_server: &AssetServer,
    config: &WalkthroughConfig,
    player_camera: Option<Entity>,
    walkthrough_assets: &mut WalkthroughAssets,
    watch: &mut AssetLoadWatch,
) {
    let model: Handle<Gltf> = asset_server.load(&config.model);
    watch.watch(config.model.clone(), model.clone().untyped());
    walkthrough_assets.model = Some(model);
    walkthrough_assets.root = Some(spawn_model_root(commands, config.collidable_model));

    let (Some(environment), Some(camera)) = (&config.environment, player_camera) else {
        return;
    };
    let diffuse_map: Handle<Image> = asset_server.load(&environment.diffuse_map);
    let specular_map: Handle<Image> = asset_server.load(&environment.specular_map);
    watch.watch(environment.diffuse_map.clone(), diffuse_map.clone().untyped());
    watch.watch(environment.specular_map.clone(), specular_map.clone().untyped());

    commands.entity(camera).insert(EnvironmentMapLight {
        diffuse_map,
        specular_map,
        intensity: environment.intensity,
        ..default()
    });
}

/// Attach the model's scene under its root once the glTF has loaded.
/// Node tagging happens when the scene instance reports ready.
pub fn attach_walkthrough_model(
    mut loading_progress: ResMut<LoadingProgress>,
    walkthrough_assets: Res<WalkthroughAssets>,
    gltfs: Res<Assets<Gltf>>,
    mut commands: Commands,
) {
    if loading_progress.model_attached {
        return;
    }
    let (Some(handle), Some(root)) = (&walkthrough_assets.model, walkthrough_assets.root) else {
        return;
    };
    let Some(gltf) = gltfs.get(handle) else {
        return;
    };

    loading_progress.model_attached = true;
    let Some(scene) = gltf
        .default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
    else {
        warn!("Walkthrough model contains no scene");
        return;
    };

    commands.entity(root).insert(SceneRoot(scene));
    println!("✓ Walkthrough model loaded");
}
