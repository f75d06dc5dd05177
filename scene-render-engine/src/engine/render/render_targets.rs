use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::window::{PrimaryWindow, WindowResized};
use constants::render_settings::MAX_PIXEL_RATIO;
use constants::scene::SLOT_COUNT;

use crate::engine::scene::slot::{SceneSlot, SlotCamera};

/// Offscreen image each slot camera renders into, indexed by slot.
#[derive(Resource, Clone)]
pub struct SlotRenderTargets {
    images: [Handle<Image>; SLOT_COUNT],
}

impl SlotRenderTargets {
    pub fn new(images: [Handle<Image>; SLOT_COUNT]) -> Self {
        Self { images }
    }

    pub fn get(&self, slot: SceneSlot) -> &Handle<Image> {
        &self.images[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle<Image>> {
        self.images.iter()
    }
}

/// Physical pixel size for a viewport, with the pixel ratio capped and empty viewports
/// clamped to a single pixel.
pub fn render_target_extent(logical_size: Vec2, scale_factor: f32) -> Extent3d {
    let ratio = scale_factor.clamp(f32::MIN_POSITIVE, MAX_PIXEL_RATIO);
    let physical = (logical_size * ratio).round();
    Extent3d {
        width: (physical.x as u32).max(1),
        height: (physical.y as u32).max(1),
        depth_or_array_layers: 1,
    }
}

/// Aspect ratio for a viewport; degenerate sizes fall back to square.
pub fn viewport_aspect_ratio(logical_size: Vec2) -> f32 {
    if logical_size.x <= 0.0 || logical_size.y <= 0.0 {
        return 1.0;
    }
    logical_size.x / logical_size.y
}

/// Create an image usable both as a camera target and as a UI texture.
pub fn create_render_target(size: Extent3d) -> Image {
    let mut image = Image::new_fill(
        size,
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

/// Resize every slot image and every slot camera's aspect ratio in one pass.
pub fn resize_render_targets(
    mut resize_events: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    targets: Res<SlotRenderTargets>,
    mut images: ResMut<Assets<Image>>,
    mut cameras: Query<&mut Projection, With<SlotCamera>>,
) {
    let Some(resized) = resize_events.read().last() else {
        return;
    };

    let scale_factor = windows
        .get(resized.window)
        .map(|window| window.scale_factor())
        .unwrap_or(1.0);
    let logical_size = Vec2::new(resized.width, resized.height);
    let extent = render_target_extent(logical_size, scale_factor);
    let aspect_ratio = viewport_aspect_ratio(logical_size);

    for handle in targets.iter() {
        if let Some(image) = images.get_mut(handle) {
            image.resize(extent);
        }
    }

    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = aspect_ratio;
        }
    }

    debug!(
        "Render targets resized to {}x{} (aspect {:.3})",
        extent.width, extent.height, aspect_ratio
    );
}
