use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::DISPLAY_CAMERA_ORDER;

use crate::engine::render::render_targets::SlotRenderTargets;
use crate::engine::scene::slot::SceneSlot;

/// Which slot's image reaches the screen. Only the transition controller changes it.
#[derive(Resource, Debug)]
pub struct SceneCompositor {
    active: SceneSlot,
}

impl Default for SceneCompositor {
    fn default() -> Self {
        Self {
            active: SceneSlot::First,
        }
    }
}

impl SceneCompositor {
    pub fn active(&self) -> SceneSlot {
        self.active
    }

    pub fn is_active(&self, slot: SceneSlot) -> bool {
        self.active == slot
    }

    pub(crate) fn activate(&mut self, slot: SceneSlot) {
        self.active = slot;
    }
}

/// Full-viewport image node showing the active slot's render target.
#[derive(Component)]
pub struct CompositeDisplay;

/// Run condition for the walkthrough's per-frame hooks.
pub fn walkthrough_active(compositor: Res<SceneCompositor>) -> bool {
    compositor.is_active(SceneSlot::Walkthrough)
}

/// Spawn the window camera and the textured full-screen quad it draws.
pub fn setup_display(
    mut commands: Commands,
    targets: Res<SlotRenderTargets>,
    compositor: Res<SceneCompositor>,
) {
    commands.spawn((
        Camera2d,
        Camera {
            order: DISPLAY_CAMERA_ORDER,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        RenderLayers::layer(0),
        IsDefaultUiCamera,
    ));

    commands.spawn((
        ImageNode::new(targets.get(compositor.active()).clone()),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        GlobalZIndex(-1),
        CompositeDisplay,
    ));
}

/// Point the display quad at the active slot's image.
pub fn composite_active_slot(
    compositor: Res<SceneCompositor>,
    targets: Res<SlotRenderTargets>,
    mut display: Query<&mut ImageNode, With<CompositeDisplay>>,
) {
    let wanted = targets.get(compositor.active());
    for mut image_node in &mut display {
        if image_node.image != *wanted {
            image_node.image = wanted.clone();
        }
    }
}
