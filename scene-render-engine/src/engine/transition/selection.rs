use bevy::prelude::*;
use serde::Serialize;

use crate::engine::overlay::panels::SceneButton;
use crate::engine::scene::slot::SceneSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSource {
    Button,
    Keyboard,
    Rpc,
}

/// A request to show another slot.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneSelectionEvent {
    pub slot: SceneSlot,
    pub source: SelectionSource,
}

pub fn handle_scene_buttons(
    buttons: Query<(&Interaction, &SceneButton), Changed<Interaction>>,
    mut selections: EventWriter<SceneSelectionEvent>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            selections.write(SceneSelectionEvent {
                slot: button.0,
                source: SelectionSource::Button,
            });
        }
    }
}

/// Number keys select slots on native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_scene_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selections: EventWriter<SceneSelectionEvent>,
) {
    const SHORTCUTS: [(KeyCode, SceneSlot); 4] = [
        (KeyCode::Digit1, SceneSlot::First),
        (KeyCode::Digit2, SceneSlot::Second),
        (KeyCode::Digit3, SceneSlot::Third),
        (KeyCode::Digit4, SceneSlot::Walkthrough),
    ];

    for (key, slot) in SHORTCUTS {
        if keyboard.just_pressed(key) {
            selections.write(SceneSelectionEvent {
                slot,
                source: SelectionSource::Keyboard,
            });
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn handle_scene_keyboard_shortcuts() {
    // Slots are selected through the buttons or RPC on the web.
}
