use bevy::prelude::*;
use bevy::window::PresentMode;

#[cfg(target_arch = "wasm32")]
pub fn create_window_config() -> Window {
    Window {
        canvas: Some("#bevy".into()),
        fit_canvas_to_parent: true,
        prevent_default_event_handling: true,
        present_mode: PresentMode::AutoVsync,
        ..default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn create_window_config() -> Window {
    Window {
        title: "Scene Render Engine".into(),
        present_mode: PresentMode::AutoVsync,
        ..default()
    }
}
