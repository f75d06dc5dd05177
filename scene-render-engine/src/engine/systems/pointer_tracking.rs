use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

/// Last pointer position in normalized device style coordinates, `-1..1` on
/// both axes with +y up. Kept up to date for hover effects; nothing reads it yet.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    pub position: Vec2,
}

pub fn normalize_pointer(cursor: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        -(cursor.y / viewport.y) * 2.0 + 1.0,
    )
}

pub fn track_pointer(
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut tracker: ResMut<PointerTracker>,
) {
    let Some(moved) = cursor_moved.read().last() else {
        return;
    };
    let Ok(window) = windows.get(moved.window) else {
        return;
    };
    tracker.position = normalize_pointer(moved.position, window.size());
}
