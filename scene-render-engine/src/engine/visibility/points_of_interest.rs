use bevy::prelude::*;
use constants::visibility::{
    CLOSE_OVERLAY_KEY, OPEN_OVERLAY_KEY, OVERLAY_CLOSED_OPACITY, OVERLAY_OPEN_OPACITY,
};

use crate::engine::visibility::resolver::Resolution;
use crate::rpc::web_rpc::WebRpcInterface;

/// Per-frame classification of a point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoiVisibility {
    #[default]
    Hidden,
    /// In range, in view and unobstructed; overlay text can be toggled.
    Interactive,
}

impl PoiVisibility {
    pub fn is_shown(self) -> bool {
        self != Self::Hidden
    }

    pub fn is_interactive(self) -> bool {
        self == Self::Interactive
    }
}

/// A fixed world position bound to an overlay element.
#[derive(Component, Debug, Clone)]
pub struct PointOfInterest {
    pub id: String,
    pub selector: String,
    pub position: Vec3,
}

/// Overlay state owned by the visibility pass and the interaction toggle.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PoiOverlay {
    pub visibility: PoiVisibility,
    /// Pixel offset from the top-left of the viewport.
    pub screen_position: Vec2,
    pub text_opacity: f32,
}

impl Default for PoiOverlay {
    fn default() -> Self {
        Self {
            visibility: PoiVisibility::Hidden,
            screen_position: Vec2::ZERO,
            text_opacity: OVERLAY_CLOSED_OPACITY,
        }
    }
}

impl PoiOverlay {
    pub fn apply(&mut self, resolution: Resolution, screen_position: Vec2) {
        self.visibility = resolution.visibility;
        self.screen_position = screen_position;
        if resolution.close_overlay {
            self.text_opacity = OVERLAY_CLOSED_OPACITY;
        }
    }

    pub fn is_open(&self) -> bool {
        self.text_opacity > OVERLAY_CLOSED_OPACITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayToggle {
    Open,
    Close,
}

impl OverlayToggle {
    /// Close wins when both keys arrive in the same frame.
    pub fn from_keyboard(keyboard: &ButtonInput<KeyCode>) -> Option<Self> {
        if keyboard.just_pressed(CLOSE_OVERLAY_KEY) {
            Some(Self::Close)
        } else if keyboard.just_pressed(OPEN_OVERLAY_KEY) {
            Some(Self::Open)
        } else {
            None
        }
    }

    fn opacity(self) -> f32 {
        match self {
            Self::Open => OVERLAY_OPEN_OPACITY,
            Self::Close => OVERLAY_CLOSED_OPACITY,
        }
    }
}

/// Apply a toggle to one overlay. Only interactive points respond.
/// Returns whether the opacity changed.
pub fn toggle_overlay(overlay: &mut PoiOverlay, toggle: OverlayToggle) -> bool {
    if !overlay.visibility.is_interactive() {
        return false;
    }
    let opacity = toggle.opacity();
    if overlay.text_opacity == opacity {
        return false;
    }
    overlay.text_opacity = opacity;
    true
}

pub fn spawn_point_of_interest(commands: &mut Commands, poi: PointOfInterest) -> Entity {
    commands.spawn((poi, PoiOverlay::default())).id()
}

/// Keyboard interaction with whatever points are currently interactive.
pub fn toggle_poi_overlays(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut points: Query<(&PointOfInterest, &mut PoiOverlay)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(toggle) = OverlayToggle::from_keyboard(&keyboard) else {
        return;
    };

    for (poi, mut overlay) in &mut points {
        if !toggle_overlay(&mut overlay, toggle) {
            continue;
        }

        let opened = toggle == OverlayToggle::Open;
        info!(
            "{} overlay for point of interest '{}'",
            if opened { "Opened" } else { "Closed" },
            poi.id
        );
        rpc_interface.send_notification(
            "poi_interaction",
            serde_json::json!({
                "id": poi.id,
                "open": opened
            }),
        );
    }
}
