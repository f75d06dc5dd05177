use bevy::input::keyboard::KeyCode;

/// Points of interest further than this from the camera are hidden and closed.
pub const INTERACTION_RANGE: f32 = 4.0;

/// Overlay text opacity when a point of interest is opened.
pub const OVERLAY_OPEN_OPACITY: f32 = 1.0;

/// Overlay text opacity when closed.
pub const OVERLAY_CLOSED_OPACITY: f32 = 0.0;

/// Opens the overlay text of every interactive point of interest.
pub const OPEN_OVERLAY_KEY: KeyCode = KeyCode::KeyE;

/// Closes the overlay text of every interactive point of interest.
pub const CLOSE_OVERLAY_KEY: KeyCode = KeyCode::KeyQ;
