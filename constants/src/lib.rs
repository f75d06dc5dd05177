//! Compile-time tunables shared across the workspace.

pub mod movement;
pub mod path;
pub mod render_settings;
pub mod scene;
pub mod transition;
pub mod visibility;
