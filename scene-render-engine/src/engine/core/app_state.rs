use bevy::prelude::*;

/// Rendering starts immediately; `Running` gates the systems that need the
/// experience manifest applied.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;
