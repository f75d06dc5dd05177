use bevy::prelude::*;

/// Held movement keys. Written only by [`update_movement_input`]; the integrator
/// reads one snapshot per frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementInput {
    /// Unnormalised input direction: x is right-left, z is forward-back.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(
            f32::from(u8::from(self.right)) - f32::from(u8::from(self.left)),
            0.0,
            f32::from(u8::from(self.forward)) - f32::from(u8::from(self.backward)),
        )
    }

    pub fn any_longitudinal(&self) -> bool {
        self.forward || self.backward
    }

    pub fn any_lateral(&self) -> bool {
        self.left || self.right
    }
}

/// Keyboard adapter: WASD and the arrow keys, press/release semantics.
pub fn update_movement_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<MovementInput>,
) {
    let snapshot = MovementInput {
        forward: keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
        backward: keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]),
        left: keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
        right: keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
    };

    if *input != snapshot {
        *input = snapshot;
    }
}
