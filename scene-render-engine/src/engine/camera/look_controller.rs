use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use constants::movement::{LOOK_SENSITIVITY, PITCH_LIMIT};

use crate::engine::overlay::panels::LockInstructions;
use crate::engine::render::compositor::SceneCompositor;
use crate::engine::scene::slot::SceneSlot;
use crate::rpc::web_rpc::WebRpcInterface;

/// Pointer-lock style first person look. Owns the walkthrough camera's orientation.
#[derive(Component, Debug, Default)]
pub struct LookController {
    pub yaw: f32,
    pub pitch: f32,
    locked: bool,
}

impl LookController {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Apply a pointer delta in pixels.
    pub fn rotate(&mut self, pointer_delta: Vec2) {
        self.yaw -= pointer_delta.x * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - pointer_delta.y * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Move along the camera's local X axis.
pub fn move_right(transform: &mut Transform, distance: f32) {
    let right = transform.rotation * Vec3::X;
    transform.translation += right * distance;
}

/// Move along the horizontal forward direction, `up x right`, ignoring pitch.
pub fn move_forward(transform: &mut Transform, distance: f32) {
    let right = transform.rotation * Vec3::X;
    let forward = Vec3::Y.cross(right);
    transform.translation += forward * distance;
}

/// Request to capture or release the pointer.
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerLockRequest {
    pub lock: bool,
}

/// Clicking the instructions overlay locks, Escape unlocks.
pub fn request_pointer_lock_from_input(
    instructions: Query<&Interaction, (Changed<Interaction>, With<LockInstructions>)>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<PointerLockRequest>,
) {
    if instructions
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        requests.write(PointerLockRequest { lock: true });
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        requests.write(PointerLockRequest { lock: false });
    }
}

/// Apply lock requests to the look controller and the window cursor.
/// The pointer is released whenever the walkthrough is not the displayed slot.
pub fn pointer_lock_system(
    mut requests: EventReader<PointerLockRequest>,
    compositor: Res<SceneCompositor>,
    mut controllers: Query<&mut LookController>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let walkthrough_shown = compositor.is_active(SceneSlot::Walkthrough);
    let mut wanted = None;
    for request in requests.read() {
        wanted = Some(request.lock && walkthrough_shown);
    }

    let Ok(mut controller) = controllers.single_mut() else {
        return;
    };
    if !walkthrough_shown && controller.locked {
        wanted = Some(false);
    }
    let Some(lock) = wanted else {
        return;
    };
    if controller.locked == lock {
        return;
    }

    controller.locked = lock;
    if let Ok(mut window) = windows.single_mut() {
        if lock {
            window.cursor_options.grab_mode = CursorGrabMode::Locked;
            window.cursor_options.visible = false;
        } else {
            window.cursor_options.grab_mode = CursorGrabMode::None;
            window.cursor_options.visible = true;
        }
    }

    info!("Pointer {}", if lock { "locked" } else { "released" });
    rpc_interface.send_notification(
        "pointer_lock_changed",
        serde_json::json!({
            "locked": lock
        }),
    );
}

/// Turn captured mouse motion into camera orientation.
pub fn mouse_look_system(
    mut mouse_motion: EventReader<MouseMotion>,
    mut cameras: Query<(&mut LookController, &mut Transform)>,
) {
    let pointer_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    for (mut controller, mut transform) in &mut cameras {
        if controller.locked && pointer_delta != Vec2::ZERO {
            controller.rotate(pointer_delta);
        }
        transform.rotation = controller.orientation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn forward_is_negative_z_when_facing_default() {
        let mut transform = Transform::default();
        move_forward(&mut transform, 2.0);
        assert_close(transform.translation, Vec3::new(0.0, 0.0, -2.0));

        move_right(&mut transform, 1.0);
        assert_close(transform.translation, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn forward_stays_horizontal_when_pitched() {
        let mut controller = LookController::default();
        controller.pitch = 0.8;
        controller.yaw = std::f32::consts::FRAC_PI_2;
        let mut transform = Transform::from_rotation(controller.orientation());

        move_forward(&mut transform, 1.0);
        assert!(transform.translation.y.abs() < 1e-5);
        // Yawed a quarter turn left: forward now points down -X.
        assert_close(transform.translation, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut controller = LookController::default();
        controller.rotate(Vec2::new(0.0, -1.0e6));
        assert!(controller.pitch < std::f32::consts::FRAC_PI_2);
        controller.rotate(Vec2::new(0.0, 1.0e6));
        assert!(controller.pitch > -std::f32::consts::FRAC_PI_2);
    }
}
