use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::render::view::RenderLayers;
use constants::render_settings::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};
use constants::scene::SLOT_COUNT;
use constants::transition::{RESTING_POSITION, WALKTHROUGH_RESTING_POSITION};

/// One of the four independently simulated scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSlot {
    First,
    Second,
    Third,
    Walkthrough,
}

impl SceneSlot {
    pub const ALL: [SceneSlot; SLOT_COUNT] = [
        SceneSlot::First,
        SceneSlot::Second,
        SceneSlot::Third,
        SceneSlot::Walkthrough,
    ];

    /// Convert the 1-based identifier used by buttons and RPC callers.
    pub fn from_number(number: u64) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Walkthrough),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Walkthrough => 3,
        }
    }

    /// Render layer holding this slot's entities. Layer 0 is left to the display camera.
    pub fn render_layers(self) -> RenderLayers {
        RenderLayers::layer(self.index() + 1)
    }

    /// Identifier of the overlay content panel shown with this slot.
    pub fn panel_id(self) -> String {
        format!("content{}", self.number())
    }

    /// Where this slot's camera sits when no transition is running.
    pub fn resting_position(self) -> Vec3 {
        match self {
            Self::Walkthrough => WALKTHROUGH_RESTING_POSITION,
            _ => RESTING_POSITION,
        }
    }
}

/// Marks the camera rendering a slot into its offscreen image.
#[derive(Component, Debug, Clone, Copy)]
pub struct SlotCamera(pub SceneSlot);

/// Spawn a perspective camera that renders `slot` into `target`.
pub fn spawn_slot_camera(
    commands: &mut Commands,
    slot: SceneSlot,
    target: Handle<Image>,
    clear_colour: Color,
    aspect_ratio: f32,
) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            Camera {
                target: RenderTarget::Image(target.into()),
                order: slot.index() as isize,
                clear_color: ClearColorConfig::Custom(clear_colour),
                ..default()
            },
            Projection::from(PerspectiveProjection {
                fov: CAMERA_FOV_DEGREES.to_radians(),
                near: CAMERA_NEAR,
                far: CAMERA_FAR,
                aspect_ratio,
            }),
            Transform::from_translation(slot.resting_position()),
            slot.render_layers(),
            SlotCamera(slot),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_round_trip_through_identifiers() {
        for slot in SceneSlot::ALL {
            assert_eq!(SceneSlot::from_number(slot.number() as u64), Some(slot));
        }
        assert_eq!(SceneSlot::from_number(0), None);
        assert_eq!(SceneSlot::from_number(5), None);
    }

    #[test]
    fn walkthrough_rests_apart_from_particle_scenes() {
        assert_eq!(SceneSlot::Second.resting_position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(
            SceneSlot::Walkthrough.resting_position(),
            Vec3::new(0.0, 1.0, 2.0)
        );
        assert_eq!(SceneSlot::Third.panel_id(), "content3");
    }

    #[test]
    fn slots_render_on_distinct_layers() {
        let layers: Vec<_> = SceneSlot::ALL.iter().map(|s| s.render_layers()).collect();
        for (i, a) in layers.iter().enumerate() {
            assert!(!a.intersects(&RenderLayers::layer(0)));
            for b in layers.iter().skip(i + 1) {
                assert!(!a.intersects(b));
            }
        }
    }
}
