use bevy::math::Vec3;

/// Every slot camera flies toward this point during a transition.
pub const NEUTRAL_POINT: Vec3 = Vec3::new(0.0, 0.0, -15.0);

/// Transition animation length in seconds.
pub const TRANSITION_DURATION: f32 = 1.0;

/// Resting position shared by the particle scene cameras.
pub const RESTING_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Resting position of the walkthrough camera.
pub const WALKTHROUGH_RESTING_POSITION: Vec3 = Vec3::new(0.0, 1.0, 2.0);
