/// Movement integration runs on a slowed clock: real seconds are divided by three.
pub const MOVEMENT_TIME_SCALE: f32 = 1.0 / 3.0;

/// Largest real frame delta fed to the integrator, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Horizontal velocity damping per unit of scaled time.
pub const VELOCITY_DAMPING: f32 = 10.0;

/// Gravity (9.8) multiplied by the player mass (100).
pub const GRAVITY: f32 = 9.8 * 100.0;

/// Acceleration applied along the normalised input direction.
pub const MOVE_ACCELERATION: f32 = 30.0;

/// Height of the walkthrough camera above the surface it stands on.
pub const PLAYER_EYE_HEIGHT: f32 = 1.0;

/// Slack below the feet still counted as ground contact.
pub const GROUND_CONTACT_TOLERANCE: f32 = 0.05;

/// Maximum hit distance of the downward ground probe, measured from the eye.
pub const GROUND_PROBE_DISTANCE: f32 = PLAYER_EYE_HEIGHT + GROUND_CONTACT_TOLERANCE;

/// Radians of yaw/pitch per pixel of pointer motion while locked.
pub const LOOK_SENSITIVITY: f32 = 0.002;

/// Pitch is kept strictly inside (-PI/2, PI/2).
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.001;
