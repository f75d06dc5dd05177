/// Vertical field of view of every slot camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Render targets never exceed this many physical pixels per logical pixel.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Camera order of the window camera that shows the composited image.
pub const DISPLAY_CAMERA_ORDER: isize = 10;

/// How often the FPS figure is pushed to the host page, in seconds.
pub const FPS_NOTIFICATION_INTERVAL: f32 = 0.5;
