//! Diagnostics and ambient input tracking.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC and updates native UI overlays.
pub mod fps_tracking;

/// Normalized pointer position, recorded every frame.
pub mod pointer_tracking;
