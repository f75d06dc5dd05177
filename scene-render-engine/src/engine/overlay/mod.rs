//! Screen-space overlay: scene buttons, content panels, pointer-lock blocker and
//! point of interest markers.

/// Markers positioned over points of interest, mirrored to the host page.
pub mod markers;

/// Content panels, scene buttons and the pointer-lock instructions.
pub mod panels;
