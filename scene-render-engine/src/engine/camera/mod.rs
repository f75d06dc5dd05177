//! First person camera control for the walkthrough slot.
//!
//! Pointer-lock look handling plus the relative move primitives the movement
//! integrator drives.

/// Look controller component, move primitives and pointer lock systems.
pub mod look_controller;
