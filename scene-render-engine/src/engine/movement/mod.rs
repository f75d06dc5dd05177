//! Walkthrough locomotion.
//!
//! Keyboard state is captured into an explicit snapshot and integrated into
//! the player pose once per frame while the walkthrough slot is displayed.

/// Movement input snapshot and its keyboard adapter.
pub mod input;

/// Damped velocity, gravity and ground probing for the player pose.
pub mod integrator;
