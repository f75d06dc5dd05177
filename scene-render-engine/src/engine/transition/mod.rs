//! Animated switching between scene slots.
//!
//! A request flies every slot camera toward the neutral point; only when the
//! animation completes does the displayed slot change.

/// Pure transition state machine.
pub mod controller;

/// Scene selection events from buttons and keyboard shortcuts.
pub mod selection;

/// Systems applying selections and transition steps to the world.
pub mod systems;
