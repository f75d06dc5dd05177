//! Runtime configuration of the experience.
//!
//! The manifest names the walkthrough model, its optional environment maps,
//! the overlay elements and the points of interest bound to them.

/// Experience manifest asset and its validation.
pub mod experience_manifest;
