//! Points of interest in the walkthrough and their per-frame visibility.

/// Point of interest components and the keyboard overlay toggle.
pub mod points_of_interest;

/// Range, frustum and occlusion classification of points of interest.
pub mod resolver;
