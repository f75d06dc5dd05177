//! Offscreen slot rendering and compositing to the window.
//!
//! Each slot camera draws into its own image every frame; a single 2D camera
//! shows exactly one of those images across the whole viewport.

/// Active slot selection and the full-viewport display quad.
///
/// The display is repointed at completion of a transition and nowhere else.
pub mod compositor;

/// Per-slot image targets and their resize handling.
///
/// Images are sized in physical pixels with the device pixel ratio capped.
pub mod render_targets;
