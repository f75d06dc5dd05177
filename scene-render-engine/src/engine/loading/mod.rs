//! Experience loading: manifest, walkthrough model and failure reporting.
//!
//! Loading never blocks rendering. Scenes draw from the first frame and the
//! walkthrough model joins whenever its glTF finishes loading.

/// Load failures surfaced once per asset.
pub mod asset_watch;

/// Experience manifest loading and point of interest setup.
///
/// Falls back to the default manifest when the file is missing or malformed.
pub mod manifest_loader;

/// glTF model and environment map loading for the walkthrough slot.
pub mod model_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
