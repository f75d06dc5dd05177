//! JSON-RPC 2.0 communication layer for the hosting web page.
//!
//! The engine runs inside an iframe; the page drives scene selection and
//! pointer lock through requests and receives overlay and lifecycle state as
//! notifications.
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Engine (iframe)
//!        │                                           │
//!        ├─ select_scene {scene: 3}, id 7 ─────────> │ ── SceneSelectionEvent
//!        │ <──────── {accepted: true, ...}, id 7 ────┤
//!        │                                           │
//!        │ <──────── transition_started ─────────────┤
//!        │ <──────── content_switched ───────────────┤ (one second later)
//!        │ <──────── overlay_update ─────────────────┤ (whenever markers change)
//! ```
//!
//! Requests are decoded in `PreUpdate` and turned into engine events, so they are
//! applied by the same systems as button and keyboard input. Responses and
//! notifications queued during a frame are posted in `Last`.
//!
//! ## Methods
//!
//! - `select_scene {scene}`: request a transition to scene 1-4; answers
//!   `accepted` and, when declined, a `reason` (`already_active` or `busy`)
//! - `get_active_scene`: displayed scene and whether a transition is running
//! - `lock_pointer {lock?}`: capture (default) or release the pointer for the walkthrough
//! - `get_fps`: smoothed frame rate
//!
//! Requests without an `id` are executed but not answered.
//!
//! ## Notifications
//!
//! `transition_started`, `content_switched`, `overlay_update`, `poi_interaction`,
//! `pointer_lock_changed`, `asset_load_failed`, `configuration_error`, `fps_update`.
//!
//! ## Error Handling
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params

/// JSON-RPC 2.0 bidirectional communication system for the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
