use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::camera::look_controller::PointerLockRequest;
use crate::engine::render::compositor::SceneCompositor;
use crate::engine::scene::slot::SceneSlot;
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::engine::transition::controller::{TransitionController, TransitionRequest};
use crate::engine::transition::selection::{SceneSelectionEvent, SelectionSource};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Engine state an RPC handler may read.
pub struct RpcContext<'a> {
    pub active: SceneSlot,
    pub transition: &'a TransitionController,
    pub fps: Option<f64>,
}

/// Side effects requested by an RPC call, applied as engine events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RpcCommand {
    SelectScene(SceneSlot),
    LockPointer(bool),
}

/// Resource managing bidirectional RPC communication between React and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to React frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to React frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Notifications waiting for the next send pass.
    pub fn pending_notifications(&self) -> usize {
        self.outgoing_notifications.len()
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<SceneSelectionEvent>()
            .add_event::<PointerLockRequest>()
            // Requests become engine events before Update; everything queued during
            // the frame is flushed at the end of it.
            .add_systems(
                PreUpdate,
                (process_incoming_messages, handle_rpc_messages).chain(),
            )
            .add_systems(Last, send_outgoing_messages);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from React frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    // Write events using the non-deprecated method.
    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    compositor: Res<SceneCompositor>,
    transition: Res<TransitionController>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut selections: EventWriter<SceneSelectionEvent>,
    mut lock_requests: EventWriter<PointerLockRequest>,
) {
    let context = RpcContext {
        active: compositor.active(),
        transition: &transition,
        fps: smoothed_fps(&diagnostics),
    };

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);

                let (response, commands) = handle_rpc_request(&request, &context);
                for command in commands {
                    match command {
                        RpcCommand::SelectScene(slot) => {
                            selections.write(SceneSelectionEvent {
                                slot,
                                source: SelectionSource::Rpc,
                            });
                        }
                        RpcCommand::LockPointer(lock) => {
                            lock_requests.write(PointerLockRequest { lock });
                        }
                    }
                }
                if let Some(response) = response {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Handle one request. Returns the response (requests with an id only) and the
/// engine commands to apply; notifications still run their command.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
) -> (Option<RpcResponse>, Vec<RpcCommand>) {
    let mut commands = Vec::new();

    let result = match request.method.as_str() {
        "select_scene" => handle_select_scene(&request.params, context, &mut commands),
        "get_active_scene" => Ok(handle_get_active_scene(context)),
        "lock_pointer" => handle_lock_pointer(&request.params, context, &mut commands),
        "get_fps" => Ok(handle_get_fps(context)),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: METHOD_NOT_FOUND,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({"method": request.method})),
            })
        }
    };

    // Only generate responses for requests with IDs (notifications have no ID).
    let response = request.id.clone().map(|id| match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => create_error_response(id, error.code, &error.message, error.data),
    });

    (response, commands)
}

/// Handle scene selection with parameter validation; the transition itself runs on the next pass.
fn handle_select_scene(
    params: &serde_json::Value,
    context: &RpcContext,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectSceneParams {
        scene: u64,
    }

    let scene_params = serde_json::from_value::<SelectSceneParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'scene' parameter"))?;

    let slot = SceneSlot::from_number(scene_params.scene)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown scene: {}", scene_params.scene)))?;

    let outcome = context.transition.check(context.active, slot);
    if outcome.accepted() {
        commands.push(RpcCommand::SelectScene(slot));
        info!("Scene selection dispatched: {}", slot.number());
    }

    let mut result = serde_json::json!({
        "accepted": outcome.accepted(),
        "active_scene": context.active.number()
    });
    if outcome != TransitionRequest::Started {
        result["reason"] = serde_json::json!(outcome);
    }
    Ok(result)
}

fn handle_get_active_scene(context: &RpcContext) -> serde_json::Value {
    serde_json::json!({
        "active_scene": context.active.number(),
        "transition_in_flight": context.transition.in_flight()
    })
}

/// Pointer lock only takes effect while the walkthrough is displayed.
fn handle_lock_pointer(
    params: &serde_json::Value,
    context: &RpcContext,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct LockPointerParams {
        #[serde(default = "default_lock")]
        lock: bool,
    }

    fn default_lock() -> bool {
        true
    }

    let lock = if params.is_null() {
        true
    } else {
        serde_json::from_value::<LockPointerParams>(params.clone())
            .map_err(|_| RpcError::invalid_params("Expected optional boolean 'lock' parameter"))?
            .lock
    };

    commands.push(RpcCommand::LockPointer(lock));
    Ok(serde_json::json!({
        "locked": lock && context.active == SceneSlot::Walkthrough
    }))
}

fn handle_get_fps(context: &RpcContext) -> serde_json::Value {
    serde_json::json!({
        "fps": context.fps.unwrap_or(0.0) as f32
    })
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to React frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (React frontend).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.to_string(),
            data: None,
        }
    }
}
