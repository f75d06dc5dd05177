use bevy::prelude::*;
use constants::scene::SLOT_COUNT;

use crate::engine::movement::integrator::PlayerMotion;
use crate::engine::overlay::panels::OverlayPanels;
use crate::engine::render::compositor::SceneCompositor;
use crate::engine::scene::slot::SlotCamera;
use crate::engine::transition::controller::{
    TransitionController, TransitionRequest, TransitionStep, resting_positions,
};
use crate::engine::transition::selection::SceneSelectionEvent;
use crate::rpc::web_rpc::WebRpcInterface;

fn camera_positions<'a>(
    cameras: impl Iterator<Item = (&'a SlotCamera, &'a Transform)>,
) -> [Vec3; SLOT_COUNT] {
    let mut positions = resting_positions();
    for (camera, transform) in cameras {
        positions[camera.0.index()] = transform.translation;
    }
    positions
}

pub fn process_scene_selection(
    mut selections: EventReader<SceneSelectionEvent>,
    compositor: Res<SceneCompositor>,
    mut controller: ResMut<TransitionController>,
    cameras: Query<(&SlotCamera, &Transform)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for selection in selections.read() {
        let active = compositor.active();
        let origins = camera_positions(cameras.iter());

        match controller.request(active, selection.slot, origins) {
            TransitionRequest::Started => {
                info!(
                    "Transition {} -> {} ({:?})",
                    active.number(),
                    selection.slot.number(),
                    selection.source
                );
                rpc_interface.send_notification(
                    "transition_started",
                    serde_json::json!({
                        "from": active.number(),
                        "to": selection.slot.number(),
                        "source": selection.source
                    }),
                );
            }
            TransitionRequest::AlreadyActive => {
                debug!("Scene {} already active", selection.slot.number());
            }
            TransitionRequest::Busy => {
                debug!(
                    "Ignoring request for scene {} during a transition",
                    selection.slot.number()
                );
            }
        }
    }
}

/// Move the cameras along the transition and apply its completion.
pub fn advance_transition(
    time: Res<Time>,
    mut controller: ResMut<TransitionController>,
    mut compositor: ResMut<SceneCompositor>,
    mut panels: ResMut<OverlayPanels>,
    mut cameras: Query<(&SlotCamera, &mut Transform, Option<&mut PlayerMotion>)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    match controller.advance(time.delta_secs()) {
        TransitionStep::Idle => {}
        TransitionStep::Animating(positions) => {
            for (camera, mut transform, _) in &mut cameras {
                transform.translation = positions[camera.0.index()];
            }
        }
        TransitionStep::Completed { target, positions } => {
            compositor.activate(target);
            panels.switch_to(target);

            for (camera, mut transform, motion) in &mut cameras {
                transform.translation = positions[camera.0.index()];
                if let Some(mut motion) = motion {
                    motion.velocity = Vec3::ZERO;
                }
            }

            info!("Scene {} active", target.number());
            rpc_interface.send_notification(
                "content_switched",
                serde_json::json!({
                    "panel": panels.active_id(),
                    "active_scene": target.number()
                }),
            );
        }
    }
}
