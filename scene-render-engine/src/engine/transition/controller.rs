use bevy::prelude::*;
use constants::scene::SLOT_COUNT;
use constants::transition::{NEUTRAL_POINT, TRANSITION_DURATION};
use serde::Serialize;

use crate::engine::scene::slot::SceneSlot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    Idle,
    InFlight {
        target: SceneSlot,
        elapsed: f32,
        /// Camera positions when the animation started, indexed by slot.
        origins: [Vec3; SLOT_COUNT],
    },
}

/// Outcome of a selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRequest {
    Started,
    AlreadyActive,
    Busy,
}

impl TransitionRequest {
    pub fn accepted(self) -> bool {
        self == Self::Started
    }
}

/// Result of advancing the animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep {
    Idle,
    Animating([Vec3; SLOT_COUNT]),
    /// The animation has finished: the target becomes active and cameras snap to rest.
    Completed {
        target: SceneSlot,
        positions: [Vec3; SLOT_COUNT],
    },
}

/// Drives every slot camera toward the neutral point, then swaps the displayed slot.
#[derive(Resource, Debug)]
pub struct TransitionController {
    state: TransitionState,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self {
            state: TransitionState::Idle,
        }
    }
}

impl TransitionController {
    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.state, TransitionState::InFlight { .. })
    }

    /// What a request for `slot` would do, without doing it.
    pub fn check(&self, active: SceneSlot, slot: SceneSlot) -> TransitionRequest {
        if self.in_flight() {
            TransitionRequest::Busy
        } else if slot == active {
            TransitionRequest::AlreadyActive
        } else {
            TransitionRequest::Started
        }
    }

    pub fn request(
        &mut self,
        active: SceneSlot,
        slot: SceneSlot,
        origins: [Vec3; SLOT_COUNT],
    ) -> TransitionRequest {
        let outcome = self.check(active, slot);
        if outcome.accepted() {
            self.state = TransitionState::InFlight {
                target: slot,
                elapsed: 0.0,
                origins,
            };
        }
        outcome
    }

    pub fn advance(&mut self, delta: f32) -> TransitionStep {
        let TransitionState::InFlight {
            target,
            elapsed,
            origins,
        } = self.state
        else {
            return TransitionStep::Idle;
        };

        let elapsed = elapsed + delta.max(0.0);
        if elapsed >= TRANSITION_DURATION {
            self.state = TransitionState::Idle;
            return TransitionStep::Completed {
                target,
                positions: resting_positions(),
            };
        }

        self.state = TransitionState::InFlight {
            target,
            elapsed,
            origins,
        };
        let eased = ease_power2_in_out(elapsed / TRANSITION_DURATION);
        TransitionStep::Animating(origins.map(|origin| origin.lerp(NEUTRAL_POINT, eased)))
    }
}

/// Quadratic ease in-out over `0..=1`.
pub fn ease_power2_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn resting_positions() -> [Vec3; SLOT_COUNT] {
    SceneSlot::ALL.map(SceneSlot::resting_position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::transition::{RESTING_POSITION, WALKTHROUGH_RESTING_POSITION};

    #[test]
    fn requesting_the_active_slot_is_a_no_op() {
        let mut controller = TransitionController::default();
        let outcome = controller.request(SceneSlot::First, SceneSlot::First, resting_positions());

        assert_eq!(outcome, TransitionRequest::AlreadyActive);
        assert_eq!(controller.state(), TransitionState::Idle);
        assert_eq!(controller.advance(0.5), TransitionStep::Idle);
    }

    #[test]
    fn first_to_third_flies_to_neutral_then_rests() {
        let mut controller = TransitionController::default();
        let origins = resting_positions();
        assert_eq!(
            controller.request(SceneSlot::First, SceneSlot::Third, origins),
            TransitionRequest::Started
        );

        let TransitionStep::Animating(halfway) = controller.advance(0.5) else {
            panic!("animation should still be running");
        };
        for (origin, position) in origins.iter().zip(halfway) {
            let expected = origin.lerp(NEUTRAL_POINT, 0.5);
            assert!((position - expected).length() < 1e-5);
        }

        match controller.advance(0.5) {
            TransitionStep::Completed { target, positions } => {
                assert_eq!(target, SceneSlot::Third);
                assert_eq!(positions[0], RESTING_POSITION);
                assert_eq!(positions[1], RESTING_POSITION);
                assert_eq!(positions[2], RESTING_POSITION);
                assert_eq!(positions[3], WALKTHROUGH_RESTING_POSITION);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert!(!controller.in_flight());
    }

    #[test]
    fn requests_during_flight_are_ignored() {
        let mut controller = TransitionController::default();
        controller.request(SceneSlot::First, SceneSlot::Second, resting_positions());
        controller.advance(0.2);

        assert_eq!(
            controller.request(SceneSlot::First, SceneSlot::Walkthrough, resting_positions()),
            TransitionRequest::Busy
        );
        let TransitionState::InFlight { target, elapsed, .. } = controller.state() else {
            panic!("still in flight");
        };
        assert_eq!(target, SceneSlot::Second);
        assert!((elapsed - 0.2).abs() < 1e-6);
    }

    #[test]
    fn single_oversized_step_completes() {
        let mut controller = TransitionController::default();
        controller.request(SceneSlot::Second, SceneSlot::First, resting_positions());
        assert!(matches!(
            controller.advance(5.0),
            TransitionStep::Completed {
                target: SceneSlot::First,
                ..
            }
        ));
    }

    #[test]
    fn easing_is_symmetric_and_bounded() {
        assert_eq!(ease_power2_in_out(0.0), 0.0);
        assert_eq!(ease_power2_in_out(1.0), 1.0);
        assert!((ease_power2_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_power2_in_out(0.25) + ease_power2_in_out(0.75) - 1.0).abs() < 1e-6);
        assert_eq!(ease_power2_in_out(2.0), 1.0);
    }
}
