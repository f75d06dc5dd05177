use bevy::prelude::*;

use crate::engine::camera::look_controller::LookController;
use crate::engine::core::app_state::FpsText;
use crate::engine::render::compositor::SceneCompositor;
use crate::engine::scene::slot::SceneSlot;

const PANEL_TITLES: [&str; 4] = ["Drift", "Tide", "Ember", "Walkthrough"];
const BUTTON_COLOUR: Color = Color::srgba(0.1, 0.1, 0.1, 0.8);
const BUTTON_HOVER_COLOUR: Color = Color::srgba(0.25, 0.25, 0.25, 0.9);
const BLOCKER_COLOUR: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);
const INSTRUCTIONS: &str =
    "Click to walk\nMove: WASD / arrows   Look: mouse\nE opens notes, Q closes them   Esc releases the pointer";

/// Overlay content shown alongside one slot.
#[derive(Component, Debug, Clone, Copy)]
pub struct ContentPanel(pub SceneSlot);

/// Which content panel is active. Exactly one at any time.
#[derive(Resource, Debug)]
pub struct OverlayPanels {
    active: SceneSlot,
}

impl Default for OverlayPanels {
    fn default() -> Self {
        Self {
            active: SceneSlot::First,
        }
    }
}

impl OverlayPanels {
    pub fn active(&self) -> SceneSlot {
        self.active
    }

    pub fn active_id(&self) -> String {
        self.active.panel_id()
    }

    pub fn switch_to(&mut self, slot: SceneSlot) {
        self.active = slot;
    }
}

/// Requests a transition to its slot when pressed.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneButton(pub SceneSlot);

/// Clicking it captures the pointer for the walkthrough.
#[derive(Component, Debug)]
pub struct LockInstructions;

/// Dims the walkthrough while the pointer is free.
#[derive(Component, Debug)]
pub struct PointerBlocker;

pub fn sync_content_panels(
    panels: Res<OverlayPanels>,
    mut content: Query<(&ContentPanel, &mut Visibility)>,
) {
    for (panel, mut visibility) in &mut content {
        let wanted = if panel.0 == panels.active() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

/// The blocker is up while the walkthrough is shown without pointer lock.
pub fn sync_blocker(
    compositor: Res<SceneCompositor>,
    controllers: Query<&LookController>,
    mut blockers: Query<&mut Visibility, With<PointerBlocker>>,
) {
    let locked = controllers.iter().any(LookController::is_locked);
    let shown = compositor.is_active(SceneSlot::Walkthrough) && !locked;
    let wanted = if shown {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };

    for mut visibility in &mut blockers {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

pub fn highlight_scene_buttons(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<SceneButton>)>,
) {
    for (interaction, mut background) in &mut buttons {
        background.0 = match interaction {
            Interaction::Hovered | Interaction::Pressed => BUTTON_HOVER_COLOUR,
            Interaction::None => BUTTON_COLOUR,
        };
    }
}

pub fn setup_overlay_ui(mut commands: Commands, panels: Res<OverlayPanels>) {
    commands
        .spawn((
            PointerBlocker,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BLOCKER_COLOUR),
            Visibility::Hidden,
        ))
        .with_children(|blocker| {
            blocker
                .spawn((
                    Button,
                    LockInstructions,
                    Node {
                        padding: UiRect::all(Val::Px(24.0)),
                        ..default()
                    },
                ))
                .with_children(|instructions| {
                    instructions.spawn((
                        Text::new(INSTRUCTIONS),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        TextLayout::new_with_justify(JustifyText::Center),
                    ));
                });
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|row| {
            for slot in SceneSlot::ALL {
                row.spawn((
                    Button,
                    SceneButton(slot),
                    Node {
                        padding: UiRect::axes(Val::Px(14.0), Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_COLOUR),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(slot.number().to_string()),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
            }
        });

    for slot in SceneSlot::ALL {
        commands
            .spawn((
                ContentPanel(slot),
                Name::new(slot.panel_id()),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(24.0),
                    left: Val::Px(24.0),
                    ..default()
                },
                if slot == panels.active() {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                },
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new(PANEL_TITLES[slot.index()]),
                    TextFont {
                        font_size: 32.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
    }

    #[cfg(not(target_arch = "wasm32"))]
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(1., 0., 0.)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        FpsText,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn visible_panels(world: &mut World) -> Vec<SceneSlot> {
        let mut panels = world.query::<(&ContentPanel, &Visibility)>();
        panels
            .iter(world)
            .filter(|(_, visibility)| **visibility != Visibility::Hidden)
            .map(|(panel, _)| panel.0)
            .collect()
    }

    #[test]
    fn exactly_one_panel_is_shown() {
        let mut world = World::new();
        world.init_resource::<OverlayPanels>();
        world
            .run_system_once(setup_overlay_ui)
            .expect("overlay spawns");
        assert_eq!(visible_panels(&mut world), vec![SceneSlot::First]);

        world
            .resource_mut::<OverlayPanels>()
            .switch_to(SceneSlot::Third);
        world
            .run_system_once(sync_content_panels)
            .expect("panel sync runs");

        assert_eq!(visible_panels(&mut world), vec![SceneSlot::Third]);
        assert_eq!(world.resource::<OverlayPanels>().active_id(), "content3");
    }

    #[test]
    fn blocker_only_covers_an_unlocked_walkthrough() {
        let mut world = World::new();
        world.init_resource::<OverlayPanels>();
        world.init_resource::<SceneCompositor>();
        world.spawn(LookController::default());
        world
            .run_system_once(setup_overlay_ui)
            .expect("overlay spawns");

        let blocker_visibility = |world: &mut World| {
            *world
                .query_filtered::<&Visibility, With<PointerBlocker>>()
                .single(world)
                .expect("one blocker")
        };

        world.run_system_once(sync_blocker).expect("blocker sync runs");
        assert_eq!(blocker_visibility(&mut world), Visibility::Hidden);

        world
            .resource_mut::<SceneCompositor>()
            .activate(SceneSlot::Walkthrough);
        world.run_system_once(sync_blocker).expect("blocker sync runs");
        assert_eq!(blocker_visibility(&mut world), Visibility::Inherited);
    }
}
