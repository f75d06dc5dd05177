use bevy::prelude::*;

use crate::engine::assets::experience_manifest::OverlayElement;
use crate::engine::render::compositor::SceneCompositor;
use crate::engine::scene::slot::SceneSlot;
use crate::engine::visibility::points_of_interest::{PoiOverlay, PointOfInterest};
use crate::rpc::web_rpc::WebRpcInterface;

const LABEL_FONT_SIZE: f32 = 18.0;
const TEXT_FONT_SIZE: f32 = 14.0;
const TEXT_MAX_WIDTH: f32 = 240.0;

/// Screen-space element positioned over a point of interest.
#[derive(Component, Debug)]
pub struct PoiMarker {
    pub poi: Entity,
}

/// The marker's nested text, faded in and out by the interaction toggle.
#[derive(Component, Debug)]
pub struct PoiMarkerText;

/// Presence classes of a marker element.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OverlayClasses {
    pub visible: bool,
    pub interactive: bool,
}

impl OverlayClasses {
    pub fn for_overlay(overlay: &PoiOverlay, walkthrough_shown: bool) -> Self {
        Self {
            visible: walkthrough_shown && overlay.visibility.is_shown(),
            interactive: walkthrough_shown && overlay.visibility.is_interactive(),
        }
    }
}

pub fn spawn_poi_marker(commands: &mut Commands, poi: Entity, overlay: &OverlayElement) -> Entity {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                max_width: Val::Px(TEXT_MAX_WIDTH),
                ..default()
            },
            Visibility::Hidden,
            OverlayClasses::default(),
            PoiMarker { poi },
            Name::new(overlay.selector.clone()),
        ))
        .with_children(|marker| {
            marker.spawn((
                Text::new(overlay.label.clone()),
                TextFont {
                    font_size: LABEL_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            marker.spawn((
                Text::new(overlay.text.clone()),
                TextFont {
                    font_size: TEXT_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE.with_alpha(0.0)),
                PoiMarkerText,
            ));
        })
        .id()
}

/// Mirror point of interest state onto the UI markers and the host page.
pub fn sync_poi_markers(
    compositor: Res<SceneCompositor>,
    points: Query<(&PointOfInterest, &PoiOverlay)>,
    mut markers: Query<(
        &PoiMarker,
        &mut Node,
        &mut Visibility,
        &mut OverlayClasses,
        &Children,
    )>,
    mut texts: Query<&mut TextColor, With<PoiMarkerText>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_update: Local<Option<serde_json::Value>>,
) {
    let walkthrough_shown = compositor.is_active(SceneSlot::Walkthrough);
    let mut updates = Vec::new();

    for (marker, mut node, mut visibility, mut classes, children) in &mut markers {
        let Ok((poi, overlay)) = points.get(marker.poi) else {
            continue;
        };

        let wanted = OverlayClasses::for_overlay(overlay, walkthrough_shown);
        if *classes != wanted {
            *classes = wanted;
        }
        let wanted_visibility = if wanted.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted_visibility {
            *visibility = wanted_visibility;
        }
        node.left = Val::Px(overlay.screen_position.x);
        node.top = Val::Px(overlay.screen_position.y);

        let mut marker_texts = texts.iter_many_mut(children);
        while let Some(mut colour) = marker_texts.fetch_next() {
            colour.0.set_alpha(overlay.text_opacity);
        }

        updates.push(serde_json::json!({
            "selector": poi.selector,
            "x": overlay.screen_position.x,
            "y": overlay.screen_position.y,
            "visible": wanted.visible,
            "interactive": wanted.interactive,
            "opacity": overlay.text_opacity
        }));
    }

    if updates.is_empty() {
        return;
    }
    let update = serde_json::Value::Array(updates);
    if last_update.as_ref() == Some(&update) {
        return;
    }
    rpc_interface.send_notification("overlay_update", update.clone());
    *last_update = Some(update);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::visibility::points_of_interest::PoiVisibility;
    use bevy::ecs::system::RunSystemOnce;
    use constants::visibility::OVERLAY_OPEN_OPACITY;

    fn setup(world: &mut World, visibility: PoiVisibility) -> Entity {
        world.init_resource::<SceneCompositor>();
        world.init_resource::<WebRpcInterface>();

        let poi = world
            .spawn((
                PointOfInterest {
                    id: "desk".to_string(),
                    selector: "#desk".to_string(),
                    position: Vec3::ZERO,
                },
                PoiOverlay {
                    visibility,
                    screen_position: Vec2::new(320.0, 180.0),
                    text_opacity: OVERLAY_OPEN_OPACITY,
                },
            ))
            .id();

        let overlay = OverlayElement {
            selector: "#desk".to_string(),
            label: "Desk".to_string(),
            text: "Where the work happens.".to_string(),
        };
        world
            .run_system_once(move |mut commands: Commands| {
                spawn_poi_marker(&mut commands, poi, &overlay)
            })
            .expect("marker spawns")
    }

    fn text_alpha(world: &mut World) -> f32 {
        let mut texts = world.query_filtered::<&TextColor, With<PoiMarkerText>>();
        texts.single(world).expect("one marker text").0.alpha()
    }

    #[test]
    fn classes_follow_visibility() {
        let overlay = PoiOverlay {
            visibility: PoiVisibility::Interactive,
            ..default()
        };
        assert_eq!(
            OverlayClasses::for_overlay(&overlay, true),
            OverlayClasses {
                visible: true,
                interactive: true
            }
        );
        assert_eq!(
            OverlayClasses::for_overlay(&overlay, false),
            OverlayClasses::default()
        );

        let hidden = PoiOverlay::default();
        assert_eq!(
            OverlayClasses::for_overlay(&hidden, true),
            OverlayClasses::default()
        );
    }

    #[test]
    fn markers_track_interactive_points_in_the_walkthrough() {
        let mut world = World::new();
        let marker = setup(&mut world, PoiVisibility::Interactive);
        world
            .resource_mut::<SceneCompositor>()
            .activate(SceneSlot::Walkthrough);

        let sync = world.register_system(sync_poi_markers);
        world.run_system(sync).expect("sync runs");

        let node = world.get::<Node>(marker).unwrap();
        assert_eq!(node.left, Val::Px(320.0));
        assert_eq!(node.top, Val::Px(180.0));
        assert_eq!(world.get::<Visibility>(marker), Some(&Visibility::Inherited));
        assert_eq!(
            world.get::<OverlayClasses>(marker),
            Some(&OverlayClasses {
                visible: true,
                interactive: true
            })
        );
        assert_eq!(text_alpha(&mut world), OVERLAY_OPEN_OPACITY);
        assert_eq!(world.resource::<WebRpcInterface>().pending_notifications(), 1);

        world.run_system(sync).expect("sync runs");
        assert_eq!(world.resource::<WebRpcInterface>().pending_notifications(), 1);
    }

    #[test]
    fn markers_hide_outside_the_walkthrough() {
        let mut world = World::new();
        let marker = setup(&mut world, PoiVisibility::Interactive);

        world.run_system_once(sync_poi_markers).expect("sync runs");

        assert_eq!(world.get::<Visibility>(marker), Some(&Visibility::Hidden));
        assert_eq!(
            world.get::<OverlayClasses>(marker),
            Some(&OverlayClasses::default())
        );
    }
}
