use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use bevy::render::camera::CameraProjection;
use bevy::render::primitives::Frustum;
use bevy::window::PrimaryWindow;
use constants::render_settings::CAMERA_FAR;
use constants::visibility::INTERACTION_RANGE;

use crate::engine::scene::walkthrough::{Occluder, WalkthroughPlayer};
use crate::engine::visibility::points_of_interest::{PoiOverlay, PoiVisibility, PointOfInterest};

/// Camera view and projection captured once per frame.
pub struct ViewerProjection {
    position: Vec3,
    clip_from_world: Mat4,
    frustum: Frustum,
}

impl ViewerProjection {
    pub fn new(clip_from_view: Mat4, world_from_view: Mat4, far: f32) -> Self {
        let clip_from_world = clip_from_view * world_from_view.inverse();
        let position = world_from_view.w_axis.truncate();
        let backward = world_from_view.z_axis.truncate().normalize_or_zero();
        let frustum =
            Frustum::from_clip_from_world_custom_far(&clip_from_world, &position, &backward, far);

        Self {
            position,
            clip_from_world,
            frustum,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Normalised device coordinates of a world point.
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.clip_from_world.project_point3(point)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let point = point.extend(1.0);
        !self
            .frustum
            .half_spaces
            .iter()
            .any(|half_space| half_space.normal_d().dot(point) < 0.0)
    }

    pub fn probe(&self, point: Vec3) -> PoiProbe {
        PoiProbe {
            ndc: self.project(point),
            distance: point.distance(self.position),
            in_frustum: self.contains(point),
        }
    }
}

/// Geometric facts about one point for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PoiProbe {
    pub ndc: Vec3,
    pub distance: f32,
    pub in_frustum: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub visibility: PoiVisibility,
    /// Out of range or out of view: the overlay text must be closed as well.
    pub close_overlay: bool,
}

/// Classify a point. Range is checked first, then framing; the occlusion ray is
/// only cast when both pass. A hit at exactly the point's distance obstructs it.
pub fn resolve(
    probe: &PoiProbe,
    range: f32,
    nearest_occluder: impl FnOnce() -> Option<f32>,
) -> Resolution {
    if probe.distance >= range || !probe.in_frustum {
        return Resolution {
            visibility: PoiVisibility::Hidden,
            close_overlay: true,
        };
    }

    let unobstructed = match nearest_occluder() {
        None => true,
        Some(hit_distance) => hit_distance > probe.distance,
    };

    let visibility = if unobstructed {
        PoiVisibility::Interactive
    } else {
        PoiVisibility::Hidden
    };

    Resolution {
        visibility,
        close_overlay: false,
    }
}

/// Map NDC to a top-left based pixel offset inside `viewport`.
pub fn ndc_to_screen(ndc: Vec3, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (-ndc.y * 0.5 + 0.5) * viewport.y,
    )
}

fn nearest_occluder_distance(
    ray_cast: &mut MeshRayCast,
    from: Vec3,
    to: Vec3,
    settings: &MeshRayCastSettings,
) -> Option<f32> {
    let direction = Dir3::new(to - from).ok()?;
    ray_cast
        .cast_ray(Ray3d::new(from, direction), settings)
        .iter()
        .map(|(_, hit)| hit.distance)
        .min_by(f32::total_cmp)
}

/// Per-frame visibility pass over every point of interest.
pub fn resolve_points_of_interest(
    cameras: Query<(&Projection, &Transform), With<WalkthroughPlayer>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut points: Query<(&PointOfInterest, &mut PoiOverlay)>,
    occluders: Query<(), With<Occluder>>,
    mut ray_cast: MeshRayCast,
) {
    let Ok((projection, transform)) = cameras.single() else {
        return;
    };
    let viewport = windows
        .single()
        .map(|window| window.size())
        .unwrap_or(Vec2::ONE);

    let viewer = ViewerProjection::new(
        projection.get_clip_from_view(),
        transform.compute_matrix(),
        CAMERA_FAR,
    );

    let filter = |entity: Entity| occluders.contains(entity);
    let settings = MeshRayCastSettings::default()
        .with_filter(&filter)
        .with_visibility(RayCastVisibility::Any)
        .never_early_exit();

    for (poi, mut overlay) in &mut points {
        let probe = viewer.probe(poi.position);
        let resolution = resolve(&probe, INTERACTION_RANGE, || {
            nearest_occluder_distance(&mut ray_cast, viewer.position(), poi.position, &settings)
        });
        overlay.apply(resolution, ndc_to_screen(probe.ndc, viewport));
    }
}
