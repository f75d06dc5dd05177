use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use constants::movement::{
    GRAVITY, GROUND_PROBE_DISTANCE, MAX_FRAME_DELTA, MOVE_ACCELERATION,
    MOVEMENT_TIME_SCALE, VELOCITY_DAMPING,
};

use crate::engine::camera::look_controller::{move_forward, move_right};
use crate::engine::movement::input::MovementInput;
use crate::engine::scene::walkthrough::Collidable;

/// Velocity of the walkthrough player. The pose itself is the camera transform.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PlayerMotion {
    pub velocity: Vec3,
}

/// Displacement produced by one integration step, expressed in the look
/// controller's move primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    pub right: f32,
    pub forward: f32,
    pub up: f32,
}

/// Advance the player velocity by `delta` (scaled seconds) and return the
/// displacement to apply.
///
/// Velocity is a decelerating quantity here: input pushes it negative and the
/// step negates it again, so forward input ends up as positive forward motion.
pub fn integrate(
    motion: &mut PlayerMotion,
    input: &MovementInput,
    delta: f32,
    on_ground: bool,
) -> MotionStep {
    let delta = delta.max(0.0);
    let velocity = &mut motion.velocity;

    let damping = (VELOCITY_DAMPING * delta).min(1.0);
    velocity.x -= velocity.x * damping;
    velocity.z -= velocity.z * damping;

    velocity.y -= GRAVITY * delta;

    let direction = input.direction().normalize_or_zero();
    if input.any_longitudinal() {
        velocity.z -= direction.z * MOVE_ACCELERATION * delta;
    }
    if input.any_lateral() {
        velocity.x -= direction.x * MOVE_ACCELERATION * delta;
    }

    if on_ground {
        velocity.y = velocity.y.max(0.0);
    }

    MotionStep {
        right: -velocity.x * delta,
        forward: -velocity.z * delta,
        up: velocity.y * delta,
    }
}

pub fn apply_step(transform: &mut Transform, step: MotionStep) {
    move_right(transform, step.right);
    move_forward(transform, step.forward);
    transform.translation.y += step.up;
}

/// Downward probe from the eye; anything within eye height (plus tolerance) is underfoot.
pub fn ground_probe_ray(position: Vec3) -> Ray3d {
    Ray3d::new(position, Dir3::NEG_Y)
}

pub fn is_grounded(nearest_hit: Option<f32>) -> bool {
    matches!(nearest_hit, Some(distance) if distance <= GROUND_PROBE_DISTANCE)
}

/// Per-frame movement hook of the walkthrough slot.
pub fn move_player(
    time: Res<Time>,
    input: Res<MovementInput>,
    mut players: Query<(&mut Transform, &mut PlayerMotion)>,
    collidables: Query<(), With<Collidable>>,
    mut ray_cast: MeshRayCast,
) {
    let delta = time.delta_secs().min(MAX_FRAME_DELTA) * MOVEMENT_TIME_SCALE;

    for (mut transform, mut motion) in &mut players {
        let on_ground = if collidables.is_empty() {
            false
        } else {
            let filter = |entity: Entity| collidables.contains(entity);
            let settings = MeshRayCastSettings::default()
                .with_filter(&filter)
                .with_visibility(RayCastVisibility::Any);
            let nearest_hit = ray_cast
                .cast_ray(ground_probe_ray(transform.translation), &settings)
                .iter()
                .map(|(_, hit)| hit.distance)
                .min_by(f32::total_cmp);
            is_grounded(nearest_hit)
        };

        let step = integrate(&mut motion, &input, delta, on_ground);
        apply_step(&mut transform, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::render::mesh::MeshAabb;
    use constants::transition::WALKTHROUGH_RESTING_POSITION;
    use std::time::Duration;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn idle_player_without_ground_falls_straight_down() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        let mut motion = PlayerMotion::default();
        let input = MovementInput::default();

        let mut last_y = transform.translation.y;
        for _ in 0..120 {
            let step = integrate(&mut motion, &input, FRAME, false);
            apply_step(&mut transform, step);

            assert!(transform.translation.y < last_y);
            assert_eq!(transform.translation.x, 0.0);
            assert_eq!(transform.translation.z, 0.0);
            last_y = transform.translation.y;
        }
    }

    #[test]
    fn horizontal_velocity_decays_for_any_delta() {
        let input = MovementInput::default();
        for delta in [0.0, 0.001, FRAME, 0.05, 0.1, 0.5, 2.0] {
            let mut motion = PlayerMotion {
                velocity: Vec3::new(5.0, 0.0, -3.0),
            };
            let mut previous = motion.velocity;
            for _ in 0..50 {
                integrate(&mut motion, &input, delta, false);
                let v = motion.velocity;
                assert!(v.x.abs() <= previous.x.abs(), "delta {delta}");
                assert!(v.z.abs() <= previous.z.abs(), "delta {delta}");
                assert!(v.x >= 0.0 && v.z <= 0.0, "sign flipped at delta {delta}");
                assert!(v.y <= previous.y, "delta {delta}");
                previous = v;
            }
        }
    }

    #[test]
    fn diagonal_input_is_not_faster_than_straight_input() {
        let straight = MovementInput {
            forward: true,
            ..default()
        };
        let diagonal = MovementInput {
            forward: true,
            right: true,
            ..default()
        };

        let mut a = PlayerMotion::default();
        let mut b = PlayerMotion::default();
        integrate(&mut a, &straight, FRAME, true);
        integrate(&mut b, &diagonal, FRAME, true);

        let horizontal = |v: Vec3| Vec2::new(v.x, v.z).length();
        assert!((horizontal(a.velocity) - horizontal(b.velocity)).abs() < 1e-6);
        assert!((b.velocity.x - b.velocity.z).abs() < 1e-6);
    }

    #[test]
    fn forward_input_moves_toward_facing_direction() {
        let mut transform = Transform::default();
        let mut motion = PlayerMotion::default();
        let input = MovementInput {
            forward: true,
            ..default()
        };

        for _ in 0..10 {
            let step = integrate(&mut motion, &input, FRAME, true);
            assert!(step.forward > 0.0);
            apply_step(&mut transform, step);
        }
        assert!(transform.translation.z < 0.0);
        assert_eq!(transform.translation.x, 0.0);
    }

    #[test]
    fn ground_contact_stops_falling_without_snapping() {
        let mut transform = Transform::from_xyz(0.0, 3.0, 0.0);
        let mut motion = PlayerMotion {
            velocity: Vec3::new(0.0, -50.0, 0.0),
        };

        let step = integrate(&mut motion, &MovementInput::default(), FRAME, true);
        apply_step(&mut transform, step);

        assert_eq!(motion.velocity.y, 0.0);
        assert_eq!(transform.translation.y, 3.0);
    }

    #[test]
    fn ground_probe_respects_max_distance() {
        assert!(!is_grounded(None));
        assert!(is_grounded(Some(GROUND_PROBE_DISTANCE)));
        assert!(!is_grounded(Some(GROUND_PROBE_DISTANCE + 0.5)));

        let ray = ground_probe_ray(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(*ray.direction, Vec3::NEG_Y);
    }

    #[test]
    fn player_at_eye_height_stands_on_the_floor() {
        let mut transform = Transform::from_translation(WALKTHROUGH_RESTING_POSITION);
        let mut motion = PlayerMotion::default();
        let input = MovementInput::default();
        let floor = InfinitePlane3d::new(Vec3::Y);

        for _ in 0..60 {
            let ray = ground_probe_ray(transform.translation);
            let nearest_hit = ray.intersect_plane(Vec3::ZERO, floor);
            assert!(is_grounded(nearest_hit));

            let step = integrate(&mut motion, &input, FRAME * MOVEMENT_TIME_SCALE, true);
            apply_step(&mut transform, step);
        }
        assert_eq!(transform.translation, WALKTHROUGH_RESTING_POSITION);
    }

    fn walkthrough_world() -> (World, Entity) {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<MovementInput>();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs_f32(FRAME));
        world.insert_resource(time);

        let player = world
            .spawn((
                Transform::from_translation(WALKTHROUGH_RESTING_POSITION),
                PlayerMotion::default(),
            ))
            .id();
        (world, player)
    }

    /// A 20 x 0.2 x 20 slab whose top face lies at y = 0.
    fn spawn_floor(world: &mut World) -> Entity {
        let centre = Vec3::new(0.0, -0.1, 0.0);
        let mesh = Mesh::from(Cuboid::new(20.0, 0.2, 20.0));
        let aabb = mesh.compute_aabb().expect("cuboid has positions");
        let handle = world.resource_mut::<Assets<Mesh>>().add(mesh);
        world
            .spawn((
                Mesh3d(handle),
                Transform::from_translation(centre),
                GlobalTransform::from_translation(centre),
                aabb,
            ))
            .id()
    }

    fn run_frames(world: &mut World, player: Entity, frames: usize) -> Vec3 {
        for _ in 0..frames {
            world.run_system_once(move_player).expect("movement runs");
        }
        world.get::<Transform>(player).expect("player pose").translation
    }

    #[test]
    fn collidable_floor_holds_the_player_at_rest() {
        let (mut world, player) = walkthrough_world();
        let floor = spawn_floor(&mut world);
        world.entity_mut(floor).insert(Collidable);

        let position = run_frames(&mut world, player, 60);
        assert_eq!(position, WALKTHROUGH_RESTING_POSITION);
        assert_eq!(world.get::<PlayerMotion>(player).map(|m| m.velocity.y), Some(0.0));
    }

    #[test]
    fn floor_outside_the_collidable_set_is_fallen_through() {
        let (mut world, player) = walkthrough_world();
        spawn_floor(&mut world);

        let position = run_frames(&mut world, player, 30);
        assert!(position.y < 0.0);
    }

    #[test]
    fn empty_collidable_set_falls_indefinitely() {
        let (mut world, player) = walkthrough_world();

        let first = run_frames(&mut world, player, 10);
        let later = run_frames(&mut world, player, 10);
        assert!(first.y < WALKTHROUGH_RESTING_POSITION.y);
        assert!(later.y < first.y);
    }
}
