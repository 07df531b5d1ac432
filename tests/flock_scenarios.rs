//! End-to-end flock scenarios driven through the public API.

use std::f32::consts::TAU;

use approx::assert_relative_eq;
use boids3d::boid::MAX_ROLL;
use boids3d::{Boid, ControlKey, Flock, KeySet, KeySnapshot, Role, SimulationParams, UpdateMode, FIXED_DT};
use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn empty_flock(mode: UpdateMode) -> Flock {
    let mut params = SimulationParams::default();
    params.update_mode = mode;
    Flock::with_seed(params, 7)
}

fn add_goal(flock: &mut Flock, position: Vec3) {
    let id = flock.add_boid(Boid::new(position).with_role(Role::Leader));
    assert!(flock.set_goal(id));
}

fn assert_finite(flock: &Flock) {
    for boid in flock.boids() {
        assert!(boid.position.is_finite(), "position {:?}", boid.position);
        assert!(boid.velocity.is_finite(), "velocity {:?}", boid.velocity);
        assert!(boid.roll.is_finite() && boid.anim_phase.is_finite());
    }
}

// Point within `radius` of the origin
fn point_in_ball(rng: &mut StdRng, radius: f32) -> Vec3 {
    loop {
        let p = vec3(
            rng.gen_range(-radius..radius),
            rng.gen_range(-radius..radius),
            rng.gen_range(-radius..radius),
        );
        if p.length() <= radius {
            return p;
        }
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(17)]
#[case(99)]
fn members_gather_around_a_stationary_goal(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut flock = empty_flock(UpdateMode::Sequential);
    // Radius 4 keeps every pair within 8 of each other and of the goal
    for _ in 0..5 {
        flock.add_boid(Boid::new(point_in_ball(&mut rng, 4.0)));
    }
    add_goal(&mut flock, Vec3::ZERO);

    for _ in 0..100 {
        flock.update(FIXED_DT);
    }

    assert_finite(&flock);
    let goal = flock.goal_boid().unwrap();
    assert_eq!(goal.position, Vec3::ZERO);
    for boid in flock.boids() {
        let distance = boid.position.distance(goal.position);
        assert!(distance <= 20.0, "boid strayed {distance} from the goal");
    }
}

#[rstest]
#[case(UpdateMode::Sequential)]
#[case(UpdateMode::Simultaneous)]
fn state_stays_in_range_under_steering(#[case] mode: UpdateMode) {
    let mut params = SimulationParams::default();
    params.update_mode = mode;
    let mut flock = Flock::with_seed(params, 2024);
    flock.populate();

    // Accelerate, then alternate hard turns and climbs
    let phases: [&[ControlKey]; 4] = [
        &[ControlKey::Accelerate],
        &[ControlKey::Accelerate, ControlKey::YawLeft],
        &[ControlKey::YawRight, ControlKey::PitchUp],
        &[ControlKey::PitchDown],
    ];
    let mut previous = KeySet::default();
    for tick in 0..800 {
        let current: KeySet = phases[(tick / 100) % phases.len()].iter().copied().collect();
        flock.handle_input(&KeySnapshot::new(current, previous));
        previous = current;
        flock.update(FIXED_DT);

        for boid in flock.boids() {
            assert!(boid.speed >= 0.0 && boid.speed <= boid.max_speed, "speed {}", boid.speed);
            assert!((0.0..TAU).contains(&boid.anim_phase), "phase {}", boid.anim_phase);
            assert!(boid.roll.abs() <= MAX_ROLL, "roll {}", boid.roll);
        }
    }
    assert_finite(&flock);

    let leader = flock.goal_boid().unwrap();
    assert!(leader.speed > 0.0);
    assert!((0.0..360.0).contains(&leader.yaw));
}

#[test]
fn coincident_boids_stay_finite() {
    let mut flock = empty_flock(UpdateMode::Sequential);
    flock.add_boid(Boid::new(vec3(1.0, 5.0, 1.0)));
    flock.add_boid(Boid::new(vec3(1.0, 5.0, 1.0)));
    add_goal(&mut flock, vec3(1.0, 5.0, 1.0));

    for _ in 0..50 {
        flock.update(FIXED_DT);
    }
    assert_finite(&flock);
}

#[rstest]
#[case(UpdateMode::Sequential)]
#[case(UpdateMode::Simultaneous)]
fn zero_dt_moves_nothing(#[case] mode: UpdateMode) {
    let mut params = SimulationParams::default();
    params.update_mode = mode;
    let mut flock = Flock::with_seed(params, 5);
    flock.populate();
    if let Some(goal) = flock.goal_boid_mut() {
        goal.speed = 10.0;
    }

    let before: Vec<Vec3> = flock.boids().map(|b| b.position).collect();
    flock.update(0.0);
    let after: Vec<Vec3> = flock.boids().map(|b| b.position).collect();
    assert_eq!(before, after);
}

#[test]
fn empty_flock_camera_looks_at_origin() {
    let mut flock = empty_flock(UpdateMode::Sequential);
    assert_eq!(flock.summary().centroid, Vec3::ZERO);

    for _ in 0..3000 {
        flock.update(FIXED_DT);
    }
    assert_relative_eq!(flock.camera().at.length(), 0.0, epsilon = 1e-3);
    assert_finite(&flock);
}

#[test]
fn removal_never_takes_the_goal() {
    let mut flock = empty_flock(UpdateMode::Sequential);
    assert!(flock.remove_boid().is_none());

    add_goal(&mut flock, Vec3::ZERO);
    assert!(flock.remove_boid().is_none());
    assert_eq!(flock.len(), 1);

    let member = flock.add_boid(Boid::new(vec3(3.0, 0.0, 0.0)));
    let removed = flock.remove_boid().unwrap();
    assert_eq!(removed.position, vec3(3.0, 0.0, 0.0));
    assert!(flock.get(member).is_none());
    assert!(flock.goal_boid().is_some());
}

#[test]
fn keyboard_edges_toggle_once_per_press() {
    let mut flock = empty_flock(UpdateMode::Sequential);
    flock.populate();
    let start = flock.len();

    let held: KeySet = [ControlKey::AddBoid, ControlKey::TogglePause].into_iter().collect();
    flock.handle_input(&KeySnapshot::new(held, KeySet::default()));
    // Still held on the next tick: no repeat
    flock.handle_input(&KeySnapshot::new(held, held));

    assert_eq!(flock.len(), start + 1);
    assert!(flock.is_paused());

    let positions: Vec<Vec3> = flock.boids().map(|b| b.position).collect();
    flock.update(FIXED_DT);
    let paused: Vec<Vec3> = flock.boids().map(|b| b.position).collect();
    assert_eq!(positions, paused);
    assert_eq!(flock.ticks(), 0);
}

#[test]
fn simultaneous_updates_ignore_insertion_order() {
    let spawns = [
        vec3(0.0, 5.0, 0.0),
        vec3(3.0, 6.0, 1.0),
        vec3(-2.0, 4.0, 2.0),
        vec3(1.0, 7.0, -3.0),
    ];

    let build = |order: &[usize]| {
        let mut flock = empty_flock(UpdateMode::Simultaneous);
        for &i in order {
            let mut boid = Boid::new(spawns[i]);
            boid.velocity = vec3(i as f32, 1.0, 2.0);
            flock.add_boid(boid);
        }
        add_goal(&mut flock, vec3(0.0, 10.0, 0.0));
        flock
    };

    let mut forward = build(&[0, 1, 2, 3]);
    let mut backward = build(&[3, 2, 1, 0]);
    for _ in 0..5 {
        forward.update(FIXED_DT);
        backward.update(FIXED_DT);
    }

    let a: Vec<Vec3> = forward.boids().map(|b| b.position).collect();
    let mut b: Vec<Vec3> = backward.boids().map(|b| b.position).collect();
    // Members were inserted reversed; the goal stays last
    b[..4].reverse();
    for (p, q) in a.iter().zip(&b) {
        assert_relative_eq!(p.x, q.x, epsilon = 1e-4);
        assert_relative_eq!(p.y, q.y, epsilon = 1e-4);
        assert_relative_eq!(p.z, q.z, epsilon = 1e-4);
    }
}
