mod common;

use common::{ball_mass, default_scene, BALL_RADIUS, TRAY_HALF_THICKNESS, TRAY_Z};
use physics::glam::Vec3;
use physics::{PhysicsBackend, SimState};

fn settle(sim: &mut physics::CpuSim, steps: usize) -> SimState {
    for _ in 0..steps {
        sim.simulate().unwrap();
    }
    let mut state = SimState::new(sim.num_envs(), 2, 2, 3);
    sim.refresh(&mut state).unwrap();
    state
}

#[test]
fn ball_comes_to_rest_on_the_tray() {
    let mut scene = default_scene("rest", 1, Vec3::new(0.0, 0.0, 1.0));
    scene.sim.prepare().unwrap();
    let state = settle(&mut scene.sim, 400);

    let ball = state.root(0, 1);
    let resting = TRAY_Z + TRAY_HALF_THICKNESS + BALL_RADIUS;
    assert!((ball.pos[2] - resting).abs() < 1e-3, "ball at {:?}", ball.pos);
    assert!(Vec3::from(ball.lin_vel).length() < 1e-3);
    assert_eq!(state.root(0, 0).pos, [0.0, 0.0, TRAY_Z]);
}

#[test]
fn centered_ball_load_is_shared_by_the_sensors() {
    let mut scene = default_scene("load-share", 1, Vec3::new(0.0, 0.0, 1.0));
    scene.sim.prepare().unwrap();
    let state = settle(&mut scene.sim, 400);

    let weight = ball_mass() * 9.81;
    let total: f32 = (0..3).map(|k| state.sensor(0, k).force[2]).sum();
    assert!((total + weight).abs() < 1e-3 * weight.max(1.0), "total load {total}, weight {weight}");
    for k in 0..3 {
        let reading = state.sensor(0, k);
        assert!((reading.force[2] + weight / 3.0).abs() < 1e-3);
        assert!(Vec3::from(reading.torque).length() > 0.0);
    }
}

#[test]
fn ball_beside_the_tray_falls_to_the_ground() {
    let mut scene = default_scene("miss", 1, Vec3::new(2.0, 0.0, 1.0));
    scene.sim.prepare().unwrap();
    let state = settle(&mut scene.sim, 400);

    let ball = state.root(0, 1);
    assert!((ball.pos[2] - BALL_RADIUS).abs() < 1e-3, "ball at {:?}", ball.pos);
    assert!(state.sensors.iter().all(|s| s.force == [0.0; 3]));
}

#[test]
fn fast_ball_bounces_off_the_tray() {
    let mut scene = default_scene("bounce", 1, Vec3::new(0.0, 0.0, 0.7));
    scene.sim.prepare().unwrap();
    let mut state = SimState::new(1, 2, 2, 3);
    scene.sim.refresh(&mut state).unwrap();
    state.root_mut(0, 1).lin_vel = [0.0, 0.0, -5.0];
    let ball = state.actor_index(0, 1);
    scene.sim.set_actor_root_state_indexed(&state, &[ball]).unwrap();

    let mut went_up = false;
    for _ in 0..20 {
        scene.sim.simulate().unwrap();
        scene.sim.refresh(&mut state).unwrap();
        went_up |= state.root(0, 1).lin_vel[2] > 0.0;
    }
    assert!(went_up);
}
