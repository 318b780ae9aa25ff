mod common;

use common::{default_scene, tray_scene, TRAY_SLOT};
use physics::glam::Vec3;
use physics::{
    quat_from_euler_zyx, AttractorAxes, AttractorProperties, Color, CpuSim, DofDriveMode, PhysicsBackend,
    SimParams, SimState, Transform,
};

fn drive_knee(scene: &mut common::Scene) {
    for &env in &scene.envs {
        let mut props = scene.sim.actor_dof_properties(env, TRAY_SLOT).unwrap();
        props[1].drive_mode = DofDriveMode::Position;
        props[1].stiffness = 4000.0;
        props[1].damping = 100.0;
        scene.sim.set_actor_dof_properties(env, TRAY_SLOT, &props).unwrap();
    }
}

#[test]
fn position_drive_tracks_its_target() {
    let mut scene = default_scene("track", 2, Vec3::new(0.0, 0.0, 1.0));
    drive_knee(&mut scene);
    scene.sim.prepare().unwrap();
    scene.sim.set_dof_position_targets(&[0.0, 0.4, 0.0, -0.2]).unwrap();
    for _ in 0..300 {
        scene.sim.simulate().unwrap();
    }
    let mut state = SimState::new(2, 2, 2, 3);
    scene.sim.refresh(&mut state).unwrap();
    assert!((state.dof(0, 1).pos - 0.4).abs() < 1e-3);
    assert!((state.dof(1, 1).pos + 0.2).abs() < 1e-3);
    // hip has no drive and no velocity, so it stays put
    assert_eq!(state.dof(0, 0).pos, 0.0);
}

#[test]
fn position_drive_stops_at_the_joint_limit() {
    let mut scene = default_scene("limit", 1, Vec3::new(0.0, 0.0, 1.0));
    drive_knee(&mut scene);
    scene.sim.prepare().unwrap();
    scene.sim.set_dof_position_targets(&[0.0, -3.0]).unwrap();
    for _ in 0..300 {
        scene.sim.simulate().unwrap();
    }
    let mut state = SimState::new(1, 2, 2, 3);
    scene.sim.refresh(&mut state).unwrap();
    assert!((state.dof(0, 1).pos + 70f32.to_radians()).abs() < 1e-6);
    assert_eq!(state.dof(0, 1).vel, 0.0);
}

#[test]
fn target_length_must_match_the_dof_count() {
    let mut scene = default_scene("targets", 1, Vec3::Z);
    scene.sim.prepare().unwrap();
    assert!(scene.sim.set_dof_position_targets(&[0.0; 3]).is_err());
}

#[test]
fn attractor_pins_passive_dofs() {
    let mut scene = default_scene("pin", 1, Vec3::new(0.0, 0.0, 1.0));
    let env = scene.envs[0];
    let lower = scene.sim.find_actor_rigid_body_handle(env, TRAY_SLOT, "lower").unwrap();
    let props = AttractorProperties {
        rigid_handle: lower,
        target: Transform::from_translation(Vec3::new(0.3, 0.0, 0.0)),
        offset: Transform::IDENTITY,
        stiffness: 5e7,
        damping: 5e3,
        axes: AttractorAxes::Translation,
    };
    scene.sim.create_rigid_body_attractor(env, &props).unwrap();
    scene.sim.prepare().unwrap();
    assert_eq!(scene.sim.attractors().len(), 1);

    let mut state = SimState::new(1, 2, 2, 3);
    scene.sim.refresh(&mut state).unwrap();
    state.dof_mut(0, 0).vel = 3.0;
    scene.sim.set_dof_state_indexed(&state, &[0]).unwrap();
    scene.sim.simulate().unwrap();
    scene.sim.refresh(&mut state).unwrap();
    assert_eq!(*state.dof(0, 0), physics::DofState::default());
}

#[test]
fn viewer_records_axes_at_body_poses() {
    let mut scene = tray_scene(
        "viewer",
        2,
        Vec3::new(0.0, 0.0, 1.0),
        CpuSim::with_viewer(SimParams::default()),
    );
    scene.sim.set_rigid_body_color(scene.envs[1], TRAY_SLOT, 0, Color::rgb(0.48, 0.65, 0.8)).unwrap();
    scene.sim.prepare().unwrap();
    assert!(scene.sim.has_viewer());

    let env = scene.envs[1];
    let tray = scene.sim.find_actor_rigid_body_handle(env, TRAY_SLOT, "tray").unwrap();
    assert_eq!(scene.sim.body_color(env, tray), Some(Color::rgb(0.48, 0.65, 0.8)));
    let pose = scene.sim.rigid_transform(env, tray).unwrap();
    // one env per row, so the second env sits one spacing along y
    assert!((pose.p - Vec3::new(0.0, 2.0, common::TRAY_Z)).length() < 1e-6);

    scene.sim.draw_axes(env, &pose, 0.2);
    assert_eq!(scene.sim.lines().len(), 3);
    assert!((scene.sim.lines()[2].to - (pose.p + Vec3::Z * 0.2)).length() < 1e-6);
    scene.sim.clear_lines();
    assert!(scene.sim.lines().is_empty());

    // axes follow the body rotation
    let turned = Transform::new(pose.p, quat_from_euler_zyx(0.0, 0.0, std::f32::consts::FRAC_PI_2));
    scene.sim.draw_axes(env, &turned, 0.2);
    let lines = scene.sim.lines();
    assert!((lines[0].from - pose.p).length() < 1e-6);
    assert!((lines[0].to - (pose.p + Vec3::Y * 0.2)).length() < 1e-6);
    assert!((lines[1].to - (pose.p - Vec3::X * 0.2)).length() < 1e-6);
}
