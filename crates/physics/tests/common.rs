#![allow(dead_code)]

use std::path::PathBuf;

use mjcf::{Body, Geom, GeomKind, Joint, MjcfModel};
use physics::glam::Vec3;
use physics::{
    ActorHandle, AssetHandle, AssetOptions, CpuSim, EnvHandle, PhysicsBackend, SimParams, Transform,
};

pub const TRAY_RADIUS: f32 = 0.5;
pub const TRAY_HALF_THICKNESS: f32 = 0.01;
pub const TRAY_Z: f32 = 0.5;
pub const BALL_RADIUS: f32 = 0.1;

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("physics-tests-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A tray on one folded leg: passive hinge at the hip (dof 0), driven hinge at
/// the knee (dof 1).
pub fn tray_model() -> MjcfModel {
    let mut model = MjcfModel::new("Tray");
    let mut tray = Body::new("tray", [0.0, 0.0, 0.0]);
    tray.push_joint(Joint::free("root_joint"))
        .push_geom(Geom::new(GeomKind::Cylinder, &[TRAY_RADIUS, TRAY_HALF_THICKNESS]).with_density(100.0));

    let mut upper = Body::new("upper", [0.3, 0.0, -0.1]);
    upper
        .push_joint(Joint::hinge("hip", [0.0, 0.0, 0.1], [0.0, 1.0, 0.0]).with_range(-45.0, 45.0))
        .push_geom(Geom::new(GeomKind::Capsule, &[0.02, 0.1]));
    let mut lower = Body::new("lower", [0.0, 0.0, -0.2]);
    lower
        .push_joint(Joint::hinge("knee", [0.0, 0.0, 0.1], [0.0, 1.0, 0.0]).with_range(-70.0, 90.0))
        .push_geom(Geom::new(GeomKind::Capsule, &[0.02, 0.1]));
    upper.push_body(lower);
    tray.push_body(upper);
    model.worldbody.push(tray);
    model
}

pub struct Scene {
    pub sim: CpuSim,
    pub tray: AssetHandle,
    pub ball: AssetHandle,
    pub envs: Vec<EnvHandle>,
}

pub const TRAY_SLOT: ActorHandle = ActorHandle(0);
pub const BALL_SLOT: ActorHandle = ActorHandle(1);

/// `num_envs` envs, each with a tray (three sensors) and a ball dropped from
/// `ball_pos`. Not prepared yet.
pub fn tray_scene(name: &str, num_envs: usize, ball_pos: Vec3, sim: CpuSim) -> Scene {
    let mut sim = sim;
    let dir = scratch_dir(name);
    tray_model().write_to_file(&dir.join("tray.xml")).unwrap();

    sim.add_ground(Vec3::Z);
    let tray = sim.load_asset(&dir, "tray.xml", &AssetOptions::default()).unwrap();
    for k in 0..3 {
        let angle = k as f32 * 2.0 * std::f32::consts::PI / 3.0;
        let at = Vec3::new(0.4 * angle.cos(), 0.4 * angle.sin(), 0.0);
        sim.create_asset_force_sensor(tray, 0, Transform::from_translation(at)).unwrap();
    }
    let ball = sim.create_sphere(BALL_RADIUS, &AssetOptions { density: 200.0, ..AssetOptions::default() });

    let per_row = (num_envs as f32).sqrt() as usize;
    let mut envs = Vec::new();
    for _ in 0..num_envs {
        let env = sim.create_env(Vec3::splat(-1.0), Vec3::splat(1.0), per_row);
        sim.create_actor(env, tray, Transform::from_translation(Vec3::new(0.0, 0.0, TRAY_Z)), "tray", 0, 0)
            .unwrap();
        sim.create_actor(env, ball, Transform::from_translation(ball_pos), "ball", 0, 0).unwrap();
        envs.push(env);
    }
    Scene { sim, tray, ball, envs }
}

pub fn default_scene(name: &str, num_envs: usize, ball_pos: Vec3) -> Scene {
    tray_scene(name, num_envs, ball_pos, CpuSim::new(SimParams { dt: 0.01, substeps: 1, ..SimParams::default() }))
}

pub fn ball_mass() -> f32 {
    200.0 * 4.0 / 3.0 * std::f32::consts::PI * BALL_RADIUS.powi(3)
}
