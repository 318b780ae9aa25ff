//! Scene population: one bot and one ball per env.

use std::path::Path;

use glam::Vec3;
use physics::{
    ActorHandle, AssetOptions, AttractorAxes, AttractorProperties, Color, DofDriveMode, EnvHandle,
    PhysicsBackend, RigidBodyHandle, Transform,
};

use super::asset::{write_balance_bot, BotGeometry, ASSET_FILE};
use super::joints::Leg;
use super::{BALL_RADIUS, DOFS_PER_ENV};
use crate::error::{Result, TaskError};

const ACTUATED_STIFFNESS: f32 = 4000.0;
const ACTUATED_DAMPING: f32 = 100.0;
const ATTRACTOR_STIFFNESS: f32 = 5e7;
const ATTRACTOR_DAMPING: f32 = 5e3;
const BALL_DENSITY: f32 = 200.0;
const BALL_START: Vec3 = Vec3::new(0.2, 0.0, 2.0);

const BALL_COLOR: Color = Color::rgb(0.99, 0.66, 0.25);
const TRAY_COLOR: Color = Color::rgb(0.48, 0.65, 0.8);
const LEG_COLOR: Color = Color::rgb(0.15, 0.2, 0.3);

/// Handles of one populated env.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvActors {
    pub env: EnvHandle,
    pub bot: ActorHandle,
    pub ball: ActorHandle,
    /// Upper leg bodies in [`Leg::ALL`] order, drawn by the debug viewer.
    pub upper_legs: Vec<RigidBodyHandle>,
}

/// Everything the task keeps from scene construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    pub envs: Vec<EnvActors>,
    /// Bot DOF `(lower, upper)` limits in DOF order.
    pub dof_limits: Vec<(f32, f32)>,
}

fn body_handle<B: PhysicsBackend>(sim: &B, env: EnvHandle, actor: ActorHandle, name: &str) -> Result<RigidBodyHandle> {
    sim.find_actor_rigid_body_handle(env, actor, name).ok_or_else(|| TaskError::MissingBody(name.to_string()))
}

/// Each env collides only with itself.
fn collision_group(env: usize) -> Result<i32> {
    i32::try_from(env).map_err(|_| TaskError::ShapeMismatch(format!("env {env} exceeds the collision group range")))
}

/// Write the bot asset to `asset_dir`, load it and the ball, and create
/// `num_envs` envs of `[bot, ball]`.
///
/// # Errors
///
/// Propagates asset writing and backend failures, reports a missing named
/// body as [`TaskError::MissingBody`] and an env count past the collision
/// group range as [`TaskError::ShapeMismatch`].
pub fn populate<B: PhysicsBackend>(
    sim: &mut B,
    asset_dir: &Path,
    geometry: &BotGeometry,
    num_envs: usize,
    spacing: f32,
    num_per_row: usize,
) -> Result<Population> {
    let lower = Vec3::new(-spacing, -spacing, 0.0);
    let upper = Vec3::splat(spacing);

    write_balance_bot(asset_dir, geometry)?;
    let bot_options = AssetOptions { fix_base_link: false, slices_per_cylinder: 40, ..AssetOptions::default() };
    let bot_asset = sim.load_asset(asset_dir, ASSET_FILE, &bot_options)?;

    let dof_props = sim.asset_dof_properties(bot_asset)?;
    if dof_props.len() != DOFS_PER_ENV {
        return Err(TaskError::ShapeMismatch(format!(
            "bot asset has {} dofs, expected {DOFS_PER_ENV}",
            dof_props.len()
        )));
    }
    let dof_limits = dof_props.iter().map(|p| (p.lower, p.upper)).collect();

    let bot_pose = Transform::from_translation(Vec3::new(0.0, 0.0, geometry.tray_height));

    let tray = sim.find_asset_rigid_body_index(bot_asset, "tray").ok_or_else(|| TaskError::MissingBody("tray".into()))?;
    for leg in Leg::ALL {
        let (sin, cos) = leg.angle().sin_cos();
        let mount = Vec3::new(geometry.leg_outer_offset * cos, geometry.leg_outer_offset * sin, 0.0);
        sim.create_asset_force_sensor(bot_asset, tray, Transform::from_translation(mount))?;
    }

    let ball_options = AssetOptions { density: BALL_DENSITY, ..AssetOptions::default() };
    let ball_asset = sim.create_sphere(BALL_RADIUS, &ball_options);
    let ball_pose = Transform::from_translation(BALL_START);

    let mut envs = Vec::with_capacity(num_envs);
    for i in 0..num_envs {
        let env = sim.create_env(lower, upper, num_per_row);
        let group = collision_group(i)?;
        let bot = sim.create_actor(env, bot_asset, bot_pose, "bot", group, 0)?;
        let ball = sim.create_actor(env, ball_asset, ball_pose, "ball", group, 0)?;

        let mut props = sim.actor_dof_properties(env, bot)?;
        for leg in Leg::ALL {
            let actuated = &mut props[leg.actuated_dof()];
            actuated.drive_mode = DofDriveMode::Position;
            actuated.stiffness = ACTUATED_STIFFNESS;
            actuated.damping = ACTUATED_DAMPING;
            let passive = &mut props[leg.passive_dof()];
            passive.drive_mode = DofDriveMode::None;
            passive.stiffness = 0.0;
            passive.damping = 0.0;
        }
        sim.set_actor_dof_properties(env, bot, &props)?;

        // hold each foot where the extended leg touches the ground
        for leg in Leg::ALL {
            let (sin, cos) = leg.angle().sin_cos();
            let attractor = AttractorProperties {
                rigid_handle: body_handle(sim, env, bot, &leg.lower_body_name())?,
                target: Transform::from_translation(Vec3::new(
                    geometry.leg_outer_offset * cos,
                    geometry.leg_outer_offset * sin,
                    geometry.leg_radius,
                )),
                offset: Transform::from_translation(Vec3::new(0.0, 0.0, 0.5 * geometry.leg_length)),
                stiffness: ATTRACTOR_STIFFNESS,
                damping: ATTRACTOR_DAMPING,
                axes: AttractorAxes::Translation,
            };
            sim.create_rigid_body_attractor(env, &attractor)?;
        }

        sim.set_rigid_body_color(env, ball, 0, BALL_COLOR)?;
        sim.set_rigid_body_color(env, bot, 0, TRAY_COLOR)?;
        for body in 1..=2 * Leg::COUNT {
            sim.set_rigid_body_color(env, bot, body, LEG_COLOR)?;
        }

        let upper_legs =
            Leg::ALL.iter().map(|leg| body_handle(sim, env, bot, &leg.upper_body_name())).collect::<Result<_>>()?;
        envs.push(EnvActors { env, bot, ball, upper_legs });
    }

    tracing::info!(
        "populated {} envs with {} bot dofs, tray height {:.4}",
        num_envs,
        dof_props.len(),
        geometry.tray_height
    );
    Ok(Population { envs, dof_limits })
}
