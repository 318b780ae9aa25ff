//! Procedural MJCF description of the balance bot: a free tray carrying three
//! two-segment legs folded at 45 degrees.

use std::f32::consts::{PI, SQRT_2};
use std::path::{Path, PathBuf};

use glam::Vec3;
use mjcf::{Body, Compiler, Geom, GeomKind, Joint, MjcfModel};
use physics::quat_from_euler_zyx;

use super::joints::Leg;
use crate::error::Result;

pub const ASSET_FILE: &str = "balance_bot.xml";

/// Tray and leg dimensions. Only the first three are free, the rest follow
/// from them so the fully extended legs just reach the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotGeometry {
    pub tray_radius: f32,
    pub tray_thickness: f32,
    pub leg_radius: f32,
    /// Radial distance of each leg's tray attachment.
    pub leg_outer_offset: f32,
    pub leg_length: f32,
    /// Radial distance of the knee.
    pub leg_inner_offset: f32,
    pub tray_height: f32,
}

impl BotGeometry {
    #[must_use]
    pub fn new(tray_radius: f32, tray_thickness: f32, leg_radius: f32) -> Self {
        let leg_outer_offset = tray_radius - 0.1;
        let leg_length = leg_outer_offset - 2.0 * leg_radius;
        let leg_inner_offset = leg_outer_offset - leg_length / SQRT_2;
        let tray_height = leg_length * SQRT_2 + 2.0 * leg_radius + 0.5 * tray_thickness;
        Self { tray_radius, tray_thickness, leg_radius, leg_outer_offset, leg_length, leg_inner_offset, tray_height }
    }
}

impl Default for BotGeometry {
    fn default() -> Self {
        Self::new(0.5, 0.02, 0.02)
    }
}

/// `[w, x, y, z]` for the MJCF `quat` attribute.
fn mjcf_quat(roll: f32, pitch: f32, yaw: f32) -> [f32; 4] {
    let q = quat_from_euler_zyx(roll, pitch, yaw);
    [q.w, q.x, q.y, q.z]
}

fn leg_bodies(leg: Leg, g: &BotGeometry) -> Body {
    let angle = leg.angle();
    let (sin, cos) = angle.sin_cos();
    let half = 0.5 * g.leg_length;

    let from = Vec3::new(g.leg_outer_offset * cos, g.leg_outer_offset * sin, -g.leg_radius - 0.5 * g.tray_thickness);
    let to = Vec3::new(g.leg_inner_offset * cos, g.leg_inner_offset * sin, from.z - g.leg_length / SQRT_2);
    let mid = (from + to) * 0.5;

    let mut upper = Body::new(leg.upper_body_name(), mid.to_array()).with_quat(mjcf_quat(0.0, -0.75 * PI, angle));
    upper
        .push_geom(Geom::new(GeomKind::Capsule, &[g.leg_radius, half]).with_density(1000.0))
        .push_joint(Joint::hinge(leg.upper_joint_name(), [0.0, 0.0, -half], [0.0, 1.0, 0.0]).with_range(-45.0, 45.0));

    let mut lower = Body::new(leg.lower_body_name(), [-half, 0.0, half]).with_quat(mjcf_quat(0.0, -0.5 * PI, 0.0));
    lower
        .push_geom(Geom::new(GeomKind::Capsule, &[g.leg_radius, half]).with_density(1000.0))
        .push_joint(Joint::hinge(leg.lower_joint_name(), [0.0, 0.0, -half], [0.0, 1.0, 0.0]).with_range(-70.0, 90.0));

    upper.push_body(lower);
    upper
}

/// The `BalanceBot` model: tray body with a free root joint, then one upper
/// and lower leg body per [`Leg`].
#[must_use]
pub fn build_balance_bot(g: &BotGeometry) -> MjcfModel {
    let mut model = MjcfModel::new("BalanceBot");
    model.compiler = Compiler { inertia_from_geom: true, ..Compiler::default() };

    let mut tray = Body::new("tray", [0.0, 0.0, g.tray_height]);
    tray.push_joint(Joint::free("root_joint")).push_geom(
        Geom::new(GeomKind::Cylinder, &[g.tray_radius, 0.5 * g.tray_thickness])
            .with_pos([0.0; 3])
            .with_density(100.0),
    );
    for leg in Leg::ALL {
        tray.push_body(leg_bodies(leg, g));
    }
    model.worldbody.push(tray);
    model
}

/// Write the bot to `dir/balance_bot.xml` and return that path.
///
/// # Errors
///
/// Returns an error if the directory or file can not be written.
pub fn write_balance_bot(dir: &Path, g: &BotGeometry) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(mjcf::MjcfError::Io)?;
    let path = dir.join(ASSET_FILE);
    build_balance_bot(g).write_to_file(&path)?;
    tracing::debug!("wrote balance bot asset to {}", path.display());
    Ok(path)
}
