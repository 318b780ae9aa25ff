//! Substep integration for [`CpuSim`].
//!
//! Articulation roots are static. Spheres are point masses with a radius:
//! semi-implicit Euler under gravity, then contact against the support disc of
//! every articulation in the same env and against the ground plane.

use glam::{Quat, Vec3};

use super::asset::Shape;
use super::CpuSim;
use crate::types::DofDriveMode;

const RESTITUTION: f32 = 0.5;
/// Normal approach speeds below this come to rest instead of bouncing.
const REST_SPEED: f32 = 0.2;
const FRICTION: f32 = 0.5;

/// Top face of a support disc, env frame.
#[derive(Clone, Copy, Debug)]
struct SupportDisc {
    actor: usize,
    env: usize,
    center: Vec3,
    radius: f32,
}

/// One sphere touching one support during a substep.
#[derive(Clone, Copy, Debug)]
struct SupportContact {
    actor: usize,
    point: Vec3,
    /// Normal force pressing on the support, N.
    load: f32,
}

impl CpuSim {
    pub(super) fn substep(&mut self, h: f32) {
        self.integrate_dofs(h);
        for contact in self.integrate_spheres(h) {
            self.accumulate_sensor_load(&contact);
        }
    }

    /// Turn loads summed over substeps into the mean load over the step.
    pub(super) fn average_sensor_loads(&mut self, substeps: f32) {
        for reading in &mut self.sensors {
            for i in 0..3 {
                reading.force[i] /= substeps;
                reading.torque[i] /= substeps;
            }
        }
    }

    fn integrate_dofs(&mut self, h: f32) {
        for actor in &self.actors {
            for (k, props) in actor.dof_props.iter().enumerate() {
                let idx = actor.dof_offset + k;
                let target = self.targets[idx];
                let dof = &mut self.dofs[idx];
                match props.drive_mode {
                    DofDriveMode::Position => {
                        // implicit PD, stable for any gains
                        let (kp, kd) = (props.stiffness, props.damping);
                        dof.vel = (dof.vel + h * kp * (target - dof.pos)) / (1.0 + h * kd + h * h * kp);
                    }
                    DofDriveMode::Velocity => {
                        dof.vel /= 1.0 + h * props.damping;
                    }
                    DofDriveMode::None | DofDriveMode::Effort => {
                        if actor.pinned {
                            dof.vel = 0.0;
                        }
                    }
                }
                dof.pos += h * dof.vel;
                if props.has_limits && !(props.lower..=props.upper).contains(&dof.pos) {
                    dof.pos = dof.pos.clamp(props.lower, props.upper);
                    dof.vel = 0.0;
                }
            }
        }
    }

    fn support_discs(&self) -> Vec<SupportDisc> {
        self.actors
            .iter()
            .enumerate()
            .filter_map(|(id, actor)| {
                let Shape::Articulation { support: Some(support), .. } = self.assets[actor.asset].shape else {
                    return None;
                };
                let root = &self.roots[id];
                let rot = Quat::from_array(root.rot).normalize();
                let center = Vec3::from(root.pos) + rot * Vec3::new(0.0, 0.0, support.half_height);
                Some(SupportDisc { actor: id, env: actor.env, center, radius: support.radius })
            })
            .collect()
    }

    fn integrate_spheres(&mut self, h: f32) -> Vec<SupportContact> {
        let discs = self.support_discs();
        let gravity = self.params.gravity;
        let mut contacts = Vec::new();

        for (id, actor) in self.actors.iter().enumerate() {
            let Shape::Sphere { radius, mass } = self.assets[actor.asset].shape else {
                continue;
            };
            let root = &mut self.roots[id];
            let mut v = Vec3::from(root.lin_vel) + gravity * h;
            let mut p = Vec3::from(root.pos) + v * h;

            for disc in discs.iter().filter(|d| d.env == actor.env) {
                let offset = p - disc.center;
                let depth = radius - offset.z;
                // only the top face, and only while the center is still above it
                if depth <= 0.0 || depth > radius || offset.truncate().length() > disc.radius {
                    continue;
                }
                p.z += depth;
                let dv = resolve(&mut v, Vec3::Z);
                contacts.push(SupportContact {
                    actor: disc.actor,
                    point: Vec3::new(p.x, p.y, disc.center.z),
                    load: mass * dv / h,
                });
            }

            if let Some(normal) = self.ground {
                let depth = radius - p.dot(normal);
                if depth > 0.0 {
                    p += normal * depth;
                    resolve(&mut v, normal);
                }
            }

            root.pos = p.to_array();
            root.lin_vel = v.to_array();
        }
        contacts
    }

    /// Split a contact load evenly over the support's sensors. Readings are
    /// the force the ball applies, with torque taken about each sensor.
    fn accumulate_sensor_load(&mut self, contact: &SupportContact) {
        let actor = &self.actors[contact.actor];
        let asset = &self.assets[actor.asset];
        if asset.sensors.is_empty() {
            return;
        }
        let dofs = &self.dofs[actor.dof_offset..actor.dof_offset + actor.dof_props.len()];
        let poses = asset.body_poses(&self.roots[contact.actor], dofs);
        #[allow(clippy::cast_precision_loss)]
        let force = Vec3::new(0.0, 0.0, -contact.load / asset.sensors.len() as f32);
        for (k, mount) in asset.sensors.iter().enumerate() {
            let at = poses[mount.body].transform_point(mount.pose.p);
            let torque = (contact.point - at).cross(force);
            let reading = &mut self.sensors[actor.sensor_offset + k];
            for i in 0..3 {
                reading.force[i] += force[i];
                reading.torque[i] += torque[i];
            }
        }
    }
}

/// Remove the approaching normal velocity, bounce when fast, apply Coulomb
/// friction to the tangential part. Returns the normal velocity change.
fn resolve(v: &mut Vec3, normal: Vec3) -> f32 {
    let vn = v.dot(normal);
    if vn >= 0.0 {
        return 0.0;
    }
    let bounce = if -vn > REST_SPEED { RESTITUTION } else { 0.0 };
    let dv = -(1.0 + bounce) * vn;
    let tangent = *v - normal * vn;
    let slip = tangent.length();
    let tangent = if slip > 0.0 {
        tangent * ((slip - FRICTION * dv).max(0.0) / slip)
    } else {
        tangent
    };
    *v = tangent + normal * (vn + dv);
    dv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_contact_comes_to_rest() {
        let mut v = Vec3::new(0.0, 0.0, -0.1);
        let dv = resolve(&mut v, Vec3::Z);
        assert!((dv - 0.1).abs() < 1e-6);
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn fast_contact_bounces_and_loses_slip() {
        let mut v = Vec3::new(0.3, 0.0, -2.0);
        let dv = resolve(&mut v, Vec3::Z);
        assert!((dv - 3.0).abs() < 1e-6);
        assert!((v.z - 1.0).abs() < 1e-6);
        assert_eq!(v.x, 0.0);
    }

    #[test]
    fn separating_contact_is_untouched() {
        let mut v = Vec3::new(1.0, 0.0, 0.5);
        assert_eq!(resolve(&mut v, Vec3::Z), 0.0);
        assert_eq!(v, Vec3::new(1.0, 0.0, 0.5));
    }
}
