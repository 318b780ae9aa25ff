//! Assets as the CPU backend sees them: a rigid body tree with scalar DOFs,
//! or a single sphere.

use glam::{Quat, Vec3};
use mjcf::{AngleUnit, GeomKind, JointKind, MjcfModel};

use crate::transform::Transform;
use crate::types::{AssetOptions, DofProperties, DofState, RootState};

#[derive(Clone, Debug)]
pub(crate) struct AssetJoint {
    pub dof: usize,
    pub kind: JointKind,
    pub pos: Vec3,
    pub axis: Vec3,
}

#[derive(Clone, Debug)]
pub(crate) struct AssetBody {
    pub name: String,
    pub parent: Option<usize>,
    pub local: Transform,
    pub joints: Vec<AssetJoint>,
}

/// Flat top of a body other objects can rest on, from a cylinder geom on the
/// root body.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Support {
    pub radius: f32,
    pub half_height: f32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct SensorMount {
    pub body: usize,
    pub pose: Transform,
}

#[derive(Clone, Debug)]
pub(crate) enum Shape {
    Articulation { bodies: Vec<AssetBody>, support: Option<Support> },
    Sphere { radius: f32, mass: f32 },
}

#[derive(Clone, Debug)]
pub(crate) struct Asset {
    pub name: String,
    pub shape: Shape,
    pub dofs: Vec<DofProperties>,
    pub sensors: Vec<SensorMount>,
}

impl Asset {
    pub fn sphere(radius: f32, options: &AssetOptions) -> Self {
        let mass = options.density * 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3);
        Self {
            name: "sphere".to_string(),
            shape: Shape::Sphere { radius, mass },
            dofs: Vec::new(),
            sensors: Vec::new(),
        }
    }

    pub fn from_mjcf(model: &MjcfModel) -> Self {
        let angle_scale = match model.compiler.angle {
            AngleUnit::Degree => std::f32::consts::PI / 180.0,
            AngleUnit::Radian => 1.0,
        };

        let mut bodies = Vec::new();
        let mut dofs = Vec::new();
        for visit in model.bodies_depth_first() {
            let body = visit.body;
            let rot = body
                .quat
                .map_or(Quat::IDENTITY, |[w, x, y, z]| Quat::from_xyzw(x, y, z, w).normalize());
            let mut joints = Vec::new();
            for joint in body.joints().filter(|j| j.kind.is_scalar_dof()) {
                let scale = if joint.kind == JointKind::Hinge { angle_scale } else { 1.0 };
                let mut props = DofProperties::default();
                if let Some([lower, upper]) = joint.range {
                    props.has_limits = true;
                    props.lower = lower * scale;
                    props.upper = upper * scale;
                }
                joints.push(AssetJoint {
                    dof: dofs.len(),
                    kind: joint.kind,
                    pos: joint.pos.map_or(Vec3::ZERO, Vec3::from),
                    axis: joint.axis.map_or(Vec3::Z, |a| Vec3::from(a).normalize_or_zero()),
                });
                dofs.push(props);
            }
            bodies.push(AssetBody {
                name: body.name.clone(),
                parent: visit.parent,
                local: Transform::new(Vec3::from(body.pos), rot),
                joints,
            });
        }

        let support = model.worldbody.first().and_then(|root| {
            root.geoms()
                .find(|g| g.kind == GeomKind::Cylinder && g.size.len() >= 2)
                .map(|g| Support { radius: g.size[0], half_height: g.size[1] })
        });

        Self {
            name: model.name.clone(),
            shape: Shape::Articulation { bodies, support },
            dofs,
            sensors: Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        match &self.shape {
            Shape::Articulation { bodies, .. } => bodies.len(),
            Shape::Sphere { .. } => 1,
        }
    }

    pub fn body_index(&self, name: &str) -> Option<usize> {
        match &self.shape {
            Shape::Articulation { bodies, .. } => bodies.iter().position(|b| b.name == name),
            Shape::Sphere { .. } => None,
        }
    }

    /// Body poses in the env frame given the actor's root state and DOFs.
    pub fn body_poses(&self, root: &RootState, dofs: &[DofState]) -> Vec<Transform> {
        let root_pose = Transform::new(Vec3::from(root.pos), Quat::from_array(root.rot).normalize());
        let Shape::Articulation { bodies, .. } = &self.shape else {
            return vec![root_pose];
        };

        let mut poses: Vec<Transform> = Vec::with_capacity(bodies.len());
        for body in bodies {
            let mut pose = match body.parent {
                None => root_pose,
                Some(parent) => poses[parent].mul_transform(&body.local),
            };
            for joint in &body.joints {
                let q = dofs.get(joint.dof).map_or(0.0, |d| d.pos);
                let motion = match joint.kind {
                    JointKind::Slide => Transform::from_translation(joint.axis * q),
                    _ => {
                        let pivot = Transform::from_translation(joint.pos);
                        let rot = Transform::new(Vec3::ZERO, Quat::from_axis_angle(joint.axis, q));
                        pivot.mul_transform(&rot).mul_transform(&pivot.inverse())
                    }
                };
                pose = pose.mul_transform(&motion);
            }
            poses.push(pose);
        }
        poses
    }
}
