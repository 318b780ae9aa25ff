use glam::Vec3;

use crate::transform::Transform;

/// Pose and velocity of one actor's root body, 13 floats laid out the way
/// batched root-state tensors store them.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RootState {
    pub pos: [f32; 3],
    /// Quaternion as `x y z w`.
    pub rot: [f32; 4],
    pub lin_vel: [f32; 3],
    pub ang_vel: [f32; 3],
}

impl RootState {
    pub const IDENTITY_ROT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    #[must_use]
    pub const fn at(pos: [f32; 3]) -> Self {
        Self { pos, rot: Self::IDENTITY_ROT, lin_vel: [0.0; 3], ang_vel: [0.0; 3] }
    }

    #[must_use]
    pub fn from_transform(pose: &Transform) -> Self {
        Self {
            pos: pose.p.to_array(),
            rot: pose.r.to_array(),
            lin_vel: [0.0; 3],
            ang_vel: [0.0; 3],
        }
    }
}

impl Default for RootState {
    fn default() -> Self {
        Self::at([0.0; 3])
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DofState {
    pub pos: f32,
    pub vel: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ForceSensorReading {
    pub force: [f32; 3],
    pub torque: [f32; 3],
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimParams {
    pub dt: f32,
    pub substeps: u32,
    pub gravity: Vec3,
}

impl Default for SimParams {
    fn default() -> Self {
        Self { dt: 1.0 / 60.0, substeps: 2, gravity: Vec3::new(0.0, 0.0, -9.81) }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DofDriveMode {
    #[default]
    None,
    Position,
    Velocity,
    Effort,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DofProperties {
    pub has_limits: bool,
    /// Radians for hinges, meters for slides.
    pub lower: f32,
    pub upper: f32,
    pub drive_mode: DofDriveMode,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for DofProperties {
    fn default() -> Self {
        Self {
            has_limits: false,
            lower: f32::MIN,
            upper: f32::MAX,
            drive_mode: DofDriveMode::None,
            stiffness: 0.0,
            damping: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AssetOptions {
    pub fix_base_link: bool,
    pub slices_per_cylinder: u32,
    /// Used for primitives and for geoms that do not specify one.
    pub density: f32,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self { fix_base_link: false, slices_per_cylinder: 20, density: 1000.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttractorAxes {
    Translation,
    Rotation,
    All,
}

/// Spring that pulls a point on a rigid body toward a target pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttractorProperties {
    pub rigid_handle: RigidBodyHandle,
    /// Target in the env frame.
    pub target: Transform,
    /// Attachment point in the body frame.
    pub offset: Transform,
    pub stiffness: f32,
    pub damping: f32,
    pub axes: AttractorAxes,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnvHandle(pub usize);

/// Actor index within its env.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub usize);

/// Rigid body index within its env, counted across all of the env's actors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub usize);
