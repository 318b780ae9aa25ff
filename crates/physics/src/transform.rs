//! Rigid transforms.
//!
//! Poses are kept as position plus quaternion, the representation assets and
//! root-state tensors use.

use glam::{EulerRot, Quat, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub p: Vec3,
    pub r: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self { p: Vec3::ZERO, r: Quat::IDENTITY };

    #[must_use]
    pub const fn from_translation(p: Vec3) -> Self {
        Self { p, r: Quat::IDENTITY }
    }

    #[must_use]
    pub const fn new(p: Vec3, r: Quat) -> Self {
        Self { p, r }
    }

    /// `self * other`: apply `other` first, then `self`.
    #[must_use]
    pub fn mul_transform(&self, other: &Transform) -> Transform {
        Transform { p: self.p + self.r * other.p, r: (self.r * other.r).normalize() }
    }

    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.p + self.r * point
    }

    #[must_use]
    pub fn inverse(&self) -> Transform {
        let r = self.r.inverse();
        Transform { p: -(r * self.p), r }
    }
}

/// Rotation built from roll `x`, pitch `y`, yaw `z` applied in z-y-x order,
/// i.e. `Rz(z) * Ry(y) * Rx(x)`.
#[must_use]
pub fn quat_from_euler_zyx(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::ZYX, z, y, x)
}
