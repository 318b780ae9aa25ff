//! Named legs and joints of the balance bot.
//!
//! The asset loader numbers DOFs depth first, so each leg contributes its
//! upper (passive) hinge and then its lower (actuated) hinge.

use std::f32::consts::PI;

/// One of the three legs, 120 degrees apart around the tray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Leg(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointRole {
    /// Undriven hinge between tray and upper leg.
    Passive,
    /// Position-driven hinge between upper and lower leg.
    Actuated,
}

impl Leg {
    pub const COUNT: usize = 3;
    pub const ALL: [Leg; Self::COUNT] = [Leg(0), Leg(1), Leg(2)];

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn passive_dof(self) -> usize {
        2 * self.0
    }

    #[must_use]
    pub const fn actuated_dof(self) -> usize {
        2 * self.0 + 1
    }

    /// Azimuth of the leg around the tray's z axis, radians.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn angle(self) -> f32 {
        self.0 as f32 * 2.0 / 3.0 * PI
    }

    #[must_use]
    pub fn upper_body_name(self) -> String {
        format!("upper_leg{}", self.0)
    }

    #[must_use]
    pub fn lower_body_name(self) -> String {
        format!("lower_leg{}", self.0)
    }

    #[must_use]
    pub fn upper_joint_name(self) -> String {
        format!("upper_leg_joint{}", self.0)
    }

    #[must_use]
    pub fn lower_joint_name(self) -> String {
        format!("lower_leg_joint{}", self.0)
    }
}

/// Role of a bot DOF, `None` past the last leg.
#[must_use]
pub fn role_of(dof: usize) -> Option<(Leg, JointRole)> {
    let leg = Leg::ALL.get(dof / 2).copied()?;
    let role = if dof % 2 == 0 { JointRole::Passive } else { JointRole::Actuated };
    Some((leg, role))
}
