//! # Ball balance
//!
//! A tray on three legs keeps a ball close to a hover height above its
//! center. Each leg has a passive hinge at the tray and a position-driven
//! knee; actions nudge the knee targets.
//!
//! Every env holds the bot in actor slot [`BOT_SLOT`] and the ball in
//! [`BALL_SLOT`]. The bot has [`DOFS_PER_ENV`] DOFs (see [`Leg`]) and
//! [`SENSORS_PER_ENV`] force sensors on the tray, one above each leg.

pub mod asset;
pub mod joints;
pub mod observations;
pub mod populate;
pub mod reset;
pub mod reward;
mod task;

pub use asset::{build_balance_bot, write_balance_bot, BotGeometry, ASSET_FILE};
pub use joints::{role_of, JointRole, Leg};
pub use observations::compute_observations;
pub use populate::{populate, EnvActors, Population};
pub use reset::{reset_idx, ResetRanges};
pub use reward::{compute_bot_reward, RewardInputs, TARGET_HEIGHT};
pub use task::BallBalance;

pub const NUM_OBSERVATIONS: usize = 24;
pub const NUM_ACTIONS: usize = Leg::COUNT;

pub const BOT_SLOT: usize = 0;
pub const BALL_SLOT: usize = 1;
pub const ACTORS_PER_ENV: usize = 2;
pub const DOFS_PER_ENV: usize = 2 * Leg::COUNT;
pub const SENSORS_PER_ENV: usize = Leg::COUNT;

pub const BALL_RADIUS: f32 = 0.1;
