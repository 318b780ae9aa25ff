use std::path::Path;

use glam::Vec3;

use crate::error::PhysicsError;
use crate::state::SimState;
use crate::transform::Transform;
use crate::types::{
    ActorHandle, AssetHandle, AssetOptions, AttractorProperties, Color, DofProperties, EnvHandle,
    RigidBodyHandle, SimParams,
};

/// The physics engine as seen by a task.
///
/// Setup calls (assets, envs, actors, drives, attractors) happen once, then
/// [`prepare`](Self::prepare) freezes the scene and allocates the batched
/// tensors. After that a task drives the loop with
/// [`set_dof_position_targets`](Self::set_dof_position_targets),
/// [`simulate`](Self::simulate) and [`refresh`](Self::refresh), and restarts
/// episodes with the indexed state writes.
///
/// Indexed writes must only change the actors listed in `actor_indices`.
pub trait PhysicsBackend {
    fn params(&self) -> &SimParams;

    fn add_ground(&mut self, normal: Vec3);

    /// Load an MJCF asset from `root/file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can not be read or parsed.
    fn load_asset(&mut self, root: &Path, file: &str, options: &AssetOptions) -> Result<AssetHandle, PhysicsError>;

    fn create_sphere(&mut self, radius: f32, options: &AssetOptions) -> AssetHandle;

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownAsset`] for a stale handle.
    fn asset_dof_count(&self, asset: AssetHandle) -> Result<usize, PhysicsError>;

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownAsset`] for a stale handle.
    fn asset_dof_properties(&self, asset: AssetHandle) -> Result<Vec<DofProperties>, PhysicsError>;

    fn find_asset_rigid_body_index(&self, asset: AssetHandle, name: &str) -> Option<usize>;

    /// Mount a force/torque sensor on `body` at `pose` (body frame). Returns
    /// the sensor's index within the asset.
    ///
    /// # Errors
    ///
    /// Returns an error for a stale handle or a body index out of range.
    fn create_asset_force_sensor(
        &mut self,
        asset: AssetHandle,
        body: usize,
        pose: Transform,
    ) -> Result<usize, PhysicsError>;

    fn create_env(&mut self, lower: Vec3, upper: Vec3, num_per_row: usize) -> EnvHandle;

    /// # Errors
    ///
    /// Returns an error for unknown handles or once the sim is prepared.
    fn create_actor(
        &mut self,
        env: EnvHandle,
        asset: AssetHandle,
        pose: Transform,
        name: &str,
        collision_group: i32,
        collision_filter: u32,
    ) -> Result<ActorHandle, PhysicsError>;

    /// # Errors
    ///
    /// Returns an error for unknown handles.
    fn actor_dof_properties(&self, env: EnvHandle, actor: ActorHandle) -> Result<Vec<DofProperties>, PhysicsError>;

    /// # Errors
    ///
    /// Returns an error for unknown handles or a property list of the wrong
    /// length.
    fn set_actor_dof_properties(
        &mut self,
        env: EnvHandle,
        actor: ActorHandle,
        props: &[DofProperties],
    ) -> Result<(), PhysicsError>;

    fn find_actor_rigid_body_handle(&self, env: EnvHandle, actor: ActorHandle, name: &str) -> Option<RigidBodyHandle>;

    /// # Errors
    ///
    /// Returns an error for unknown handles.
    fn create_rigid_body_attractor(&mut self, env: EnvHandle, props: &AttractorProperties) -> Result<(), PhysicsError>;

    /// Set the visual color of one of an actor's bodies. Cosmetic.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown handles.
    fn set_rigid_body_color(
        &mut self,
        env: EnvHandle,
        actor: ActorHandle,
        body: usize,
        color: Color,
    ) -> Result<(), PhysicsError>;

    /// Finish scene construction and allocate state tensors.
    ///
    /// # Errors
    ///
    /// Returns an error if envs do not all share the same actor layout.
    fn prepare(&mut self) -> Result<(), PhysicsError>;

    /// Copy the engine's current root, DOF and sensor tensors into `state`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ShapeMismatch`] if `state` was sized for a
    /// different layout, or [`PhysicsError::NotPrepared`].
    fn refresh(&mut self, state: &mut SimState) -> Result<(), PhysicsError>;

    /// Write root states from `state` for the listed flat actor indices only.
    ///
    /// # Errors
    ///
    /// Returns an error for out of range indices or a mismatched layout.
    fn set_actor_root_state_indexed(&mut self, state: &SimState, actor_indices: &[u32]) -> Result<(), PhysicsError>;

    /// Write DOF states from `state` for the DOFs owned by the listed flat
    /// actor indices only.
    ///
    /// # Errors
    ///
    /// Returns an error for out of range indices or a mismatched layout.
    fn set_dof_state_indexed(&mut self, state: &SimState, actor_indices: &[u32]) -> Result<(), PhysicsError>;

    /// Set position targets for every DOF in the sim, `[env, dof]` order.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ShapeMismatch`] on a length mismatch.
    fn set_dof_position_targets(&mut self, targets: &[f32]) -> Result<(), PhysicsError>;

    /// Advance the simulation by one control step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::NotPrepared`] before [`prepare`](Self::prepare).
    fn simulate(&mut self) -> Result<(), PhysicsError>;

    fn has_viewer(&self) -> bool {
        false
    }

    fn clear_lines(&mut self) {}

    /// World pose of a rigid body.
    fn rigid_transform(&self, _env: EnvHandle, _body: RigidBodyHandle) -> Option<Transform> {
        None
    }

    /// Draw a coordinate frame at `pose` in the viewer.
    fn draw_axes(&mut self, _env: EnvHandle, _pose: &Transform, _scale: f32) {}
}
