//! # CPU reference backend
//!
//! [`CpuSim`] implements [`PhysicsBackend`] with a deliberately small model:
//! spheres fall under gravity and bounce on the ground plane and on the
//! support disc of articulated actors, position-driven DOFs follow their
//! targets through an implicit PD update, and DOFs without a drive are held
//! in place when the actor is pinned by an attractor. Contact loads on a
//! support are reported through the actor's force sensors.
//!
//! It is enough to run tasks headless and to test their episode logic end
//! to end; it is not a substitute for a real articulated-body solver.

mod asset;
mod dynamics;

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use crate::backend::PhysicsBackend;
use crate::error::PhysicsError;
use crate::state::SimState;
use crate::transform::Transform;
use crate::types::{
    ActorHandle, AssetHandle, AssetOptions, AttractorProperties, Color, DofProperties, DofState,
    EnvHandle, ForceSensorReading, RigidBodyHandle, RootState, SimParams,
};

use asset::{Asset, SensorMount};

#[derive(Clone, Debug)]
struct EnvSlot {
    origin: Vec3,
    actors: Vec<usize>,
    bodies: usize,
}

#[derive(Clone, Debug)]
struct Actor {
    env: usize,
    asset: usize,
    initial: RootState,
    dof_props: Vec<DofProperties>,
    dof_offset: usize,
    sensor_offset: usize,
    body_offset: usize,
    pinned: bool,
}

#[derive(Clone, Copy, Debug)]
struct Layout {
    actors_per_env: usize,
    dofs_per_env: usize,
    sensors_per_env: usize,
}

/// An attractor as recorded by the backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attractor {
    pub env: EnvHandle,
    pub props: AttractorProperties,
}

/// A line segment drawn through the debug viewer, in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    pub env: EnvHandle,
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color,
}

pub struct CpuSim {
    params: SimParams,
    ground: Option<Vec3>,
    assets: Vec<Asset>,
    envs: Vec<EnvSlot>,
    actors: Vec<Actor>,
    attractors: Vec<Attractor>,
    colors: HashMap<(usize, usize), Color>,
    viewer: Option<Vec<DebugLine>>,
    layout: Option<Layout>,
    roots: Vec<RootState>,
    dofs: Vec<DofState>,
    targets: Vec<f32>,
    sensors: Vec<ForceSensorReading>,
    steps: u64,
}

impl CpuSim {
    #[must_use]
    pub fn new(params: SimParams) -> Self {
        Self {
            params,
            ground: None,
            assets: Vec::new(),
            envs: Vec::new(),
            actors: Vec::new(),
            attractors: Vec::new(),
            colors: HashMap::new(),
            viewer: None,
            layout: None,
            roots: Vec::new(),
            dofs: Vec::new(),
            targets: Vec::new(),
            sensors: Vec::new(),
            steps: 0,
        }
    }

    /// A sim with a headless viewer that records debug lines.
    #[must_use]
    pub fn with_viewer(params: SimParams) -> Self {
        let mut sim = Self::new(params);
        sim.viewer = Some(Vec::new());
        sim
    }

    #[must_use]
    pub fn lines(&self) -> &[DebugLine] {
        self.viewer.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    #[must_use]
    pub fn body_color(&self, env: EnvHandle, body: RigidBodyHandle) -> Option<Color> {
        self.colors.get(&(env.0, body.0)).copied()
    }

    #[must_use]
    pub fn dof_position_targets(&self) -> &[f32] {
        &self.targets
    }

    #[must_use]
    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    fn asset(&self, handle: AssetHandle) -> Result<&Asset, PhysicsError> {
        self.assets.get(handle.0).ok_or(PhysicsError::UnknownAsset(handle.0))
    }

    fn actor_id(&self, env: EnvHandle, actor: ActorHandle) -> Result<usize, PhysicsError> {
        let slot = self.envs.get(env.0).ok_or(PhysicsError::UnknownEnv(env.0))?;
        slot.actors
            .get(actor.0)
            .copied()
            .ok_or(PhysicsError::UnknownActor { env: env.0, actor: actor.0 })
    }

    fn layout(&self) -> Result<Layout, PhysicsError> {
        self.layout.ok_or(PhysicsError::NotPrepared)
    }

    fn check_state(&self, state: &SimState) -> Result<(), PhysicsError> {
        let layout = self.layout()?;
        if state.num_envs() != self.envs.len()
            || state.actors_per_env() != layout.actors_per_env
            || state.dofs_per_env() != layout.dofs_per_env
            || state.sensors_per_env() != layout.sensors_per_env
        {
            return Err(PhysicsError::ShapeMismatch(format!(
                "state is {}x({} actors, {} dofs, {} sensors), sim is {}x({}, {}, {})",
                state.num_envs(),
                state.actors_per_env(),
                state.dofs_per_env(),
                state.sensors_per_env(),
                self.envs.len(),
                layout.actors_per_env,
                layout.dofs_per_env,
                layout.sensors_per_env,
            )));
        }
        Ok(())
    }

    fn actor_for_index(&self, index: u32) -> Result<usize, PhysicsError> {
        let idx = index as usize;
        if idx < self.actors.len() {
            Ok(idx)
        } else {
            Err(PhysicsError::ShapeMismatch(format!(
                "actor index {idx} out of range for {} actors",
                self.actors.len()
            )))
        }
    }
}

impl PhysicsBackend for CpuSim {
    fn params(&self) -> &SimParams {
        &self.params
    }

    fn add_ground(&mut self, normal: Vec3) {
        self.ground = Some(normal.normalize_or_zero());
    }

    fn load_asset(&mut self, root: &Path, file: &str, options: &AssetOptions) -> Result<AssetHandle, PhysicsError> {
        let path = root.join(file);
        let xml = std::fs::read_to_string(&path).map_err(|source| PhysicsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model = mjcf::parse_str(&xml)?;
        let asset = Asset::from_mjcf(&model);
        if options.fix_base_link {
            tracing::warn!("fix_base_link is ignored by the cpu backend; articulation roots never move");
        }
        tracing::debug!(
            "loaded asset {} from {}: {} bodies, {} dofs",
            asset.name,
            path.display(),
            asset.body_count(),
            asset.dofs.len()
        );
        self.assets.push(asset);
        Ok(AssetHandle(self.assets.len() - 1))
    }

    fn create_sphere(&mut self, radius: f32, options: &AssetOptions) -> AssetHandle {
        self.assets.push(Asset::sphere(radius, options));
        AssetHandle(self.assets.len() - 1)
    }

    fn asset_dof_count(&self, asset: AssetHandle) -> Result<usize, PhysicsError> {
        Ok(self.asset(asset)?.dofs.len())
    }

    fn asset_dof_properties(&self, asset: AssetHandle) -> Result<Vec<DofProperties>, PhysicsError> {
        Ok(self.asset(asset)?.dofs.clone())
    }

    fn find_asset_rigid_body_index(&self, asset: AssetHandle, name: &str) -> Option<usize> {
        self.assets.get(asset.0)?.body_index(name)
    }

    fn create_asset_force_sensor(
        &mut self,
        asset: AssetHandle,
        body: usize,
        pose: Transform,
    ) -> Result<usize, PhysicsError> {
        let entry = self.assets.get_mut(asset.0).ok_or(PhysicsError::UnknownAsset(asset.0))?;
        if body >= entry.body_count() {
            return Err(PhysicsError::ShapeMismatch(format!(
                "body {body} out of range for asset {} with {} bodies",
                entry.name,
                entry.body_count()
            )));
        }
        entry.sensors.push(SensorMount { body, pose });
        Ok(entry.sensors.len() - 1)
    }

    fn create_env(&mut self, lower: Vec3, upper: Vec3, num_per_row: usize) -> EnvHandle {
        let idx = self.envs.len();
        let per_row = num_per_row.max(1);
        let extent = upper - lower;
        #[allow(clippy::cast_precision_loss)]
        let origin = Vec3::new((idx % per_row) as f32 * extent.x, (idx / per_row) as f32 * extent.y, 0.0);
        self.envs.push(EnvSlot { origin, actors: Vec::new(), bodies: 0 });
        EnvHandle(idx)
    }

    fn create_actor(
        &mut self,
        env: EnvHandle,
        asset: AssetHandle,
        pose: Transform,
        name: &str,
        _collision_group: i32,
        _collision_filter: u32,
    ) -> Result<ActorHandle, PhysicsError> {
        if self.layout.is_some() {
            return Err(PhysicsError::AlreadyPrepared);
        }
        let entry = self.asset(asset)?;
        let dof_props = entry.dofs.clone();
        let body_count = entry.body_count();
        let slot = self.envs.get_mut(env.0).ok_or(PhysicsError::UnknownEnv(env.0))?;

        self.actors.push(Actor {
            env: env.0,
            asset: asset.0,
            initial: RootState::from_transform(&pose),
            dof_props,
            dof_offset: 0,
            sensor_offset: 0,
            body_offset: slot.bodies,
            pinned: false,
        });
        slot.actors.push(self.actors.len() - 1);
        slot.bodies += body_count;
        tracing::trace!("created actor {name} in env {}", env.0);
        Ok(ActorHandle(slot.actors.len() - 1))
    }

    fn actor_dof_properties(&self, env: EnvHandle, actor: ActorHandle) -> Result<Vec<DofProperties>, PhysicsError> {
        let id = self.actor_id(env, actor)?;
        Ok(self.actors[id].dof_props.clone())
    }

    fn set_actor_dof_properties(
        &mut self,
        env: EnvHandle,
        actor: ActorHandle,
        props: &[DofProperties],
    ) -> Result<(), PhysicsError> {
        let id = self.actor_id(env, actor)?;
        let current = &mut self.actors[id].dof_props;
        if props.len() != current.len() {
            return Err(PhysicsError::ShapeMismatch(format!(
                "expected {} dof properties, got {}",
                current.len(),
                props.len()
            )));
        }
        current.copy_from_slice(props);
        Ok(())
    }

    fn find_actor_rigid_body_handle(&self, env: EnvHandle, actor: ActorHandle, name: &str) -> Option<RigidBodyHandle> {
        let id = self.actor_id(env, actor).ok()?;
        let actor = &self.actors[id];
        let local = self.assets[actor.asset].body_index(name)?;
        Some(RigidBodyHandle(actor.body_offset + local))
    }

    fn create_rigid_body_attractor(&mut self, env: EnvHandle, props: &AttractorProperties) -> Result<(), PhysicsError> {
        let slot = self.envs.get(env.0).ok_or(PhysicsError::UnknownEnv(env.0))?;
        let owner = slot.actors.iter().copied().find(|&id| {
            let actor = &self.actors[id];
            let count = self.assets[actor.asset].body_count();
            (actor.body_offset..actor.body_offset + count).contains(&props.rigid_handle.0)
        });
        let Some(owner) = owner else {
            return Err(PhysicsError::ShapeMismatch(format!(
                "rigid body {} not found in env {}",
                props.rigid_handle.0, env.0
            )));
        };
        self.actors[owner].pinned = true;
        self.attractors.push(Attractor { env, props: *props });
        Ok(())
    }

    fn set_rigid_body_color(
        &mut self,
        env: EnvHandle,
        actor: ActorHandle,
        body: usize,
        color: Color,
    ) -> Result<(), PhysicsError> {
        let id = self.actor_id(env, actor)?;
        let offset = self.actors[id].body_offset;
        self.colors.insert((env.0, offset + body), color);
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), PhysicsError> {
        let Some(first) = self.envs.first() else {
            return Err(PhysicsError::ShapeMismatch("no envs created".to_string()));
        };
        let env_layout = |slot: &EnvSlot| -> Vec<(usize, usize)> {
            slot.actors
                .iter()
                .map(|&id| {
                    let asset = &self.assets[self.actors[id].asset];
                    (asset.dofs.len(), asset.sensors.len())
                })
                .collect()
        };
        let reference = env_layout(first);
        if let Some((idx, _)) = self.envs.iter().enumerate().find(|(_, slot)| env_layout(*slot) != reference) {
            return Err(PhysicsError::ShapeMismatch(format!("env {idx} has a different actor layout than env 0")));
        }
        if self.actors.windows(2).any(|w| w[0].env > w[1].env) {
            return Err(PhysicsError::ShapeMismatch("actors must be created env by env".to_string()));
        }

        let mut dof_offset = 0;
        let mut sensor_offset = 0;
        for actor in &mut self.actors {
            let asset = &self.assets[actor.asset];
            actor.dof_offset = dof_offset;
            actor.sensor_offset = sensor_offset;
            dof_offset += asset.dofs.len();
            sensor_offset += asset.sensors.len();
        }

        self.layout = Some(Layout {
            actors_per_env: reference.len(),
            dofs_per_env: reference.iter().map(|(d, _)| d).sum(),
            sensors_per_env: reference.iter().map(|(_, s)| s).sum(),
        });
        self.roots = self.actors.iter().map(|a| a.initial).collect();
        self.dofs = vec![DofState::default(); dof_offset];
        self.targets = vec![0.0; dof_offset];
        self.sensors = vec![ForceSensorReading::default(); sensor_offset];

        tracing::info!(
            "cpu sim prepared: {} envs, {} actors, {} dofs, {} sensors",
            self.envs.len(),
            self.actors.len(),
            dof_offset,
            sensor_offset
        );
        Ok(())
    }

    fn refresh(&mut self, state: &mut SimState) -> Result<(), PhysicsError> {
        self.check_state(state)?;
        state.root_states.copy_from_slice(&self.roots);
        state.dof_states.copy_from_slice(&self.dofs);
        state.sensors.copy_from_slice(&self.sensors);
        Ok(())
    }

    fn set_actor_root_state_indexed(&mut self, state: &SimState, actor_indices: &[u32]) -> Result<(), PhysicsError> {
        self.check_state(state)?;
        for &index in actor_indices {
            let id = self.actor_for_index(index)?;
            self.roots[id] = state.root_states[id];
        }
        Ok(())
    }

    fn set_dof_state_indexed(&mut self, state: &SimState, actor_indices: &[u32]) -> Result<(), PhysicsError> {
        self.check_state(state)?;
        for &index in actor_indices {
            let id = self.actor_for_index(index)?;
            let actor = &self.actors[id];
            let range = actor.dof_offset..actor.dof_offset + actor.dof_props.len();
            self.dofs[range.clone()].copy_from_slice(&state.dof_states[range]);
        }
        Ok(())
    }

    fn set_dof_position_targets(&mut self, targets: &[f32]) -> Result<(), PhysicsError> {
        self.layout()?;
        if targets.len() != self.targets.len() {
            return Err(PhysicsError::ShapeMismatch(format!(
                "expected {} dof targets, got {}",
                self.targets.len(),
                targets.len()
            )));
        }
        self.targets.copy_from_slice(targets);
        Ok(())
    }

    fn simulate(&mut self) -> Result<(), PhysicsError> {
        self.layout()?;
        let substeps = self.params.substeps.max(1);
        #[allow(clippy::cast_precision_loss)]
        let h = self.params.dt / substeps as f32;
        self.sensors.fill(ForceSensorReading::default());
        for _ in 0..substeps {
            self.substep(h);
        }
        #[allow(clippy::cast_precision_loss)]
        self.average_sensor_loads(substeps as f32);
        self.steps += 1;
        Ok(())
    }

    fn has_viewer(&self) -> bool {
        self.viewer.is_some()
    }

    fn clear_lines(&mut self) {
        if let Some(lines) = self.viewer.as_mut() {
            lines.clear();
        }
    }

    fn rigid_transform(&self, env: EnvHandle, body: RigidBodyHandle) -> Option<Transform> {
        let slot = self.envs.get(env.0)?;
        self.layout?;
        slot.actors.iter().find_map(|&id| {
            let actor = &self.actors[id];
            let asset = &self.assets[actor.asset];
            let local = body.0.checked_sub(actor.body_offset)?;
            if local >= asset.body_count() {
                return None;
            }
            let dofs = &self.dofs[actor.dof_offset..actor.dof_offset + actor.dof_props.len()];
            let pose = asset.body_poses(&self.roots[id], dofs)[local];
            Some(Transform::new(pose.p + slot.origin, pose.r))
        })
    }

    fn draw_axes(&mut self, env: EnvHandle, pose: &Transform, scale: f32) {
        let Some(lines) = self.viewer.as_mut() else {
            return;
        };
        let axes = [
            (Vec3::X, Color::rgb(1.0, 0.0, 0.0)),
            (Vec3::Y, Color::rgb(0.0, 1.0, 0.0)),
            (Vec3::Z, Color::rgb(0.0, 0.0, 1.0)),
        ];
        for (axis, color) in axes {
            lines.push(DebugLine { env, from: pose.p, to: pose.transform_point(axis * scale), color });
        }
    }
}

impl std::fmt::Debug for CpuSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSim")
            .field("envs", &self.envs.len())
            .field("actors", &self.actors.len())
            .field("assets", &self.assets.len())
            .field("prepared", &self.layout.is_some())
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}
