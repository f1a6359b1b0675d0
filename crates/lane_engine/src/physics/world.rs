//! Rigid-body world backed by `rapier3d`
//!
//! Wraps the rapier pipeline behind the handful of operations the game core
//! needs: add, remove, step, read poses and push bodies around.

use rapier3d::prelude::{
    BroadPhase, CCDSolver, CoefficientCombineRule, ColliderBuilder, ColliderSet, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};

use super::body::RigidBody;
use super::PhysicsError;
use crate::foundation::math::{Transform, Vec3};

/// Handle to a body living in a [`PhysicsWorld`]
pub type BodyHandle = RigidBodyHandle;

/// Standard gravity used by the lane, pointing down the Y axis
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.8, 0.0];

/// Rigid-body world
///
/// Forces added with [`apply_force_at`](Self::apply_force_at) act during the
/// next [`step_simulation`](Self::step_simulation) call only.
pub struct PhysicsWorld {
    gravity: Vec3,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    pending_forces: Vec<BodyHandle>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec3::from(DEFAULT_GRAVITY))
    }
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            pending_forces: Vec::new(),
        }
    }

    /// Current gravity
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Replace gravity
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Insert a body and its collider
    pub fn add_body(&mut self, body: &RigidBody) -> BodyHandle {
        let builder = if body.is_static() {
            RigidBodyBuilder::fixed()
        } else {
            // Rapier has no rolling friction; damping spin is the closest match
            RigidBodyBuilder::dynamic()
                .angular_damping(body.material.rolling_friction)
                .ccd_enabled(true)
        };
        let handle = self
            .bodies
            .insert(builder.position(body.transform.to_isometry()));

        let mut collider = ColliderBuilder::new(body.shape.clone())
            .friction(body.material.friction)
            .restitution(body.material.restitution)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .restitution_combine_rule(CoefficientCombineRule::Multiply);
        if !body.is_static() {
            let volume = body.shape.mass_properties(1.0).mass();
            if volume > f32::EPSILON {
                collider = collider.density(body.mass / volume);
            }
        }
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    /// Remove a body and its collider; `false` if it was already gone
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.pending_forces.retain(|pending| *pending != handle);
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Whether `handle` refers to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance the world by `delta_time`, split into `sub_steps` equal steps
    ///
    /// The sub-step count is fixed: a long frame means coarser steps, not more
    /// of them. A zero, negative or non-finite delta advances nothing.
    pub fn step_simulation(&mut self, delta_time: f32, sub_steps: u32) {
        if delta_time.is_finite() && delta_time > 0.0 {
            let sub_steps = sub_steps.max(1);
            self.integration_parameters.dt = delta_time / sub_steps as f32;
            for _ in 0..sub_steps {
                self.pipeline.step(
                    &self.gravity,
                    &self.integration_parameters,
                    &mut self.islands,
                    &mut self.broad_phase,
                    &mut self.narrow_phase,
                    &mut self.bodies,
                    &mut self.colliders,
                    &mut self.impulse_joints,
                    &mut self.multibody_joints,
                    &mut self.ccd_solver,
                    None,
                    &(),
                    &(),
                );
            }
        }
        self.clear_forces();
    }

    /// World pose of a body, `None` if it is not (or no longer) in the world
    pub fn body_pose(&self, handle: BodyHandle) -> Option<Transform> {
        self.bodies
            .get(handle)
            .map(|body| Transform::from_isometry(body.position()))
    }

    /// Linear velocity of a body
    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| *body.linvel())
    }

    /// Angular velocity of a body
    pub fn angular_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| *body.angvel())
    }

    /// Whether the body moves under forces and contacts
    pub fn is_dynamic(&self, handle: BodyHandle) -> bool {
        self.bodies.get(handle).is_some_and(|body| body.is_dynamic())
    }

    /// Push `force` through the point `offset` away from the body's centre
    ///
    /// An off-centre force spins the body as well as moving it: the torque is
    /// `offset × force`. Both are cleared after the next step.
    pub fn apply_force_at(
        &mut self,
        handle: BodyHandle,
        force: Vec3,
        offset: Vec3,
    ) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody)?;
        body.add_force(force, true);
        body.add_torque(offset.cross(&force), true);
        self.pending_forces.push(handle);
        Ok(())
    }

    fn clear_forces(&mut self) {
        for handle in self.pending_forces.drain(..) {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.reset_forces(false);
                body.reset_torques(false);
            }
        }
    }
}
