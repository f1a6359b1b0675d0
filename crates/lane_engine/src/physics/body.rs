//! Rigid body descriptions and the factory that builds them
//!
//! A [`RigidBody`] here is a complete description of a body that has not yet
//! joined any world. Inserting it is the registry's job.

use rapier3d::prelude::SharedShape;
use serde::{Deserialize, Serialize};

use super::hull::{ConvexHullShape, DEFAULT_MARGIN};
use super::PhysicsError;
use crate::foundation::math::{Transform, Vec3};

/// Per-body surface properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMaterial {
    /// Sliding friction coefficient
    pub friction: f32,
    /// Resistance to continued rotation once in contact
    pub rolling_friction: f32,
    /// Bounce factor, fraction of relative velocity kept after a collision
    pub restitution: f32,
}

impl BodyMaterial {
    /// Lane surface
    pub const LANE: Self = Self::new(0.5, 0.1, 0.2);
    /// Pins
    pub const PIN: Self = Self::new(0.4, 0.1, 1.0);
    /// Thrown ball
    pub const BALL: Self = Self::new(0.5, 0.05, 0.9);

    /// Create a material
    pub const fn new(friction: f32, rolling_friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            rolling_friction,
            restitution,
        }
    }
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self::new(0.5, 0.0, 0.0)
    }
}

/// A rigid body ready to be inserted into a [`PhysicsWorld`](super::PhysicsWorld)
#[derive(Clone)]
pub struct RigidBody {
    /// Mass in kilograms; zero means static
    pub mass: f32,
    /// Collision shape, margin already applied
    pub shape: SharedShape,
    /// Initial pose
    pub transform: Transform,
    /// Surface properties
    pub material: BodyMaterial,
    /// Principal moments of inertia derived from mass and shape
    pub local_inertia: Vec3,
}

impl RigidBody {
    /// Static bodies never move, whatever hits them
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}

impl std::fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigidBody")
            .field("mass", &self.mass)
            .field("shape", &self.shape.shape_type())
            .field("transform", &self.transform)
            .field("material", &self.material)
            .field("local_inertia", &self.local_inertia)
            .finish()
    }
}

/// Builds [`RigidBody`] descriptions from hull shapes
#[derive(Debug, Clone, Copy)]
pub struct RigidBodyFactory {
    margin: f32,
}

impl Default for RigidBodyFactory {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

impl RigidBodyFactory {
    /// Create a factory applying `margin` to every shape it builds
    pub fn new(margin: f32) -> Self {
        Self { margin: margin.max(0.0) }
    }

    /// Margin applied to built shapes
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Build a body description
    ///
    /// `mass == 0` gives a static body with zero inertia. Negative or
    /// non-finite masses are rejected.
    pub fn build(
        &self,
        shape: &ConvexHullShape,
        transform: Transform,
        mass: f32,
        material: BodyMaterial,
    ) -> Result<RigidBody, PhysicsError> {
        if !mass.is_finite() || mass < 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }

        let mut shape = shape.clone();
        shape.set_margin(self.margin);
        let shape = shape.to_shared_shape()?;
        let local_inertia = local_inertia(&shape, mass);

        Ok(RigidBody {
            mass,
            shape,
            transform,
            material,
            local_inertia,
        })
    }
}

/// Inertia of `shape` scaled to `mass`, zero for static bodies
fn local_inertia(shape: &SharedShape, mass: f32) -> Vec3 {
    if mass == 0.0 {
        return Vec3::zeros();
    }
    let unit_density = shape.mass_properties(1.0);
    let volume = unit_density.mass();
    if volume <= f32::EPSILON {
        return Vec3::zeros();
    }
    unit_density.principal_inertia() * (mass / volume)
}
