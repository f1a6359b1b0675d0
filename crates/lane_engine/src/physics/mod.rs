//! Rigid-body physics and physics → scene synchronization
//!
//! The physics layer owns simulation state; the scene graph only ever receives
//! copies of body poses. Bodies are described by a [`RigidBody`], inserted
//! through a [`BodyRegistry`] that links them to scene nodes, and advanced once
//! per frame by a [`SimulationStepper`].

pub mod body;
pub mod hull;
pub mod registry;
pub mod stepper;
pub mod world;

use thiserror::Error;

pub use body::{BodyMaterial, RigidBody, RigidBodyFactory};
pub use hull::{ConvexHullShape, HullCoverage, HullExtractor, DEFAULT_MARGIN};
pub use registry::BodyRegistry;
pub use stepper::{SimulationStepper, StepReport, DEFAULT_SUB_STEPS};
pub use world::{BodyHandle, PhysicsWorld, DEFAULT_GRAVITY};

/// Physics errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A hull could not be built from the available points
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Masses must be finite and non-negative
    #[error("Invalid mass: {0}")]
    InvalidMass(f32),

    /// The handle does not refer to a body in the world
    #[error("Unknown body handle")]
    UnknownBody,
}
