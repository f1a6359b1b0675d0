//! # Lane Engine
//!
//! A small rigid-body scene engine: renderable model hierarchies, a scene
//! graph, and a `rapier3d` physics world kept in lock-step with it.
//!
//! ## Features
//!
//! - **Hull extraction**: collision shapes derived from visual mesh data
//! - **Body registry**: scene node ↔ physics body association with one owner
//! - **Simulation stepper**: fixed sub-stepping and physics → scene sync
//! - **Configuration**: TOML/RON config files through one trait
//! - **Frame loop**: headless or wall-clock driven application harness
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lane_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         // Build the scene and physics world
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         // Step physics, advance game state
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::headless(1.0 / 60.0, 600);
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, AppEvent, Application};
pub use engine::{Engine, EngineConfig, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{
            math::{Quat, Transform, Vec3},
            time::Timer,
        },
        physics::{
            BodyHandle, BodyMaterial, BodyRegistry, ConvexHullShape, HullCoverage, HullExtractor,
            PhysicsError, PhysicsWorld, RigidBody, RigidBodyFactory, SimulationStepper, StepReport,
        },
        scene::{MeshData, ModelNode, NodeId, SceneGraph, SceneNode, SlotSceneGraph},
        AppError, AppEvent, Application, Engine, EngineConfig, EngineError,
    };
}
