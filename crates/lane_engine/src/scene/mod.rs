//! Scene management system
//!
//! The visual side of the physics/visual pair:
//!
//! ```text
//! Asset source ──> ModelNode hierarchy (shared, immutable)
//!                        │
//!                        ▼
//!                  SceneGraph of SceneNodes (name + transform + model)
//!                        ▲
//!                        │ transforms copied once per step
//!                  Simulation stepper (physics is authoritative)
//! ```

mod model;
mod primitives;
mod scene_graph;

pub use model::{MeshData, ModelNode};
pub use scene_graph::{NodeId, SceneGraph, SceneNode, SlotSceneGraph};
