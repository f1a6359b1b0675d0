//! Scene node ↔ physics body association
//!
//! The registry is the only place that knows which body belongs to which
//! node. Nodes never point at bodies, so the scene layer stays free of physics
//! types.

use slotmap::SecondaryMap;

use super::body::RigidBody;
use super::world::{BodyHandle, PhysicsWorld};
use crate::scene::NodeId;

/// Bodies currently simulated on behalf of scene nodes
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: SecondaryMap<NodeId, BodyHandle>,
}

impl BodyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `body` into `world` and link it to `node`
    ///
    /// Registering a node twice replaces its old body, which is removed from
    /// the world first so no body is left without a node.
    pub fn register(&mut self, world: &mut PhysicsWorld, node: NodeId, body: &RigidBody) -> BodyHandle {
        let handle = world.add_body(body);
        if let Some(previous) = self.bodies.insert(node, handle) {
            world.remove_body(previous);
            log::debug!("Replaced body of node {node:?}");
        }
        handle
    }

    /// Remove the node's body from `world` and forget the link
    ///
    /// The caller still owns removing the node from the scene graph; do both or
    /// leave either a ghost body or a frozen visual behind.
    pub fn unregister(&mut self, world: &mut PhysicsWorld, node: NodeId) -> Option<BodyHandle> {
        let handle = self.bodies.remove(node)?;
        if !world.remove_body(handle) {
            log::trace!("Body of node {node:?} was already gone from the world");
        }
        Some(handle)
    }

    /// Body linked to `node`
    pub fn handle(&self, node: NodeId) -> Option<BodyHandle> {
        self.bodies.get(node).copied()
    }

    /// Whether `node` has a body
    pub fn contains(&self, node: NodeId) -> bool {
        self.bodies.contains_key(node)
    }

    /// Number of linked nodes
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no node is linked
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Every `(node, body)` pair
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, BodyHandle)> + '_ {
        self.bodies.iter().map(|(node, handle)| (node, *handle))
    }
}
