//! Scene graph trait and implementations
//!
//! The scene graph owns the renderable nodes. It knows nothing about physics:
//! the link from a node to its rigid body lives in the physics
//! [`BodyRegistry`](crate::physics::BodyRegistry), keyed by [`NodeId`].

use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use super::model::ModelNode;
use crate::foundation::math::Transform;

new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`]
    pub struct NodeId;
}

/// A renderable node placed in the scene
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, used by [`SceneGraph::find_node_by_name`]
    pub name: String,
    /// World transform; written by the simulation stepper for simulated nodes
    pub transform: Transform,
    /// Shared model the renderer draws for this node
    pub model: Arc<ModelNode>,
}

impl SceneNode {
    /// Create a node drawing `model` at `transform`
    pub fn new(name: impl Into<String>, transform: Transform, model: Arc<ModelNode>) -> Self {
        Self {
            name: name.into(),
            transform,
            model,
        }
    }

    /// Create a node that keeps the model's own name and transform
    pub fn from_model(model: Arc<ModelNode>) -> Self {
        Self {
            name: model.name.clone(),
            transform: model.transform,
            model,
        }
    }
}

/// Trait for scene containers
///
/// Nodes are owned by the graph; callers hold [`NodeId`]s. Ids of removed nodes
/// are never reused.
pub trait SceneGraph: Send + Sync {
    /// Add a node, returning its id
    fn add_node(&mut self, node: SceneNode) -> NodeId;

    /// Remove a node, handing it back if it was present
    fn remove_node(&mut self, id: NodeId) -> Option<SceneNode>;

    /// First node with the given name, in insertion order
    fn find_node_by_name(&self, name: &str) -> Option<NodeId>;

    /// Borrow a node
    fn node(&self, id: NodeId) -> Option<&SceneNode>;

    /// Mutably borrow a node
    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode>;

    /// Ids of every node, in insertion order
    fn node_ids(&self) -> Vec<NodeId>;

    /// Get the total number of nodes in the scene graph
    fn node_count(&self) -> usize;

    /// Whether `id` refers to a live node
    fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }
}

/// Slotmap-backed scene graph
///
/// Linear search for name lookups, which is plenty for a lane, a ball and ten
/// pins.
#[derive(Debug, Default)]
pub struct SlotSceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    order: Vec<NodeId>,
}

impl SlotSceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneGraph for SlotSceneGraph {
    fn add_node(&mut self, node: SceneNode) -> NodeId {
        let id = self.nodes.insert(node);
        self.order.push(id);
        id
    }

    fn remove_node(&mut self, id: NodeId) -> Option<SceneNode> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|existing| *existing != id);
        Some(node)
    }

    fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.nodes.get(*id).is_some_and(|node| node.name == name))
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.order.clone()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn node(name: &str) -> SceneNode {
        SceneNode::new(name, Transform::identity(), Arc::new(ModelNode::new(name)))
    }

    #[test]
    fn test_add_find_remove() {
        let mut graph = SlotSceneGraph::new();
        let lane = graph.add_node(node("Lane"));
        let ball = graph.add_node(node("Ball"));
        assert_eq!(graph.node_count(), 2);

        assert_eq!(graph.find_node_by_name("Ball"), Some(ball));
        assert_eq!(graph.find_node_by_name("Pin"), None);

        let removed = graph.remove_node(ball).map(|n| n.name);
        assert_eq!(removed.as_deref(), Some("Ball"));
        assert!(!graph.contains(ball));
        assert!(graph.contains(lane));
        assert_eq!(graph.remove_node(ball).map(|n| n.name), None);
    }

    #[test]
    fn test_find_prefers_insertion_order() {
        let mut graph = SlotSceneGraph::new();
        let first = graph.add_node(node("Ball"));
        let _second = graph.add_node(node("Ball"));
        assert_eq!(graph.find_node_by_name("Ball"), Some(first));
    }

    #[test]
    fn test_readded_node_gets_fresh_id() {
        let mut graph = SlotSceneGraph::new();
        let id = graph.add_node(node("Ball"));
        let detached = graph.remove_node(id).unwrap();
        let again = graph.add_node(detached);

        assert_ne!(id, again);
        assert_eq!(graph.node_ids(), vec![again]);
    }

    #[test]
    fn test_node_mut_writes_transform() {
        let mut graph = SlotSceneGraph::new();
        let id = graph.add_node(node("Pin_Pos_1"));
        graph.node_mut(id).unwrap().transform.position = Vec3::new(0.0, -1.0, 0.0);
        assert!(graph.node(id).unwrap().transform.position.y < 0.0);
    }

    #[test]
    fn test_from_model_copies_name_and_transform() {
        let model = ModelNode::new("Ball")
            .with_transform(Transform::from_position(Vec3::new(0.0, 0.2, -2.4)));
        let placed = SceneNode::from_model(Arc::new(model));
        assert_eq!(placed.name, "Ball");
        assert!((placed.transform.position.z + 2.4).abs() < f32::EPSILON);
    }
}
