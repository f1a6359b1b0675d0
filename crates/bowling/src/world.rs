//! Scene graph and physics world, kept in step
//!
//! Every node with a body is spawned and despawned here so the scene graph,
//! the registry and the physics world never disagree about what exists.

use std::sync::Arc;

use lane_engine::foundation::math::{Transform, Vec3};
use lane_engine::physics::{
    BodyRegistry, PhysicsError, PhysicsWorld, RigidBody, SimulationStepper, StepReport,
};
use lane_engine::scene::{ModelNode, NodeId, SceneGraph, SceneNode, SlotSceneGraph};

use crate::config::PhysicsConfig;
use crate::settle::Motion;

/// Everything that exists on the lane
pub struct GameWorld {
    scene: SlotSceneGraph,
    physics: PhysicsWorld,
    registry: BodyRegistry,
    stepper: SimulationStepper,
}

impl GameWorld {
    /// Empty world
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            scene: SlotSceneGraph::new(),
            physics: PhysicsWorld::new(Vec3::from(config.gravity)),
            registry: BodyRegistry::new(),
            stepper: SimulationStepper::new(config.sub_steps),
        }
    }

    /// Add a simulated node drawing `model`, placed where `body` starts
    pub fn spawn_body(&mut self, name: &str, model: Arc<ModelNode>, body: &RigidBody) -> NodeId {
        let node = self
            .scene
            .add_node(SceneNode::new(name, body.transform, model));
        self.registry.register(&mut self.physics, node, body);
        node
    }

    /// Add a node with no body
    pub fn add_visual(&mut self, node: SceneNode) -> NodeId {
        self.scene.add_node(node)
    }

    /// Remove a node together with its body, if it has one
    pub fn despawn(&mut self, node: NodeId) -> Option<SceneNode> {
        self.registry.unregister(&mut self.physics, node);
        self.scene.remove_node(node)
    }

    /// Advance physics by `delta_time` and copy poses into the scene
    pub fn step(&mut self, delta_time: f32) -> StepReport {
        self.stepper
            .step(delta_time, &mut self.physics, &self.registry, &mut self.scene)
    }

    /// Push a simulated node with `force` applied `offset` from its centre
    pub fn apply_force(&mut self, node: NodeId, force: Vec3, offset: Vec3) -> Result<(), PhysicsError> {
        let handle = self.registry.handle(node).ok_or(PhysicsError::UnknownBody)?;
        self.physics.apply_force_at(handle, force, offset)
    }

    /// First node named `name`
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.scene.find_node_by_name(name)
    }

    /// Node position as last synchronized
    pub fn position(&self, node: NodeId) -> Option<Vec3> {
        self.scene.node(node).map(|node| node.transform.position)
    }

    /// Node transform as last synchronized
    pub fn transform(&self, node: NodeId) -> Option<Transform> {
        self.scene.node(node).map(|node| node.transform)
    }

    /// Peak speeds over the dynamic bodies of `nodes`
    pub fn peak_motion(&self, nodes: &[NodeId]) -> Motion {
        nodes
            .iter()
            .filter_map(|node| self.registry.handle(*node))
            .filter(|handle| self.physics.is_dynamic(*handle))
            .fold(Motion::default(), |motion, handle| {
                let linear = self.physics.linear_velocity(handle).map_or(0.0, |v| v.norm());
                let angular = self.physics.angular_velocity(handle).map_or(0.0, |v| v.norm());
                motion.include(linear, angular)
            })
    }

    /// Whether `node` has a body
    pub fn is_simulated(&self, node: NodeId) -> bool {
        self.registry.contains(node)
    }

    /// The scene, for drawing
    pub fn scene(&self) -> &dyn SceneGraph {
        &self.scene
    }

    /// The scene, for cosmetic edits to nodes without bodies
    pub fn scene_mut(&mut self) -> &mut dyn SceneGraph {
        &mut self.scene
    }

    /// The physics world
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Node ↔ body links
    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLibrary;
    use crate::config::GameConfig;
    use crate::prefabs::Prefabs;

    fn world_and_prefabs() -> (GameWorld, Prefabs) {
        let config = GameConfig::default();
        let prefabs = Prefabs::load(&AssetLibrary::builtin(), &config).unwrap();
        (GameWorld::new(&config.physics), prefabs)
    }

    #[test]
    fn test_spawn_and_despawn_keep_scene_and_physics_together() {
        let (mut world, prefabs) = world_and_prefabs();
        let pin = world.spawn_body(
            "Pin_Pos_1",
            prefabs.pin.model.clone(),
            &prefabs.pin.body_at(Transform::from_position(Vec3::new(0.0, 0.2, 1.6))),
        );

        assert_eq!(world.scene().node_count(), 1);
        assert_eq!(world.physics().body_count(), 1);
        assert!(world.is_simulated(pin));

        let removed = world.despawn(pin).unwrap();
        assert_eq!(removed.name, "Pin_Pos_1");
        assert_eq!(world.scene().node_count(), 0);
        assert_eq!(world.physics().body_count(), 0);
        assert!(world.registry().is_empty());
    }

    #[test]
    fn test_visual_nodes_have_no_body() {
        let (mut world, prefabs) = world_and_prefabs();
        let preview = world.add_visual(SceneNode::new(
            "Ball",
            Transform::identity(),
            prefabs.ball.model.clone(),
        ));

        assert!(!world.is_simulated(preview));
        assert_eq!(world.physics().body_count(), 0);
        assert!(matches!(
            world.apply_force(preview, Vec3::z(), Vec3::zeros()),
            Err(PhysicsError::UnknownBody)
        ));
        assert!(world.despawn(preview).is_some());
    }

    #[test]
    fn test_peak_motion_ignores_static_bodies() {
        let (mut world, prefabs) = world_and_prefabs();
        let lane = world.spawn_body("Lane", prefabs.lane.model.clone(), prefabs.lane.body());
        let ball = world.spawn_body(
            "Ball",
            prefabs.ball.model.clone(),
            &prefabs.ball.body_at(Transform::from_position(Vec3::new(0.0, 1.0, 0.0))),
        );

        assert_eq!(world.peak_motion(&[lane, ball]), Motion::default());
        world.step(0.1);
        let motion = world.peak_motion(&[lane, ball]);
        assert!(motion.linear > 0.5);
        assert_eq!(world.peak_motion(&[lane]), Motion::default());
    }
}
