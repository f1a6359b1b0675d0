//! Per-frame simulation step and physics → scene synchronization

use super::registry::BodyRegistry;
use super::world::PhysicsWorld;
use crate::scene::SceneGraph;

/// Fixed number of sub-steps per frame
pub const DEFAULT_SUB_STEPS: u32 = 10;

/// What one [`SimulationStepper::step`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Nodes whose transform was copied from their body
    pub synced: usize,
    /// Registered nodes skipped this frame because the body or the node was missing
    pub skipped: usize,
}

/// Advances the world and copies body poses into scene nodes
///
/// Data flows one way only: body → node. Nothing here writes physics state.
#[derive(Debug, Clone, Copy)]
pub struct SimulationStepper {
    sub_steps: u32,
}

impl Default for SimulationStepper {
    fn default() -> Self {
        Self::new(DEFAULT_SUB_STEPS)
    }
}

impl SimulationStepper {
    /// Create a stepper using `sub_steps` sub-steps per frame
    pub fn new(sub_steps: u32) -> Self {
        Self {
            sub_steps: sub_steps.max(1),
        }
    }

    /// Sub-steps per frame
    pub fn sub_steps(&self) -> u32 {
        self.sub_steps
    }

    /// Advance `world` by `delta_time` and sync every registered node
    ///
    /// Any delta is accepted, zero included. A body without a pose (just
    /// removed, say) is skipped for this frame rather than treated as an error.
    pub fn step(
        &self,
        delta_time: f32,
        world: &mut PhysicsWorld,
        registry: &BodyRegistry,
        scene: &mut dyn SceneGraph,
    ) -> StepReport {
        world.step_simulation(delta_time, self.sub_steps);

        let mut report = StepReport::default();
        for (node_id, handle) in registry.iter() {
            let Some(pose) = world.body_pose(handle) else {
                log::trace!("No motion state for node {node_id:?} this frame");
                report.skipped += 1;
                continue;
            };
            let Some(node) = scene.node_mut(node_id) else {
                log::trace!("Node {node_id:?} is registered but not in the scene");
                report.skipped += 1;
                continue;
            };
            node.transform = pose;
            report.synced += 1;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::foundation::math::{Point3, Transform, Vec3};
    use crate::physics::{BodyMaterial, ConvexHullShape, RigidBody, RigidBodyFactory};
    use crate::scene::{ModelNode, NodeId, SceneNode, SlotSceneGraph};

    struct Fixture {
        scene: SlotSceneGraph,
        world: PhysicsWorld,
        registry: BodyRegistry,
        stepper: SimulationStepper,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scene: SlotSceneGraph::new(),
                world: PhysicsWorld::default(),
                registry: BodyRegistry::new(),
                stepper: SimulationStepper::default(),
            }
        }

        fn spawn(&mut self, name: &str, position: Vec3, mass: f32) -> NodeId {
            let body = box_body(Transform::from_position(position), mass);
            let id = self.scene.add_node(SceneNode::new(
                name,
                body.transform,
                Arc::new(ModelNode::new(name)),
            ));
            self.registry.register(&mut self.world, id, &body);
            id
        }

        fn step(&mut self, delta_time: f32) -> StepReport {
            self.stepper.step(delta_time, &mut self.world, &self.registry, &mut self.scene)
        }
    }

    fn box_body(transform: Transform, mass: f32) -> RigidBody {
        let mut hull = ConvexHullShape::new();
        for x in [-0.1, 0.1] {
            for y in [-0.1, 0.1] {
                for z in [-0.1, 0.1] {
                    hull.add_point(Point3::new(x, y, z));
                }
            }
        }
        RigidBodyFactory::default()
            .build(&hull, transform, mass, BodyMaterial::PIN)
            .unwrap()
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut fixture = Fixture::new();
        let lane = fixture.spawn("Lane", Vec3::new(0.0, -0.5, 0.0), 0.0);
        let start = fixture.scene.node(lane).unwrap().transform;
        // Something heavy lands on it while it is being stepped
        fixture.spawn("Ball", Vec3::new(0.0, 0.0, 0.0), 3.0);

        for delta in [0.0, 1.0 / 60.0, 0.5, 1.0 / 144.0, 0.0, 2.0] {
            fixture.step(delta);
            assert_eq!(fixture.scene.node(lane).unwrap().transform, start);
        }
    }

    #[test]
    fn test_node_transform_equals_body_pose_after_step() {
        let mut fixture = Fixture::new();
        fixture.spawn("Lane", Vec3::new(0.0, -0.5, 0.0), 0.0);
        let pin = fixture.spawn("Pin_Pos_1", Vec3::new(0.05, 0.5, 0.0), 1.0);

        for _ in 0..20 {
            let report = fixture.step(1.0 / 60.0);
            assert_eq!(report, StepReport { synced: 2, skipped: 0 });

            let handle = fixture.registry.handle(pin).unwrap();
            let pose = fixture.world.body_pose(handle).unwrap();
            assert_eq!(fixture.scene.node(pin).unwrap().transform, pose);
        }
        assert!(fixture.scene.node(pin).unwrap().transform.position.y < 0.5);
    }

    #[test]
    fn test_missing_body_is_skipped_not_fatal() {
        let mut fixture = Fixture::new();
        let pin = fixture.spawn("Pin_Pos_1", Vec3::new(0.0, 1.0, 0.0), 1.0);
        let handle = fixture.registry.handle(pin).unwrap();
        let before = fixture.scene.node(pin).unwrap().transform;

        // Body gone from the world while the registry still lists it
        fixture.world.remove_body(handle);
        let report = fixture.step(1.0 / 60.0);

        assert_eq!(report, StepReport { synced: 0, skipped: 1 });
        assert_eq!(fixture.scene.node(pin).unwrap().transform, before);
    }

    #[test]
    fn test_zero_delta_still_syncs() {
        let mut fixture = Fixture::new();
        let pin = fixture.spawn("Pin_Pos_1", Vec3::new(0.0, 1.0, 0.0), 1.0);
        fixture.scene.node_mut(pin).unwrap().transform = Transform::identity();

        let report = fixture.step(0.0);

        assert_eq!(report.synced, 1);
        assert_eq!(
            fixture.scene.node(pin).unwrap().transform,
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0))
        );
    }
}
