//! Ready-to-spawn lane, pin and ball templates
//!
//! Hulls are extracted and bodies built once, at session start. A missing node
//! or a mesh that cannot make a hull fails here, before anything is simulated.

use std::sync::Arc;

use lane_engine::foundation::math::Transform;
use lane_engine::physics::{HullExtractor, RigidBody, RigidBodyFactory};
use lane_engine::scene::ModelNode;

use crate::assets::{AssetSource, BALL, LANE, PIN};
use crate::config::{BodyConfig, GameConfig};
use crate::error::GameError;

/// A model plus the body every instance of it gets
#[derive(Debug, Clone)]
pub struct Prefab {
    /// Model drawn for each instance
    pub model: Arc<ModelNode>,
    body: RigidBody,
}

impl Prefab {
    /// Look up `name` and build its body
    pub fn load(
        assets: &dyn AssetSource,
        name: &str,
        extractor: &HullExtractor,
        factory: &RigidBodyFactory,
        body: &BodyConfig,
    ) -> Result<Self, GameError> {
        let model = assets.find(name).ok_or_else(|| GameError::missing(name))?;
        let hull = extractor.extract_required(model)?;
        let body = factory.build(&hull, model.transform, body.mass, body.material)?;

        Ok(Self {
            model: Arc::new(model.clone()),
            body,
        })
    }

    /// Body description placed at `transform`
    pub fn body_at(&self, transform: Transform) -> RigidBody {
        RigidBody {
            transform,
            ..self.body.clone()
        }
    }

    /// Body description at the model's own placement
    pub fn body(&self) -> &RigidBody {
        &self.body
    }
}

/// Every template a session needs
#[derive(Debug, Clone)]
pub struct Prefabs {
    /// Static lane
    pub lane: Prefab,
    /// Pin, cloned into each slot
    pub pin: Prefab,
    /// Ball, both the swaying preview and thrown instances
    pub ball: Prefab,
}

impl Prefabs {
    /// Build all templates from `assets`
    pub fn load(assets: &dyn AssetSource, config: &GameConfig) -> Result<Self, GameError> {
        let extractor = HullExtractor::new(config.physics.hull_coverage);
        let factory = RigidBodyFactory::new(config.physics.margin);
        let prefabs = Self {
            lane: Prefab::load(assets, LANE, &extractor, &factory, &config.lane.body())?,
            pin: Prefab::load(assets, PIN, &extractor, &factory, &config.pin.body())?,
            ball: Prefab::load(assets, BALL, &extractor, &factory, &config.ball.body())?,
        };
        log::debug!("Built lane, pin and ball prefabs");
        Ok(prefabs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLibrary;
    use lane_engine::foundation::math::Vec3;
    use lane_engine::physics::PhysicsError;

    #[test]
    fn test_builtin_prefabs_use_configured_masses() {
        let prefabs = Prefabs::load(&AssetLibrary::builtin(), &GameConfig::default()).unwrap();

        assert!(prefabs.lane.body().is_static());
        assert_eq!(prefabs.pin.body().mass, 1.0);
        assert_eq!(prefabs.ball.body().mass, 3.0);
        assert_eq!(prefabs.pin.body().material, GameConfig::default().pin.material);
    }

    #[test]
    fn test_body_at_only_moves_the_body() {
        let prefabs = Prefabs::load(&AssetLibrary::builtin(), &GameConfig::default()).unwrap();
        let placed = prefabs.pin.body_at(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));

        assert_eq!(placed.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(placed.mass, prefabs.pin.body().mass);
        assert_eq!(placed.local_inertia, prefabs.pin.body().local_inertia);
    }

    #[test]
    fn test_missing_node_is_a_construction_error() {
        let assets = AssetLibrary::new(ModelNode::new("Empty"));
        let result = Prefabs::load(&assets, &GameConfig::default());

        assert!(matches!(result, Err(GameError::Construction { name }) if name == LANE));
    }

    #[test]
    fn test_meshless_node_is_degenerate() {
        let mut root = AssetLibrary::builtin().root().clone();
        root.children.retain(|child| child.name != PIN);
        root.children.push(ModelNode::new(PIN));

        let result = Prefabs::load(&AssetLibrary::new(root), &GameConfig::default());
        assert!(matches!(
            result,
            Err(GameError::Physics(PhysicsError::DegenerateGeometry(_)))
        ));
    }
}
