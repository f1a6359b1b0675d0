//! Named scene assets
//!
//! The round needs a handful of named nodes: `Lane`, `Ball`, `Pin` and the ten
//! slot markers `Pin_Pos_1` to `Pin_Pos_10`. They come either from the built-in
//! procedural lane or from a RON manifest holding a [`ModelNode`] tree.

use std::path::Path;

use lane_engine::foundation::math::{Transform, Vec3};
use lane_engine::scene::{MeshData, ModelNode};

use crate::error::GameError;

/// Lane node name
pub const LANE: &str = "Lane";
/// Ball node name
pub const BALL: &str = "Ball";
/// Pin model node name
pub const PIN: &str = "Pin";
/// Number of pin slots
pub const PIN_SLOTS: usize = 10;

/// Name of pin slot `index` (1-based)
pub fn pin_slot_name(index: usize) -> String {
    format!("Pin_Pos_{index}")
}

/// Supplies named model nodes; the core never parses asset files itself
pub trait AssetSource {
    /// Node named `name`, anywhere in the source
    fn find(&self, name: &str) -> Option<&ModelNode>;
}

/// Asset source backed by one model tree
#[derive(Debug, Clone, PartialEq)]
pub struct AssetLibrary {
    root: ModelNode,
}

impl AssetLibrary {
    /// Wrap an existing model tree
    pub fn new(root: ModelNode) -> Self {
        Self { root }
    }

    /// Root of the tree
    pub fn root(&self) -> &ModelNode {
        &self.root
    }

    /// Load a RON manifest holding a serialized [`ModelNode`] tree
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GameError::Asset(format!("{}: {e}", path.display())))?;
        let root: ModelNode = ron::from_str(&contents)
            .map_err(|e| GameError::Asset(format!("{}: {e}", path.display())))?;
        log::info!("Loaded asset manifest {}", path.display());
        Ok(Self::new(root))
    }

    /// Built-in lane: a slab, a ball, a pin and a standard ten-pin rack
    ///
    /// The lane's top face sits at y = -0.19 so a standing pin, whose origin is
    /// at its middle, rests just above y = 0 and a toppled one lies below it.
    pub fn builtin() -> Self {
        const SPACING: f32 = 0.305;
        const HEAD_PIN_Z: f32 = 1.6;

        let lane = ModelNode::new(LANE)
            .with_mesh(MeshData::cuboid(Vec3::new(0.65, 0.05, 2.8)))
            .with_transform(Transform::from_position(Vec3::new(0.0, -0.24, -0.2)));

        let ball = ModelNode::new(BALL).with_mesh(MeshData::uv_sphere(0.11, 12, 16));

        let pin = ModelNode::new(PIN).with_mesh(MeshData::lathe(
            &[
                (0.0, -0.19),
                (0.03, -0.19),
                (0.05, -0.12),
                (0.06, -0.05),
                (0.04, 0.05),
                (0.025, 0.1),
                (0.035, 0.15),
                (0.025, 0.185),
                (0.0, 0.19),
            ],
            12,
        ));

        let row_depth = SPACING * 3.0_f32.sqrt() / 2.0;
        let mut root = ModelNode::new("Bowling").with_child(lane).with_child(ball).with_child(pin);
        let mut index = 1;
        for row in 0..4_usize {
            for column in 0..=row {
                let x = (column as f32 - row as f32 / 2.0) * SPACING;
                let z = HEAD_PIN_Z + row as f32 * row_depth;
                root = root.with_child(
                    ModelNode::new(pin_slot_name(index))
                        .with_transform(Transform::from_position(Vec3::new(x, 0.0, z))),
                );
                index += 1;
            }
        }

        Self::new(root)
    }
}

impl AssetSource for AssetLibrary {
    fn find(&self, name: &str) -> Option<&ModelNode> {
        self.root.find(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_every_named_node() {
        let library = AssetLibrary::builtin();

        for name in [LANE, BALL, PIN] {
            assert!(library.find(name).is_some_and(ModelNode::is_mesh), "{name}");
        }
        for index in 1..=PIN_SLOTS {
            assert!(library.find(&pin_slot_name(index)).is_some(), "slot {index}");
        }
        assert!(library.find(&pin_slot_name(PIN_SLOTS + 1)).is_none());
    }

    #[test]
    fn test_rack_sits_on_the_lane() {
        let library = AssetLibrary::builtin();
        let lane = library.find(LANE).unwrap();
        let lane_far_end = lane.transform.position.z + 2.8;

        let slots: Vec<Vec3> = (1..=PIN_SLOTS)
            .map(|i| library.find(&pin_slot_name(i)).unwrap().transform.position)
            .collect();

        assert_eq!(slots[0].x, 0.0);
        for slot in &slots {
            assert!(slot.x.abs() < 0.65);
            assert!(slot.z > 0.0 && slot.z < lane_far_end);
        }
        // Slots never overlap
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!((a - b).norm() > 0.2);
            }
        }
    }

    #[test]
    fn test_ron_manifest_round_trip() {
        let library = AssetLibrary::builtin();
        let path = std::env::temp_dir().join(format!("bowling_assets_{}.ron", std::process::id()));
        std::fs::write(&path, ron::to_string(library.root()).unwrap()).unwrap();

        let loaded = AssetLibrary::load_ron(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.root().name, library.root().name);
        assert_eq!(loaded.root().children.len(), library.root().children.len());
        assert_eq!(
            loaded.find(PIN).and_then(|pin| pin.mesh.as_ref()).map(MeshData::vertex_count),
            library.find(PIN).and_then(|pin| pin.mesh.as_ref()).map(MeshData::vertex_count)
        );
    }

    #[test]
    fn test_missing_manifest_is_an_asset_error() {
        let result = AssetLibrary::load_ron("/definitely/not/here.ron");
        assert!(matches!(result, Err(GameError::Asset(_))));
    }
}
