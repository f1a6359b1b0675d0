//! Renderable model hierarchy
//!
//! A [`ModelNode`] is what an asset source hands over: a named node with a local
//! transform, an optional mesh and any number of children. Meshes are plain
//! triangle soups, three consecutive positions per triangle.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Transform;

/// Vertex positions of a single mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Model-space positions, three per triangle
    pub positions: Vec<[f32; 3]>,
}

impl MeshData {
    /// Create a mesh from positions
    pub fn new(positions: Vec<[f32; 3]>) -> Self {
        Self { positions }
    }

    /// Create a mesh from a flat `x, y, z, x, y, z, ...` buffer
    ///
    /// Trailing floats that do not make up a whole position are dropped.
    pub fn from_flat(flat: &[f32]) -> Self {
        let positions = flat
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        Self { positions }
    }

    /// Flat position buffer, the layout a GPU vertex attribute would have
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of whole triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Node of a model hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelNode {
    /// Node name, used for lookups such as `Pin_Pos_3`
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform,
    /// Mesh attached to this node, if any
    pub mesh: Option<MeshData>,
    /// Child nodes
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    /// Create an empty node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: attach a mesh
    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Builder pattern: set the local transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: append a child
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Whether this node carries a mesh
    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Depth-first, pre-order visit of this node and every descendant
    pub fn traverse<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// First node named `name` in traversal order, including `self`
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Every mesh in the hierarchy, in traversal order
    pub fn meshes(&self) -> Vec<&MeshData> {
        let mut meshes = Vec::new();
        self.traverse(&mut |node| {
            if let Some(mesh) = &node.mesh {
                meshes.push(mesh);
            }
        });
        meshes
    }
}
