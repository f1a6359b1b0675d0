//! Convex hull extraction from model hierarchies
//!
//! Walks every mesh under a [`ModelNode`] and collects its vertex positions as
//! hull points. The hull itself is only computed when the shape is turned into
//! a physics collider, so the order in which points arrive does not matter.

use rapier3d::prelude::SharedShape;
use serde::{Deserialize, Serialize};

use super::PhysicsError;
use crate::foundation::math::{Point3, Vec3};
use crate::scene::ModelNode;

/// Default collision margin: surfaces closer than this are touching
pub const DEFAULT_MARGIN: f32 = 0.01;

/// Which triangles of each mesh contribute hull points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HullCoverage {
    /// Every triangle
    #[default]
    AllTriangles,
    /// Every triangle except the last one of each mesh
    ///
    /// Reproduces the legacy loop bound, which stopped three vertices short of
    /// the end of the position buffer.
    SkipLastTriangle,
}

/// Point cloud approximating a convex hull, plus a collision margin
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHullShape {
    points: Vec<Point3>,
    margin: f32,
}

impl Default for ConvexHullShape {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvexHullShape {
    /// Create an empty hull with the default margin
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            margin: DEFAULT_MARGIN,
        }
    }

    /// Create a hull from points
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Self {
        Self {
            points: points.into_iter().collect(),
            margin: DEFAULT_MARGIN,
        }
    }

    /// Add a hull point
    pub fn add_point(&mut self, point: Point3) {
        self.points.push(point);
    }

    /// Points added so far
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of points added so far
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point has been added
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Collision margin
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Set the collision margin
    pub fn set_margin(&mut self, margin: f32) {
        self.margin = margin.max(0.0);
    }

    /// Local-space bounds of the points, `None` when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.points.first()?.coords;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (min.inf(&p.coords), max.sup(&p.coords))
        }))
    }

    /// Build the physics collision shape: the convex hull of the points,
    /// rounded by the margin
    pub fn to_shared_shape(&self) -> Result<SharedShape, PhysicsError> {
        let degenerate = || PhysicsError::DegenerateGeometry(format!(
            "{} hull points do not span a volume",
            self.points.len()
        ));

        if self.points.len() < 4 {
            return Err(degenerate());
        }
        let shape = if self.margin > 0.0 {
            SharedShape::round_convex_hull(&self.points, self.margin)
        } else {
            SharedShape::convex_hull(&self.points)
        };
        shape.ok_or_else(degenerate)
    }
}

/// Derives collision hulls from renderable meshes
#[derive(Debug, Clone, Copy, Default)]
pub struct HullExtractor {
    coverage: HullCoverage,
}

impl HullExtractor {
    /// Create an extractor with the given triangle coverage
    pub fn new(coverage: HullCoverage) -> Self {
        Self { coverage }
    }

    /// Triangle coverage in use
    pub fn coverage(&self) -> HullCoverage {
        self.coverage
    }

    /// Collect hull points from every mesh under `node`
    ///
    /// Mesh positions are taken as stored, in the mesh's own model space. A
    /// node without meshes yields an empty hull.
    pub fn extract(&self, node: &ModelNode) -> ConvexHullShape {
        let mut shape = ConvexHullShape::new();

        node.traverse(&mut |child| {
            let Some(mesh) = &child.mesh else {
                return;
            };
            let triangles = mesh.flat_positions().chunks_exact(9);
            let keep = match self.coverage {
                HullCoverage::AllTriangles => triangles.len(),
                HullCoverage::SkipLastTriangle => triangles.len().saturating_sub(1),
            };
            for triangle in triangles.take(keep) {
                for vertex in triangle.chunks_exact(3) {
                    shape.add_point(Point3::new(vertex[0], vertex[1], vertex[2]));
                }
            }
        });

        shape
    }

    /// Like [`extract`](Self::extract), but an empty hull is an error
    ///
    /// Use this for bodies the scene cannot do without; a made-up default
    /// shape would make them behave misleadingly.
    pub fn extract_required(&self, node: &ModelNode) -> Result<ConvexHullShape, PhysicsError> {
        let shape = self.extract(node);
        if shape.is_empty() {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "node '{}' has no mesh data",
                node.name
            )));
        }
        log::debug!("Extracted {} hull points from '{}'", shape.len(), node.name);
        Ok(shape)
    }
}
