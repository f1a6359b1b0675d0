//! Procedural triangle-soup meshes
//!
//! Stand-ins for authored assets: enough shape for a collision hull and a
//! renderer to draw something recognisable.

use std::f32::consts::TAU;

use super::model::MeshData;
use crate::foundation::math::Vec3;

impl MeshData {
    /// Axis-aligned box centred on the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        let corners = [
            [-x, -y, -z], [x, -y, -z], [x, y, -z], [-x, y, -z],
            [-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z],
        ];
        // Two triangles per face, counter-clockwise seen from outside
        const FACES: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // +z
            [1, 0, 3, 2], // -z
            [5, 1, 2, 6], // +x
            [0, 4, 7, 3], // -x
            [7, 6, 2, 3], // +y
            [0, 1, 5, 4], // -y
        ];

        let mut positions = Vec::with_capacity(36);
        for [a, b, c, d] in FACES {
            positions.extend_from_slice(&[corners[a], corners[b], corners[c]]);
            positions.extend_from_slice(&[corners[a], corners[c], corners[d]]);
        }
        Self::new(positions)
    }

    /// Latitude/longitude sphere centred on the origin
    pub fn uv_sphere(radius: f32, rings: u32, segments: u32) -> Self {
        let rings = rings.max(2);
        let segments = segments.max(3);
        let point = |ring: u32, segment: u32| {
            let theta = std::f32::consts::PI * ring as f32 / rings as f32;
            let phi = TAU * segment as f32 / segments as f32;
            [
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ]
        };

        let mut positions = Vec::with_capacity((rings * segments * 6) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let a = point(ring, segment);
                let b = point(ring + 1, segment);
                let c = point(ring + 1, segment + 1);
                let d = point(ring, segment + 1);
                positions.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
        Self::new(positions)
    }

    /// Surface of revolution around the Y axis
    ///
    /// `profile` is a list of `(radius, height)` pairs from bottom to top.
    pub fn lathe(profile: &[(f32, f32)], segments: u32) -> Self {
        let segments = segments.max(3);
        let point = |(radius, height): (f32, f32), segment: u32| {
            let phi = TAU * segment as f32 / segments as f32;
            [radius * phi.cos(), height, radius * phi.sin()]
        };

        let mut positions = Vec::new();
        for pair in profile.windows(2) {
            for segment in 0..segments {
                let a = point(pair[0], segment);
                let b = point(pair[1], segment);
                let c = point(pair[1], segment + 1);
                let d = point(pair[0], segment + 1);
                positions.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
        Self::new(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn max_extent(mesh: &MeshData, axis: usize) -> f32 {
        mesh.positions.iter().map(|p| p[axis]).fold(f32::MIN, f32::max)
    }

    #[test]
    fn test_cuboid_has_twelve_triangles() {
        let mesh = MeshData::cuboid(Vec3::new(0.5, 0.05, 3.0));
        assert_eq!(mesh.triangle_count(), 12);
        assert_relative_eq!(max_extent(&mesh, 0), 0.5);
        assert_relative_eq!(max_extent(&mesh, 1), 0.05);
        assert_relative_eq!(max_extent(&mesh, 2), 3.0);
    }

    #[test]
    fn test_uv_sphere_points_lie_on_radius() {
        let mesh = MeshData::uv_sphere(0.11, 8, 12);
        assert_eq!(mesh.triangle_count(), 8 * 12 * 2);
        for p in &mesh.positions {
            let length = Vec3::new(p[0], p[1], p[2]).norm();
            assert_relative_eq!(length, 0.11, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_lathe_spans_profile_height() {
        let mesh = MeshData::lathe(&[(0.03, 0.0), (0.06, 0.12), (0.02, 0.38)], 10);
        assert_eq!(mesh.triangle_count(), 2 * 10 * 2);
        assert_relative_eq!(max_extent(&mesh, 1), 0.38);
    }
}
