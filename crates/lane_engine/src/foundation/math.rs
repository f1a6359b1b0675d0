//! Math utilities and types
//!
//! Thin aliases over `nalgebra` so the scene and physics layers speak the same
//! vector and rotation types as the rigid-body engine.

pub use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Unit quaternion type for rotations, identity is `(0, 0, 0, 1)`
pub type Quat = UnitQuaternion<f32>;

/// Rigid pose: an origin plus a rotation
///
/// There is no scale; everything the physics world touches is rigid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Convert to the isometry type used by the physics engine
    pub fn to_isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position), self.rotation)
    }

    /// Build from a physics isometry
    pub fn from_isometry(isometry: &Isometry3<f32>) -> Self {
        Self {
            position: isometry.translation.vector,
            rotation: isometry.rotation,
        }
    }
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_transform_identity() {
        let transform = Transform::identity();

        assert_eq!(transform.position, Vec3::zeros());
        assert_relative_eq!(transform.rotation, Quat::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_isometry_round_trip_keeps_pose() {
        let rotation = Quat::from_euler_angles(0.3, -1.2, 0.7);
        let transform = Transform::from_position_rotation(Vec3::new(1.0, -2.0, 3.5), rotation);

        let back = Transform::from_isometry(&transform.to_isometry());

        assert_relative_eq!(back.position, transform.position, epsilon = EPSILON);
        assert_relative_eq!(back.rotation, transform.rotation, epsilon = EPSILON);
    }

    #[test]
    fn test_lerp_and_clamp() {
        assert_relative_eq!(utils::lerp(0.5, -0.5, 0.25), 0.25, epsilon = EPSILON);
        assert_relative_eq!(utils::clamp(1.5, 0.0, 1.0), 1.0, epsilon = EPSILON);
        assert_relative_eq!(utils::clamp(-0.5, 0.0, 1.0), 0.0, epsilon = EPSILON);
    }
}
