//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene pipeline. All
//! matrices follow the column-vector convention: translation lives in the
//! last column and points are transformed as `M * p`.

pub use nalgebra::{Matrix3, Matrix4, Vector2, Vector3};
use nalgebra::{Quaternion, Unit};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,
    
    /// Rotation quaternion
    pub rotation: Quat,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
    
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::identity()
        }
    }
    
    /// Convert to a transformation matrix (translate * rotate * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
    
    /// Drop the scale component, keeping position and rotation.
    ///
    /// Scene containers are placed with a pose only; the scale of the
    /// source location is not carried over to the visual host.
    pub fn without_scale(&self) -> Self {
        Self::from_position_rotation(self.position, self.rotation)
    }
}

/// Build a matrix from sixteen row-major values.
pub fn mat4_from_rows(rows: &[[f32; 4]; 4]) -> Mat4 {
    Mat4::new(
        rows[0][0], rows[0][1], rows[0][2], rows[0][3],
        rows[1][0], rows[1][1], rows[1][2], rows[1][3],
        rows[2][0], rows[2][1], rows[2][2], rows[2][3],
        rows[3][0], rows[3][1], rows[3][2], rows[3][3],
    )
}

/// Flatten a matrix into row-major rows.
pub fn mat4_to_rows(matrix: &Mat4) -> [[f32; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = matrix[(r, c)];
        }
    }
    rows
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;
    
    /// Tolerance under which a basis vector is treated as collapsed
    pub const DEGENERATE_EPSILON: f32 = 1e-6;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_identity_matrix() {
        assert_relative_eq!(Transform::identity().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_rows_round_trip() {
        let rows = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let matrix = mat4_from_rows(&rows);
        assert_eq!(matrix[(0, 3)], 4.0);
        assert_eq!(matrix[(2, 0)], 9.0);
        assert_eq!(mat4_to_rows(&matrix), rows);
    }

    #[test]
    fn test_without_scale_keeps_pose() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), 0.5),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let pose = transform.without_scale();
        assert_eq!(pose.position, transform.position);
        assert_eq!(pose.rotation, transform.rotation);
        assert_eq!(pose.scale, Vec3::new(1.0, 1.0, 1.0));
    }
}
