//! Coordinate system conversion utilities
//!
//! The scene provider reports locations in a right-handed frame (-Z
//! forward) while the visual host works in a left-handed frame (+Z
//! forward). Switching between the two is a reflection across the XY
//! plane, applied to matrices as `S * M * S` with `S = diag(1, 1, -1, 1)`
//! and to points by negating Z.

use crate::foundation::math::{constants::DEGENERATE_EPSILON, Mat3, Mat4, Point3, Quat, Transform, Vec3};
use nalgebra::Rotation3;

/// Largest accepted `|R^T R - I|` for the normalised basis.
const ORTHONORMAL_TOLERANCE: f32 = 1e-3;

/// Coordinate system conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// Y-up, right-handed (scene provider space)
    YUpRightHanded,
    /// Y-up, left-handed (visual host space)
    YUpLeftHanded,
}

/// Coordinate system converter
#[derive(Debug, Clone, Copy)]
pub struct CoordinateConverter {
    from: CoordinateSystem,
    to: CoordinateSystem,
}

impl CoordinateConverter {
    /// Create a new coordinate converter
    pub fn new(from: CoordinateSystem, to: CoordinateSystem) -> Self {
        Self { from, to }
    }
    
    fn flips_handedness(&self) -> bool {
        self.from != self.to
    }
    
    /// Convert a transform matrix
    pub fn convert_matrix(&self, matrix: &Mat4) -> Mat4 {
        if self.flips_handedness() {
            to_engine_space(matrix)
        } else {
            *matrix
        }
    }
    
    /// Convert a single position
    pub fn convert_point(&self, point: [f32; 3]) -> Vec3 {
        if self.flips_handedness() {
            Vec3::new(point[0], point[1], -point[2])
        } else {
            Vec3::new(point[0], point[1], point[2])
        }
    }
}

impl Default for CoordinateConverter {
    /// Default converter: scene provider space to visual host space
    fn default() -> Self {
        Self::new(CoordinateSystem::YUpRightHanded, CoordinateSystem::YUpLeftHanded)
    }
}

/// Flip the handedness of a transform matrix.
///
/// Negates the six Z cross terms: `(0,2) (1,2) (3,2)` and `(2,0) (2,1) (2,3)`.
/// The Z diagonal and the homogeneous corner are untouched. Applying it
/// twice yields the input.
pub fn to_engine_space(matrix: &Mat4) -> Mat4 {
    let mut m = *matrix;
    for (row, col) in [(0, 2), (1, 2), (3, 2), (2, 0), (2, 1), (2, 3)] {
        m[(row, col)] = -m[(row, col)];
    }
    m
}

/// Decompose an affine, shear-free matrix into translation, rotation and scale.
///
/// Returns `None` when the matrix is not invertible (a collapsed axis or
/// linearly dependent axes) or when its basis is sheared. A reflection is expressed as a negative X scale so that the
/// rotation stays proper.
pub fn try_decompose(matrix: &Mat4) -> Option<Transform> {
    let position = Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
    
    let basis: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let mut scale = Vec3::new(
        basis.column(0).norm(),
        basis.column(1).norm(),
        basis.column(2).norm(),
    );
    if scale.iter().any(|s| *s <= DEGENERATE_EPSILON) {
        return None;
    }
    if basis.determinant().abs() <= DEGENERATE_EPSILON * scale.x * scale.y * scale.z {
        return None;
    }
    
    let mut rotation_matrix = Mat3::from_columns(&[
        basis.column(0) / scale.x,
        basis.column(1) / scale.y,
        basis.column(2) / scale.z,
    ]);
    if (rotation_matrix.transpose() * rotation_matrix - Mat3::identity()).norm() > ORTHONORMAL_TOLERANCE {
        return None;
    }
    if rotation_matrix.determinant() < 0.0 {
        scale.x = -scale.x;
        rotation_matrix.column_mut(0).neg_mut();
    }
    
    let rotation = Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_matrix));
    
    Some(Transform { position, rotation, scale })
}

/// Decompose a matrix, falling back to the identity transform when it is
/// degenerate or sheared.
pub fn decompose(matrix: &Mat4) -> Transform {
    try_decompose(matrix).unwrap_or_else(|| {
        log::warn!("decompose: matrix is singular or sheared, using identity");
        Transform::identity()
    })
}

/// Transform a point by a column-vector affine matrix
pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(point)).coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn sample_matrix() -> Mat4 {
        Transform {
            position: Vec3::new(1.5, -2.0, 3.25),
            rotation: Quat::from_euler_angles(0.3, -1.1, 0.7),
            scale: Vec3::new(2.0, 0.5, 1.25),
        }
        .to_matrix()
    }

    #[test]
    fn test_engine_space_is_involution() {
        let m = sample_matrix();
        assert_eq!(to_engine_space(&to_engine_space(&m)), m);
    }

    #[test]
    fn test_engine_space_touches_only_z_cross_terms() {
        let m = Mat4::from_fn(|r, c| (r * 4 + c + 1) as f32);
        let flipped = to_engine_space(&m);
        for r in 0..4 {
            for c in 0..4 {
                let crosses_z = (r == 2) != (c == 2);
                let expected = if crosses_z { -m[(r, c)] } else { m[(r, c)] };
                assert_eq!(flipped[(r, c)], expected, "entry ({r}, {c})");
            }
        }
    }

    #[test]
    fn test_engine_space_mirrors_points() {
        let m = sample_matrix();
        let p = Vec3::new(0.2, 0.4, -0.8);
        let mirrored = transform_point(&to_engine_space(&m), Vec3::new(p.x, p.y, -p.z));
        let expected = transform_point(&m, p);
        assert_relative_eq!(mirrored, Vec3::new(expected.x, expected.y, -expected.z), epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_recompose() {
        let m = sample_matrix();
        let transform = try_decompose(&m).expect("invertible");
        assert_relative_eq!(transform.to_matrix(), m, epsilon = EPSILON);
        assert_relative_eq!(transform.scale, Vec3::new(2.0, 0.5, 1.25), epsilon = EPSILON);
        assert_relative_eq!(transform.position, Vec3::new(1.5, -2.0, 3.25), epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_engine_space_matrix() {
        // Handedness conversion keeps the determinant, so the result must
        // still decompose into a proper rotation.
        let m = to_engine_space(&sample_matrix());
        let transform = try_decompose(&m).expect("invertible");
        assert_relative_eq!(transform.to_matrix(), m, epsilon = EPSILON);
        assert!(transform.scale.x > 0.0);
    }

    #[test]
    fn test_decompose_reflection() {
        let m = Mat4::new_nonuniform_scaling(&Vec3::new(1.0, 1.0, -1.0));
        let transform = try_decompose(&m).expect("invertible");
        assert!(transform.scale.x < 0.0);
        assert_relative_eq!(transform.to_matrix(), m, epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_degenerate_is_identity() {
        let m = Mat4::new_nonuniform_scaling(&Vec3::new(1.0, 0.0, 1.0));
        assert!(try_decompose(&m).is_none());
        assert_eq!(decompose(&m), Transform::identity());
    }

    #[test]
    fn test_decompose_rejects_dependent_axes() {
        // Every axis has unit length but X and Y coincide.
        let mut m = Mat4::identity();
        m[(0, 1)] = 1.0;
        m[(1, 1)] = 0.0;
        assert_eq!(m.fixed_view::<3, 3>(0, 0).determinant(), 0.0);
        assert!(try_decompose(&m).is_none());
        assert_eq!(decompose(&m), Transform::identity());
    }

    #[test]
    fn test_decompose_rejects_shear() {
        let mut m = Mat4::identity();
        m[(0, 1)] = 0.5;
        assert!(try_decompose(&m).is_none());
        assert_eq!(decompose(&m), Transform::identity());
    }

    #[test]
    fn test_decompose_recompose_table() {
        let translations = [
            Vec3::zeros(),
            Vec3::new(1.5, -2.0, 3.25),
            Vec3::new(-250.0, 40.0, 1000.0),
        ];
        let rotations = [
            Quat::identity(),
            Quat::from_euler_angles(0.3, -1.1, 0.7),
            Quat::from_euler_angles(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            Quat::from_euler_angles(0.0, std::f32::consts::PI, 0.0),
            Quat::from_euler_angles(-2.4, 0.9, 3.0),
        ];
        let scales = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 0.5, 1.25),
            Vec3::new(0.001, 0.002, 0.0015),
            Vec3::new(1000.0, 250.0, 4000.0),
            Vec3::new(0.01, 100.0, 1.0),
        ];
        for position in translations {
            for rotation in rotations {
                for scale in scales {
                    let m = Transform { position, rotation, scale }.to_matrix();
                    let transform = try_decompose(&m)
                        .unwrap_or_else(|| panic!("decompose failed for {position:?} {scale:?}"));
                    let magnitude = m.amax().max(1.0);
                    assert_relative_eq!(transform.to_matrix(), m, epsilon = 1e-5 * magnitude);
                    assert_relative_eq!(transform.scale, scale, max_relative = 1e-4);
                    assert_relative_eq!(transform.position, position, epsilon = EPSILON);
                    assert_relative_eq!(transform.rotation.norm(), 1.0, epsilon = EPSILON);
                }
            }
        }
    }

    #[test]
    fn test_converter_only_flips_across_systems() {
        let flip = CoordinateConverter::default();
        assert_eq!(flip.convert_point([1.0, 2.0, 3.0]), Vec3::new(1.0, 2.0, -3.0));

        let same = CoordinateConverter::new(CoordinateSystem::YUpLeftHanded, CoordinateSystem::YUpLeftHanded);
        let m = sample_matrix();
        assert_eq!(same.convert_matrix(&m), m);
        assert_eq!(flip.convert_matrix(&m), to_engine_space(&m));
    }
}
