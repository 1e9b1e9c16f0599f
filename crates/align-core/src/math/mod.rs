//! Mathematical type definitions shared by the alignment crates.
//!
//! Rotation matrices are stored as plain [`Mat3`] rather than
//! `nalgebra::Rotation3` so that numerical drift can be observed and removed
//! with [`crate::rectify`]. Matrices are constructed row-major and act on
//! column vectors.

use nalgebra::{Matrix3, Matrix6, Point3, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries, used for rotations.
pub type Mat3 = Matrix3<Real>;
/// 6×6 error matrix attached to survey records.
pub type ErrorMatrix = Matrix6<Real>;
/// Ordered Euler angles `(alpha, beta, gamma)` in radians.
pub type EulerAngles = Vector3<Real>;

/// Convert a `[x, y, z]` array into a [`Vec3`].
pub fn vec3_from_array(v: [Real; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

/// Convert a [`Vec3`] into a `[x, y, z]` array.
pub fn vec3_to_array(v: &Vec3) -> [Real; 3] {
    [v.x, v.y, v.z]
}

/// Convert a matrix into nested row arrays (row-major).
pub fn mat3_to_rows(m: &Mat3) -> [[Real; 3]; 3] {
    let mut rows = [[0.0; 3]; 3];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = m[(r, c)];
        }
    }
    rows
}
