//! Synthetic point clouds for the rotation fit.

use crate::{Mat3, Real, Vec3};

/// Planar grid of `nx * ny` points (z = 0) centred on the origin.
///
/// Points are ordered deterministically in row-major order (Y major).
pub fn grid_points(nx: usize, ny: usize, spacing: Real) -> Vec<Vec3> {
    let x0 = 0.5 * nx.saturating_sub(1) as Real;
    let y0 = 0.5 * ny.saturating_sub(1) as Real;
    let mut points = Vec::with_capacity(nx.saturating_mul(ny));

    for j in 0..ny {
        for i in 0..nx {
            points.push(Vec3::new(
                (i as Real - x0) * spacing,
                (j as Real - y0) * spacing,
                0.0,
            ));
        }
    }
    points
}

/// The eight corners of an axis-aligned box centred on the origin.
///
/// All mixed moments (`Σxy`, `Σxz`, `Σyz`) vanish, so the inertia tensor of
/// the corners is diagonal.
pub fn box_corners(half_extents: Vec3) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(8);
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                points.push(Vec3::new(
                    sx * half_extents.x,
                    sy * half_extents.y,
                    sz * half_extents.z,
                ));
            }
        }
    }
    points
}

/// Apply `rotation` to every point (`rotation · p`).
pub fn rotated(rotation: &Mat3, points: &[Vec3]) -> Vec<Vec3> {
    points.iter().map(|p| rotation * p).collect()
}
