//! Rotation matrix construction and Euler angle conversion.
//!
//! All matrices follow the frame-rotation convention used by the alignable
//! tree: `rot_z(θ) = [[cos θ, sin θ, 0], [-sin θ, cos θ, 0], [0, 0, 1]]`,
//! row-major, acting on column vectors.

use log::warn;
use nalgebra::Unit;

use crate::{AlignError, EulerAngles, Mat3, Real, Vec3};

/// Rotation by `radians` about the x axis.
pub fn rot_x(radians: Real) -> Mat3 {
    let (s, c) = radians.sin_cos();
    Mat3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation by `radians` about the y axis.
pub fn rot_y(radians: Real) -> Mat3 {
    let (s, c) = radians.sin_cos();
    Mat3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Rotation by `radians` about the z axis.
pub fn rot_z(radians: Real) -> Mat3 {
    let (s, c) = radians.sin_cos();
    Mat3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Rotation by `radians` about an arbitrary axis (normalized internally).
///
/// Reduces to [`rot_x`], [`rot_y`] and [`rot_z`] for the principal axes.
///
/// # Errors
/// [`AlignError::ZeroAxis`] if `axis` has (numerically) zero length.
pub fn axis_angle_rotation(axis: &Vec3, radians: Real) -> Result<Mat3, AlignError> {
    let axis = Unit::try_new(*axis, Real::EPSILON).ok_or(AlignError::ZeroAxis)?;
    let (x, y, z) = (axis.x, axis.y, axis.z);
    let (s, c) = radians.sin_cos();
    let c1 = 1.0 - c;

    Ok(Mat3::new(
        c + c1 * x * x,
        c1 * x * y + s * z,
        c1 * x * z - s * y,
        c1 * x * y - s * z,
        c + c1 * y * y,
        c1 * y * z + s * x,
        c1 * x * z + s * y,
        c1 * y * z - s * x,
        c + c1 * z * z,
    ))
}

/// Extract Euler angles `(alpha, beta, gamma)` from a rotation matrix.
///
/// When `|zx| >= 1` the matrix sits on the gimbal-lock singularity. A warning
/// is logged and `gamma` is fixed to zero, so one degree of freedom is lost:
/// [`to_matrix`] of the result does not reproduce the input in that case.
pub fn to_angles(rot: &Mat3) -> EulerAngles {
    let (xx, xy, xz) = (rot[(0, 0)], rot[(0, 1)], rot[(0, 2)]);
    let (yx, yy, yz) = (rot[(1, 0)], rot[(1, 1)], rot[(1, 2)]);
    let (zx, zy, zz) = (rot[(2, 0)], rot[(2, 1)], rot[(2, 2)]);

    if zx.abs() < 1.0 {
        EulerAngles::new(-zy.atan2(zz), zx.asin(), -yx.atan2(xx))
    } else {
        warn!("rounding errors in rotation matrix, gamma fixed to 0: {rot}");
        let sign: Real = if zx > 0.0 { 1.0 } else { -1.0 };
        EulerAngles::new(
            (0.5 * (xy + yz)).atan2(0.5 * (yy - xz)),
            sign.asin(),
            0.0,
        )
    }
}

/// Build a rotation matrix from Euler angles `(alpha, beta, gamma)`.
///
/// Inverse of [`to_angles`] outside the gimbal-lock branch. For small angles
/// the result is `I - [angles]×`, which is what the rotation fit relies on.
pub fn to_matrix(angles: &EulerAngles) -> Mat3 {
    let (s1, c1) = angles[0].sin_cos();
    let (s2, c2) = angles[1].sin_cos();
    let (s3, c3) = angles[2].sin_cos();

    Mat3::new(
        c2 * c3,
        c1 * s3 + s1 * s2 * c3,
        s1 * s3 - c1 * s2 * c3,
        -c2 * s3,
        c1 * c3 - s1 * s2 * s3,
        s1 * c3 + c1 * s2 * s3,
        s2,
        -s1 * c2,
        c1 * c2,
    )
}

/// Replace `rot` by `to_matrix(to_angles(rot))` in place.
///
/// This suppresses accumulated non-orthogonality after many compositions. It
/// is not an exact orthogonalization, and inherits the gimbal-lock caveat of
/// [`to_angles`].
pub fn rectify(rot: &mut Mat3) {
    *rot = to_matrix(&to_angles(rot));
}
