//! Small-angle rotation fit between two corresponding point sets.
//!
//! Solves `I · dΩ = Σ c × r` repeatedly, where `I_ij = Σ (δ_ij r² - r_i r_j)`
//! is the inertia tensor of the nominal points `r` and `c` are the current
//! points rotated back by the rotation accumulated so far. Each step `dΩ` is
//! turned into a matrix with [`to_matrix`] and multiplied into the result
//! until `|dΩ|²` drops below the tolerance.
//!
//! The linearization only holds for alignment-scale angles. A true offset of
//! exactly π about an axis perpendicular to the points gives `c = -r`, every
//! cross product vanishes and the fit reports the identity.

use log::debug;
use serde::{Deserialize, Serialize};

use super::to_matrix;
use crate::{AlignError, Mat3, Real, Vec3};

/// Convergence controls for [`diff_rot_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffRotOptions {
    /// Stop once the squared norm of the angular step is below this value.
    pub tolerance: Real,
    /// Upper bound on correction steps.
    pub max_iters: usize,
}

impl Default for DiffRotOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iters: 100,
        }
    }
}

/// Outcome of a rotation fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationFit {
    /// Rotation taking nominal points onto current ones (`current ≈ R · nominal`).
    pub rotation: Mat3,
    /// Number of correction steps applied.
    pub iterations: usize,
}

/// Rotation needed to bring `nominal` onto `current`, with default options.
///
/// # Errors
/// See [`diff_rot_with`].
pub fn diff_rot(current: &[Vec3], nominal: &[Vec3]) -> Result<Mat3, AlignError> {
    diff_rot_with(current, nominal, &DiffRotOptions::default()).map(|fit| fit.rotation)
}

/// Iterative small-angle fit of the rotation between `nominal` and `current`.
///
/// Translation is not solved for; centre the point sets beforehand if needed.
///
/// # Errors
/// - [`AlignError::SizeMismatch`] if the sequences differ in length,
/// - [`AlignError::EmptyInput`] if they are empty,
/// - [`AlignError::SingularInertia`] if the nominal points are degenerate,
/// - [`AlignError::NotConverged`] if `opts.max_iters` steps were not enough.
pub fn diff_rot_with(
    current: &[Vec3],
    nominal: &[Vec3],
    opts: &DiffRotOptions,
) -> Result<RotationFit, AlignError> {
    if current.len() != nominal.len() {
        return Err(AlignError::SizeMismatch {
            current: current.len(),
            nominal: nominal.len(),
        });
    }
    if nominal.is_empty() {
        return Err(AlignError::EmptyInput);
    }

    let inertia = inertia_tensor(nominal);
    let scale = inertia.norm();
    if scale == 0.0 || inertia.determinant().abs() <= Real::EPSILON * scale.powi(3) {
        return Err(AlignError::SingularInertia);
    }
    let solver = inertia.cholesky().ok_or(AlignError::SingularInertia)?;

    let mut rotation = Mat3::identity();
    let mut rotated = current.to_vec();

    for iteration in 0..opts.max_iters {
        let rhs = rotated
            .iter()
            .zip(nominal)
            .fold(Vec3::zeros(), |acc, (c, r)| acc + c.cross(r));
        let d_omega = solver.solve(&rhs);
        let step = d_omega.norm_squared();

        if step < opts.tolerance {
            debug!("diff_rot converged after {iteration} steps (|dΩ|² = {step:.3e})");
            return Ok(RotationFit {
                rotation,
                iterations: iteration,
            });
        }

        rotation *= to_matrix(&d_omega);

        let inverse = rotation.transpose();
        for (moved, c) in rotated.iter_mut().zip(current) {
            *moved = inverse * c;
        }
    }

    Err(AlignError::NotConverged {
        iterations: opts.max_iters,
    })
}

/// Inertia tensor `Σ (δ_ij r² - r_i r_j)` of a point set.
pub fn inertia_tensor(points: &[Vec3]) -> Mat3 {
    let mut inertia = Mat3::zeros();
    for r in points {
        inertia[(0, 0)] += r.y * r.y + r.z * r.z;
        inertia[(1, 1)] += r.x * r.x + r.z * r.z;
        inertia[(2, 2)] += r.y * r.y + r.x * r.x;
        inertia[(1, 0)] -= r.x * r.y;
        inertia[(2, 0)] -= r.x * r.z;
        inertia[(2, 1)] -= r.y * r.z;
    }
    inertia[(0, 1)] = inertia[(1, 0)];
    inertia[(0, 2)] = inertia[(2, 0)];
    inertia[(1, 2)] = inertia[(2, 1)];
    inertia
}
