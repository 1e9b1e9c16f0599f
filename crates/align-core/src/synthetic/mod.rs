//! Deterministic synthetic data generation helpers.
//!
//! Small, reusable building blocks for tests and examples:
//! - point clouds for the rotation fit,
//! - deterministic pseudo-random jitter,
//! - a barrel-shaped alignable hierarchy with surveyable det units.
//!
//! # Example
//!
//! ```no_run
//! use align_core::{diff_rot, rot_z, synthetic::cloud, Vec3};
//!
//! let nominal = cloud::box_corners(Vec3::new(1.0, 2.0, 0.5));
//! let current = cloud::rotated(&rot_z(0.01), &nominal);
//! let rotation = diff_rot(&current, &nominal).unwrap();
//! assert!((rotation - rot_z(0.01)).abs().max() < 1e-6);
//! ```

pub mod barrel;
pub mod cloud;
pub mod noise;
