//! Core geometry for detector alignment.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt3`, `Mat3`, ...),
//! - transform utilities: principal rotations, Euler angle conversion,
//!   centroids and the iterative small-angle rotation fit ([`diff_rot`]),
//! - the alignable composite tree with parameter blocks and survey records,
//! - deterministic synthetic geometries for tests.
//!
//! Rotation convention: `rot_z(θ) = [[cos θ, sin θ, 0], [-sin θ, cos θ, 0], [0, 0, 1]]`,
//! and a node's accumulated rotation composes new rotations on the right.

/// Alignable tree, parameters, surveys.
pub mod alignable;
mod error;
/// Linear algebra type aliases and helpers.
pub mod math;
mod surface;
pub mod synthetic;
/// Rotation utilities and the rotation fit.
pub mod utilities;

pub use alignable::*;
pub use error::AlignError;
pub use math::*;
pub use surface::AlignableSurface;
pub use utilities::*;
