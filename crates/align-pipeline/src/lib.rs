//! High-level alignment workflows.
//!
//! - [`setup`]: a typed registry of named objects shared between stages of one
//!   processing session.
//! - [`run_rotation_fit`]: JSON-friendly rotation fit between a current and a
//!   nominal point cloud, with a residual report.
//! - [`run_comparison`]: compare every det of a current geometry against a
//!   reference one; [`run_barrel_comparison`] does so for a synthetic barrel
//!   described in JSON.

mod compare;
mod rotation_fit;
pub mod setup;

pub use compare::*;
pub use rotation_fit::*;
pub use setup::{AlignSetup, SetupError};

/// Re-export the comparison configuration used by [`run_comparison`].
pub use align_tools::{CompareConfig, WeightBy};
