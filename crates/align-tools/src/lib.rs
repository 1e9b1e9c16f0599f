//! Tools for comparing two geometries of the same alignable hierarchy.
//!
//! Points are generated from the survey fiducials of det units
//! ([`create_points`]); two such point sets give the translation and the
//! small-angle rotation between a reference and a current alignable
//! ([`diff_alignables`]), which can be applied back with [`move_alignable`].

mod compare;
mod points;

pub use compare::*;
pub use points::*;
