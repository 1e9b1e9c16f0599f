//! Composite tree of alignable detector components.
//!
//! Nodes live in an [`AlignableTree`] arena and are addressed by
//! [`AlignableId`]. Leaves are det units (or empty composites); every node may
//! own one [`AlignmentParameters`] block and one [`SurveyDet`] record.

mod det_or_unit;
mod node;
mod parameters;
mod survey;
mod transform;
mod tree;

pub use det_or_unit::AlignableDetOrUnit;
pub use node::{Alignable, AlignableId, AlignableKind, AlignableSpec, DetId};
pub use parameters::AlignmentParameters;
pub use survey::SurveyDet;
pub use tree::AlignableTree;
