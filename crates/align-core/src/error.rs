use thiserror::Error;

use crate::AlignableId;

/// Errors reported by the geometry utilities and the alignable tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignError {
    /// An operation that averages or fits points received none.
    #[error("need at least one point, got an empty input")]
    EmptyInput,
    /// `current` and `nominal` point sequences differ in length.
    #[error("point count mismatch: current has {current}, nominal has {nominal}")]
    SizeMismatch { current: usize, nominal: usize },
    /// The inertia tensor of the nominal points cannot be inverted.
    #[error("inertia tensor is singular (points collinear or at the origin)")]
    SingularInertia,
    /// The rotation fit hit its iteration cap before the step fell below tolerance.
    #[error("rotation fit did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },
    /// Axis-angle rotation requested around a zero-length axis.
    #[error("rotation axis has zero length")]
    ZeroAxis,
    /// Parameter vector, covariance and selector disagree in size.
    #[error(
        "inconsistent parameter block: {parameters} parameters, \
         {selected} selected, covariance {rows}x{cols}"
    )]
    ParameterShape {
        parameters: usize,
        selected: usize,
        rows: usize,
        cols: usize,
    },
    /// A det unit is a terminal node and cannot own components.
    #[error("alignable {0} is a det unit and cannot have components")]
    LeafHasNoComponents(AlignableId),
}
