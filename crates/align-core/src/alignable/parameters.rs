use nalgebra::{DMatrix, DVector};

use crate::{AlignError, Real};

/// Alignment parameter block attached to an alignable.
///
/// The tree never interprets the values; it only owns, replaces and hands
/// out the block. `selector` flags which of the alignable's degrees of freedom
/// are free, and `parameters` holds one value per selected flag.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentParameters {
    parameters: DVector<Real>,
    covariance: DMatrix<Real>,
    selector: Vec<bool>,
    valid: bool,
}

impl AlignmentParameters {
    /// Block with every degree of freedom selected.
    ///
    /// # Errors
    /// [`AlignError::ParameterShape`] if `covariance` is not `n × n`.
    pub fn new(parameters: DVector<Real>, covariance: DMatrix<Real>) -> Result<Self, AlignError> {
        let selector = vec![true; parameters.len()];
        Self::with_selector(parameters, covariance, selector)
    }

    /// Block for the degrees of freedom flagged in `selector`.
    ///
    /// # Errors
    /// [`AlignError::ParameterShape`] unless the number of `true` flags equals
    /// the parameter count and `covariance` is square of that size.
    pub fn with_selector(
        parameters: DVector<Real>,
        covariance: DMatrix<Real>,
        selector: Vec<bool>,
    ) -> Result<Self, AlignError> {
        let n = parameters.len();
        let selected = selector.iter().filter(|&&s| s).count();
        if selected != n || covariance.nrows() != n || covariance.ncols() != n {
            return Err(AlignError::ParameterShape {
                parameters: n,
                selected,
                rows: covariance.nrows(),
                cols: covariance.ncols(),
            });
        }

        Ok(Self {
            parameters,
            covariance,
            selector,
            valid: true,
        })
    }

    /// Zero parameters with zero covariance for the given selection.
    pub fn zeros(selector: Vec<bool>) -> Self {
        let n = selector.iter().filter(|&&s| s).count();
        Self {
            parameters: DVector::zeros(n),
            covariance: DMatrix::zeros(n, n),
            selector,
            valid: true,
        }
    }

    /// Copy with new values, keeping the selection.
    ///
    /// # Errors
    /// Same shape rules as [`AlignmentParameters::with_selector`].
    pub fn clone_with(
        &self,
        parameters: DVector<Real>,
        covariance: DMatrix<Real>,
    ) -> Result<Self, AlignError> {
        Self::with_selector(parameters, covariance, self.selector.clone())
    }

    pub fn parameters(&self) -> &DVector<Real> {
        &self.parameters
    }

    pub fn covariance(&self) -> &DMatrix<Real> {
        &self.covariance
    }

    pub fn selector(&self) -> &[bool] {
        &self.selector
    }

    /// Number of selected degrees of freedom.
    pub fn num_selected(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}
