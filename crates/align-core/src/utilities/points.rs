use crate::{AlignError, Pt3, Real, Vec3};

/// Position of a mother alignable as the arithmetic mean of its daughters.
///
/// # Errors
/// [`AlignError::EmptyInput`] if `daughters` is empty.
pub fn mother_position(daughters: &[Pt3]) -> Result<Pt3, AlignError> {
    if daughters.is_empty() {
        return Err(AlignError::EmptyInput);
    }

    let sum = daughters
        .iter()
        .fold(Vec3::zeros(), |acc, p| acc + p.coords);
    Ok(Pt3::from(sum / daughters.len() as Real))
}

/// Centre of mass of a set of global vectors.
///
/// # Errors
/// [`AlignError::EmptyInput`] if `points` is empty.
pub fn center_of_mass(points: &[Vec3]) -> Result<Vec3, AlignError> {
    if points.is_empty() {
        return Err(AlignError::EmptyInput);
    }
    Ok(points.iter().sum::<Vec3>() / points.len() as Real)
}

/// Mean displacement `nominal[i] - current[i]`: the translation taking the
/// current points back onto the nominal ones on average.
///
/// # Errors
/// [`AlignError::SizeMismatch`] on unequal lengths, [`AlignError::EmptyInput`]
/// if both are empty.
pub fn diff_r(current: &[Vec3], nominal: &[Vec3]) -> Result<Vec3, AlignError> {
    if current.len() != nominal.len() {
        return Err(AlignError::SizeMismatch {
            current: current.len(),
            nominal: nominal.len(),
        });
    }
    if current.is_empty() {
        return Err(AlignError::EmptyInput);
    }

    let sum = current
        .iter()
        .zip(nominal)
        .fold(Vec3::zeros(), |acc, (c, n)| acc + (n - c));
    Ok(sum / current.len() as Real)
}
