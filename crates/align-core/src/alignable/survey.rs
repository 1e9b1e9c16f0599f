use crate::{AlignableSurface, ErrorMatrix, Mat3, Pt3};

/// Survey record of a detector: the surveyed frame, its errors and the
/// fiducial points measured on it (in local coordinates).
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyDet {
    position: Pt3,
    rotation: Mat3,
    errors: ErrorMatrix,
    local_points: Vec<Pt3>,
}

impl SurveyDet {
    /// Survey taken from a surface, with four fiducials at `(±W/3, ±L/3, 0)`.
    pub fn from_surface(surface: &AlignableSurface, errors: ErrorMatrix) -> Self {
        let w3 = surface.width / 3.0;
        let l3 = surface.length / 3.0;

        Self {
            position: surface.position,
            rotation: surface.rotation,
            errors,
            local_points: vec![
                Pt3::new(w3, l3, 0.0),
                Pt3::new(-w3, l3, 0.0),
                Pt3::new(-w3, -l3, 0.0),
                Pt3::new(w3, -l3, 0.0),
            ],
        }
    }

    pub fn position(&self) -> &Pt3 {
        &self.position
    }

    pub fn rotation(&self) -> &Mat3 {
        &self.rotation
    }

    pub fn errors(&self) -> &ErrorMatrix {
        &self.errors
    }

    pub fn local_points(&self) -> &[Pt3] {
        &self.local_points
    }

    /// Fiducials mapped through `surface` into the global frame.
    pub fn global_points(&self, surface: &AlignableSurface) -> Vec<Pt3> {
        self.local_points
            .iter()
            .map(|p| surface.to_global_point(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rot_z;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn fiducials_span_a_third_of_the_surface() {
        let surface = AlignableSurface::new(Pt3::new(0.0, 0.0, 5.0), rot_z(FRAC_PI_2))
            .with_dimensions(6.0, 12.0);
        let survey = SurveyDet::from_surface(&surface, ErrorMatrix::identity() * 1e-6);

        assert_eq!(survey.local_points()[0], Pt3::new(2.0, 4.0, 0.0));
        assert_eq!(survey.position(), &surface.position);

        // Local x maps to global +y, local y to global -x.
        let global = survey.global_points(&surface);
        assert!((global[0] - Pt3::new(-4.0, 2.0, 5.0)).norm() < 1e-12);
    }
}
