//! Local reference frame of an alignable.

use crate::{Mat3, Pt3, Real, Vec3};

/// Position and orientation of an alignable embedded in the global frame.
///
/// The rows of `rotation` are the local axes expressed in global
/// coordinates, so `local = rotation · (global - position)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignableSurface {
    pub position: Pt3,
    pub rotation: Mat3,
    /// Extent along local x.
    pub width: Real,
    /// Extent along local y.
    pub length: Real,
}

impl Default for AlignableSurface {
    fn default() -> Self {
        Self::new(Pt3::origin(), Mat3::identity())
    }
}

impl AlignableSurface {
    /// Surface without extent (width and length zero).
    pub fn new(position: Pt3, rotation: Mat3) -> Self {
        Self {
            position,
            rotation,
            width: 0.0,
            length: 0.0,
        }
    }

    /// Set the active area dimensions.
    pub fn with_dimensions(mut self, width: Real, length: Real) -> Self {
        self.width = width;
        self.length = length;
        self
    }

    pub fn to_global_vector(&self, local: &Vec3) -> Vec3 {
        self.rotation.transpose() * local
    }

    pub fn to_local_vector(&self, global: &Vec3) -> Vec3 {
        self.rotation * global
    }

    pub fn to_global_point(&self, local: &Pt3) -> Pt3 {
        self.position + self.rotation.transpose() * local.coords
    }

    pub fn to_local_point(&self, global: &Pt3) -> Pt3 {
        Pt3::from(self.rotation * (*global - self.position))
    }

    /// Express a rotation given in this local frame in the global frame
    /// (`Oᵀ · R · O`).
    pub fn to_global_rotation(&self, local: &Mat3) -> Mat3 {
        self.rotation.transpose() * local * self.rotation
    }

    /// Express a global rotation in this local frame (`O · R · Oᵀ`).
    pub fn to_local_rotation(&self, global: &Mat3) -> Mat3 {
        self.rotation * global * self.rotation.transpose()
    }

    /// Shift the origin by a global displacement.
    pub fn move_by(&mut self, displacement: &Vec3) {
        self.position += *displacement;
    }

    /// Compose a global rotation into the orientation.
    pub fn rotate(&mut self, rotation: &Mat3) {
        self.rotation *= *rotation;
    }
}
