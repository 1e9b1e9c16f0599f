use std::fmt;

use crate::{AlignableSurface, AlignmentParameters, Mat3, Pt3, SurveyDet, Vec3};

/// Index of an alignable inside its [`crate::AlignableTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlignableId(pub(crate) usize);

impl AlignableId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AlignableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque detector identifier. Zero means "not a detector".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DetId(pub u32);

impl fmt::Display for DetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of an alignable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignableKind {
    /// Higher-level structure (layer, rod, wheel, ...).
    Composite,
    /// Detector, possibly made of several det units.
    Det,
    /// Terminal physical unit; never has components.
    DetUnit,
}

/// Description of a node to insert into a tree.
#[derive(Debug, Clone)]
pub struct AlignableSpec {
    pub kind: AlignableKind,
    pub name: String,
    pub det_id: DetId,
    pub surface: AlignableSurface,
}

impl AlignableSpec {
    pub fn composite(name: impl Into<String>, surface: AlignableSurface) -> Self {
        Self {
            kind: AlignableKind::Composite,
            name: name.into(),
            det_id: DetId::default(),
            surface,
        }
    }

    pub fn det(name: impl Into<String>, det_id: DetId, surface: AlignableSurface) -> Self {
        Self {
            kind: AlignableKind::Det,
            name: name.into(),
            det_id,
            surface,
        }
    }

    pub fn det_unit(name: impl Into<String>, det_id: DetId, surface: AlignableSurface) -> Self {
        Self {
            kind: AlignableKind::DetUnit,
            name: name.into(),
            det_id,
            surface,
        }
    }
}

/// One positionable detector component.
///
/// `displacement` and `rotation` accumulate the corrections applied since
/// construction; they are composed, never overwritten. Structural links
/// (`mother`, `components`) are maintained by the owning tree.
#[derive(Debug, Clone)]
pub struct Alignable {
    pub(crate) id: AlignableId,
    pub(crate) kind: AlignableKind,
    pub(crate) name: String,
    pub(crate) det_id: DetId,
    pub(crate) misalignment_active: bool,
    pub(crate) displacement: Vec3,
    pub(crate) rotation: Mat3,
    pub(crate) surface: AlignableSurface,
    pub(crate) parameters: Option<Box<AlignmentParameters>>,
    pub(crate) survey: Option<Box<SurveyDet>>,
    pub(crate) mother: Option<AlignableId>,
    pub(crate) components: Vec<AlignableId>,
}

impl Alignable {
    pub(crate) fn from_spec(
        id: AlignableId,
        spec: AlignableSpec,
        mother: Option<AlignableId>,
    ) -> Self {
        Self {
            id,
            kind: spec.kind,
            name: spec.name,
            det_id: spec.det_id,
            misalignment_active: true,
            displacement: Vec3::zeros(),
            rotation: Mat3::identity(),
            surface: spec.surface,
            parameters: None,
            survey: None,
            mother,
            components: Vec::new(),
        }
    }

    pub fn id(&self) -> AlignableId {
        self.id
    }

    pub fn kind(&self) -> AlignableKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn det_id(&self) -> DetId {
        self.det_id
    }

    /// Direct components, empty for a leaf.
    pub fn components(&self) -> &[AlignableId] {
        &self.components
    }

    pub fn is_leaf(&self) -> bool {
        self.components.is_empty()
    }

    /// Upward link; not an ownership relation.
    pub fn mother(&self) -> Option<AlignableId> {
        self.mother
    }

    pub fn surface(&self) -> &AlignableSurface {
        &self.surface
    }

    pub fn global_position(&self) -> Pt3 {
        self.surface.position
    }

    pub fn global_rotation(&self) -> Mat3 {
        self.surface.rotation
    }

    /// Accumulated global displacement.
    pub fn displacement(&self) -> &Vec3 {
        &self.displacement
    }

    /// Accumulated global rotation.
    pub fn rotation(&self) -> &Mat3 {
        &self.rotation
    }

    pub fn misalignment_active(&self) -> bool {
        self.misalignment_active
    }

    pub fn set_misalignment_active(&mut self, active: bool) {
        self.misalignment_active = active;
    }

    pub fn alignment_parameters(&self) -> Option<&AlignmentParameters> {
        self.parameters.as_deref()
    }

    pub fn alignment_parameters_mut(&mut self) -> Option<&mut AlignmentParameters> {
        self.parameters.as_deref_mut()
    }

    /// Take ownership of `parameters` (or clear with `None`), returning the
    /// block previously owned. Dropping the return value releases it.
    pub fn set_alignment_parameters(
        &mut self,
        parameters: Option<AlignmentParameters>,
    ) -> Option<AlignmentParameters> {
        std::mem::replace(&mut self.parameters, parameters.map(Box::new)).map(|b| *b)
    }

    pub fn survey(&self) -> Option<&SurveyDet> {
        self.survey.as_deref()
    }

    /// Replace the survey record, returning the previous one.
    pub fn set_survey(&mut self, survey: Option<SurveyDet>) -> Option<SurveyDet> {
        std::mem::replace(&mut self.survey, survey.map(Box::new)).map(|b| *b)
    }

    /// Accumulate a global translation.
    pub fn add_displacement(&mut self, displacement: &Vec3) {
        self.displacement += *displacement;
    }

    /// Accumulate a global rotation, composed after the existing one.
    pub fn add_rotation(&mut self, rotation: &Mat3) {
        self.rotation *= *rotation;
    }
}
