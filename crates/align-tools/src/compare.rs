//! Translation and rotation between a reference and a current alignable.

use align_core::{
    center_of_mass, diff_r, diff_rot_with, to_angles, to_matrix, AlignableId, AlignableTree,
    DiffRotOptions, EulerAngles, Vec3,
};
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{create_points, WeightBy};

/// Options of a geometry comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub weight_by: WeightBy,
    /// Restrict points to det units whose id (or mother's id) is listed.
    pub module_list: Option<Vec<u32>>,
    pub diff_rot: DiffRotOptions,
}

/// Correction bringing a current alignable onto its reference.
///
/// Global quantities are what [`move_alignable`] applies; local ones are the
/// same correction seen in the reference surface frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentDiff {
    pub translation: Vec3,
    pub angles: EulerAngles,
    pub local_translation: Vec3,
    pub local_angles: EulerAngles,
}

impl AlignmentDiff {
    /// Global translation followed by global angles.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.translation.x,
            self.translation.y,
            self.translation.z,
            self.angles.x,
            self.angles.y,
            self.angles.z,
        ]
    }
}

/// Compare `cur_id` in `current` against `ref_id` in `reference`.
///
/// Both nodes must have the same kind and det id and yield the same number
/// of survey points. Missing surveys are created on either tree. An id that
/// does not belong to its tree is an error.
pub fn diff_alignables(
    reference: &mut AlignableTree,
    ref_id: AlignableId,
    current: &mut AlignableTree,
    cur_id: AlignableId,
    config: &CompareConfig,
) -> Result<AlignmentDiff> {
    let ref_node = reference
        .get(ref_id)
        .with_context(|| format!("alignable {ref_id} not in reference geometry"))?;
    let cur_node = current
        .get(cur_id)
        .with_context(|| format!("alignable {cur_id} not in current geometry"))?;
    if ref_node.kind() != cur_node.kind() || ref_node.det_id() != cur_node.det_id() {
        anyhow::bail!(
            "alignables do not match: reference {} is {:?} with det id {}, \
             current {} is {:?} with det id {}",
            ref_id,
            ref_node.kind(),
            ref_node.det_id(),
            cur_id,
            cur_node.kind(),
            cur_node.det_id()
        );
    }
    // Both ids are valid from here on.
    let cur_position = cur_node.global_position().coords;
    let ref_surface = *ref_node.surface();

    let module_list = config.module_list.as_deref();
    let mut ref_points = create_points(reference, ref_id, config.weight_by, module_list)?;
    let mut cur_points = create_points(current, cur_id, config.weight_by, module_list)?;

    let shift = diff_r(&cur_points, &ref_points)
        .with_context(|| format!("no comparable points for {}", cur_id))?;
    let ref_cm = center_of_mass(&ref_points)?;
    let cur_cm = center_of_mass(&cur_points)?;
    for p in &mut ref_points {
        *p -= ref_cm;
    }
    for p in &mut cur_points {
        *p -= cur_cm;
    }

    let fit = diff_rot_with(&cur_points, &ref_points, &config.diff_rot)
        .context("rotation fit between reference and current points failed")?;
    debug!(
        "{}: {} points, rotation fit in {} steps",
        cur_id,
        cur_points.len(),
        fit.iterations
    );

    // The rotation is applied about the node position, not about the
    // centroid of the points; compensate the lever arm.
    let lever = cur_position - cur_cm;
    let translation = shift + fit.rotation.transpose() * lever - lever;

    Ok(AlignmentDiff {
        translation,
        angles: to_angles(&fit.rotation),
        local_translation: ref_surface.to_local_vector(&translation),
        local_angles: to_angles(&ref_surface.to_local_rotation(&fit.rotation)),
    })
}

/// Apply a comparison result: translate by the global translation, then
/// rotate in the global frame by the global angles.
pub fn move_alignable(tree: &mut AlignableTree, id: AlignableId, diff: &AlignmentDiff) {
    tree.move_by(id, &diff.translation);
    tree.rotate_in_global_frame(id, &to_matrix(&diff.angles));
}

#[cfg(test)]
mod tests {
    use super::*;
    use align_core::synthetic::barrel::{build_barrel, BarrelLayout};
    use align_core::{AlignableSpec, AlignableSurface, DetId, Pt3};

    #[test]
    fn identical_geometries_have_no_difference() {
        let mut reference = build_barrel(&BarrelLayout::default()).unwrap();
        let mut current = reference.clone();
        let rod = reference.rods[3];

        let diff = diff_alignables(
            &mut reference.tree,
            rod,
            &mut current.tree,
            rod,
            &CompareConfig::default(),
        )
        .unwrap();

        assert!(diff.translation.norm() < 1e-12);
        assert!(diff.angles.norm() < 1e-12);
        assert!(diff.local_angles.norm() < 1e-12);
    }

    #[test]
    fn pure_shift_is_reported_in_both_frames() {
        let mut reference = build_barrel(&BarrelLayout::default()).unwrap();
        let mut current = reference.clone();
        let det = reference.dets[5];

        // Barrel frames have local z pointing radially outwards.
        let radial = reference.tree[det].surface().to_global_vector(&Vec3::z());
        current.tree.move_by(det, &(radial * 0.01));

        let diff = diff_alignables(
            &mut reference.tree,
            det,
            &mut current.tree,
            det,
            &CompareConfig::default(),
        )
        .unwrap();

        assert!((diff.translation + radial * 0.01).norm() < 1e-12);
        assert!((diff.local_translation - Vec3::new(0.0, 0.0, -0.01)).norm() < 1e-12);
        assert!(diff.angles.norm() < 1e-12);
    }

    #[test]
    fn mismatched_nodes_are_rejected() {
        let mut reference = build_barrel(&BarrelLayout::default()).unwrap();
        let mut current = reference.clone();
        let err = diff_alignables(
            &mut reference.tree,
            reference.dets[0],
            &mut current.tree,
            current.dets[1],
            &CompareConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }

    #[test]
    fn ids_from_another_tree_are_rejected() {
        let mut barrel = build_barrel(&BarrelLayout::default()).unwrap();
        let mut empty = AlignableTree::new();
        let unit = barrel.units[20];
        let config = CompareConfig::default();

        let err = diff_alignables(&mut barrel.tree, unit, &mut empty, unit, &config).unwrap_err();
        assert!(err.to_string().contains("not in current geometry"), "{err}");

        let err = diff_alignables(&mut empty, unit, &mut barrel.tree, unit, &config).unwrap_err();
        assert!(err.to_string().contains("not in reference geometry"), "{err}");
    }

    #[test]
    fn rod_shift_is_recovered_from_its_own_fiducials() {
        let mut reference = build_barrel(&BarrelLayout::default()).unwrap();
        let mut current = reference.clone();
        let rod = reference.rods[2];
        current.tree.move_by(rod, &Vec3::new(0.0, 0.0, 0.05));

        let config = CompareConfig {
            weight_by: WeightBy::SelfOnly,
            ..CompareConfig::default()
        };
        let diff =
            diff_alignables(&mut reference.tree, rod, &mut current.tree, rod, &config).unwrap();
        assert!((diff.translation - Vec3::new(0.0, 0.0, -0.05)).norm() < 1e-12);
        assert!(diff.angles.norm() < 1e-12);
    }

    #[test]
    fn empty_module_list_selection_fails() {
        let mut reference = build_barrel(&BarrelLayout::default()).unwrap();
        let mut current = reference.clone();
        let config = CompareConfig {
            module_list: Some(vec![1]),
            ..CompareConfig::default()
        };
        let rod = reference.rods[0];
        assert!(
            diff_alignables(&mut reference.tree, rod, &mut current.tree, rod, &config).is_err()
        );
    }

    #[test]
    fn move_applies_translation_then_rotation() {
        let mut tree = AlignableTree::new();
        let det = tree.add_root(AlignableSpec::det(
            "det",
            DetId(4),
            AlignableSurface::new(Pt3::new(1.0, 0.0, 0.0), align_core::Mat3::identity()),
        ));
        let diff = AlignmentDiff {
            translation: Vec3::new(0.0, 1.0, 0.0),
            angles: EulerAngles::new(0.0, 0.0, 0.1),
            local_translation: Vec3::zeros(),
            local_angles: EulerAngles::zeros(),
        };

        move_alignable(&mut tree, det, &diff);

        assert_eq!(tree[det].global_position(), Pt3::new(1.0, 1.0, 0.0));
        assert!((tree[det].rotation() - to_matrix(&diff.angles)).abs().max() < 1e-15);
        assert_eq!(diff.to_array()[1], 1.0);
        assert_eq!(diff.to_array()[5], 0.1);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: CompareConfig = serde_json::from_str(r#"{"weight_by": "det"}"#).unwrap();
        assert_eq!(config.weight_by, WeightBy::Det);
        assert_eq!(config.module_list, None);
        assert_eq!(config.diff_rot, DiffRotOptions::default());
    }
}
