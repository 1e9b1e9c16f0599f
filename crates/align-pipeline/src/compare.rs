use std::collections::BTreeMap;

use align_core::synthetic::barrel::{build_barrel, BarrelLayout};
use align_core::{
    to_matrix, vec3_from_array, vec3_to_array, AlignableId, AlignableKind, AlignableTree, Real,
};
use align_tools::{diff_alignables, CompareConfig};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Difference of one det between the reference and the current geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetComparison {
    pub det_id: u32,
    pub name: String,
    pub translation: [Real; 3],
    pub angles: [Real; 3],
    pub local_translation: [Real; 3],
    pub local_angles: [Real; 3],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// One entry per det present in both geometries, in det id order.
    pub dets: Vec<DetComparison>,
    /// Det ids found in only one of the geometries.
    pub unmatched: Vec<u32>,
}

impl ComparisonReport {
    /// Largest translation norm over all compared dets.
    pub fn max_translation(&self) -> Real {
        self.dets
            .iter()
            .map(|d| d.translation.iter().map(|v| v * v).sum::<Real>().sqrt())
            .fold(0.0, Real::max)
    }
}

fn dets_by_id(tree: &AlignableTree) -> BTreeMap<u32, AlignableId> {
    tree.iter()
        .filter(|node| node.kind() == AlignableKind::Det)
        .map(|node| (node.det_id().0, node.id()))
        .collect()
}

/// Compare every det of `current` against the det with the same id in
/// `reference`.
pub fn run_comparison(
    reference: &mut AlignableTree,
    current: &mut AlignableTree,
    config: &CompareConfig,
) -> Result<ComparisonReport> {
    let ref_dets = dets_by_id(reference);
    let cur_dets = dets_by_id(current);
    if ref_dets.is_empty() {
        anyhow::bail!("reference geometry has no dets");
    }

    let mut report = ComparisonReport::default();
    for (&det_id, &ref_id) in &ref_dets {
        let Some(&cur_id) = cur_dets.get(&det_id) else {
            report.unmatched.push(det_id);
            continue;
        };

        let diff = diff_alignables(reference, ref_id, current, cur_id, config)
            .with_context(|| format!("comparing det {det_id}"))?;
        debug!("det {det_id}: translation {:?}", diff.translation);

        report.dets.push(DetComparison {
            det_id,
            name: current[cur_id].name().to_owned(),
            translation: vec3_to_array(&diff.translation),
            angles: vec3_to_array(&diff.angles),
            local_translation: vec3_to_array(&diff.local_translation),
            local_angles: vec3_to_array(&diff.local_angles),
        });
    }
    report.unmatched.extend(
        cur_dets
            .keys()
            .filter(|id| !ref_dets.contains_key(*id))
            .copied(),
    );
    report.unmatched.sort_unstable();

    if !report.unmatched.is_empty() {
        warn!("{} dets without a counterpart", report.unmatched.len());
    }
    Ok(report)
}

/// Rigid move applied to one det of a synthetic barrel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetMisalignment {
    pub det_id: u32,
    #[serde(default)]
    pub translation: [Real; 3],
    /// Global Euler angles, applied about the det position after the
    /// translation.
    #[serde(default)]
    pub angles: [Real; 3],
}

/// A synthetic barrel and the misalignments that turn it into the current
/// geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrelComparisonInput {
    pub layout: BarrelLayout,
    pub misalignments: Vec<DetMisalignment>,
}

/// Build the nominal barrel, misalign a copy and compare the two.
pub fn run_barrel_comparison(
    input: &BarrelComparisonInput,
    config: &CompareConfig,
) -> Result<ComparisonReport> {
    let mut reference = build_barrel(&input.layout).context("invalid barrel layout")?;
    let mut current = reference.clone();

    let dets = dets_by_id(&current.tree);
    for m in &input.misalignments {
        let &id = dets
            .get(&m.det_id)
            .with_context(|| format!("misaligned det {} is not in the barrel", m.det_id))?;
        current.tree.move_by(id, &vec3_from_array(m.translation));
        current
            .tree
            .rotate_in_global_frame(id, &to_matrix(&vec3_from_array(m.angles)));
    }
    info!(
        "barrel of {} dets, {} misaligned",
        dets.len(),
        input.misalignments.len()
    );

    run_comparison(&mut reference.tree, &mut current.tree, config)
}
