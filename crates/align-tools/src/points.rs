use align_core::{
    AlignableId, AlignableKind, AlignableTree, DetId, ErrorMatrix, SurveyDet, Vec3,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which nodes contribute survey points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightBy {
    /// Only the node itself. Its surface needs a non-zero width and length,
    /// otherwise the four fiducials coincide and no rotation can be fitted.
    #[serde(rename = "self")]
    SelfOnly,
    /// Det units below the node, counted twice when their mother is a det.
    Det,
    /// Det units below the node, once each.
    #[default]
    DetUnit,
}

/// Whether a det unit passes the module list: its own id or its mother's id
/// is listed.
pub fn read_module_list(ali_id: DetId, mother_id: Option<DetId>, list: &[u32]) -> bool {
    list.iter()
        .any(|&listed| listed == ali_id.0 || mother_id.is_some_and(|m| m.0 == listed))
}

/// Global survey points of the det units below `id`.
///
/// A det unit without a survey record gets one built from its surface, with
/// zero errors, and keeps it. When `module_list` is given only units passing
/// [`read_module_list`] contribute.
///
/// Fails when `id` does not belong to `tree`.
pub fn create_points(
    tree: &mut AlignableTree,
    id: AlignableId,
    weight_by: WeightBy,
    module_list: Option<&[u32]>,
) -> Result<Vec<Vec3>> {
    tree.get(id)
        .with_context(|| format!("alignable {id} not in geometry of {} nodes", tree.len()))?;
    let mut points = Vec::new();
    collect_points(tree, id, weight_by, module_list, &mut points);
    Ok(points)
}

fn collect_points(
    tree: &mut AlignableTree,
    id: AlignableId,
    weight_by: WeightBy,
    module_list: Option<&[u32]>,
    out: &mut Vec<Vec3>,
) {
    if weight_by != WeightBy::SelfOnly {
        let kind = tree[id].kind();
        let passes = if kind == AlignableKind::Det && weight_by == WeightBy::Det {
            2
        } else {
            1
        };
        let comps = tree.components(id).to_vec();
        for _ in 0..passes {
            for &comp in &comps {
                collect_points(tree, comp, weight_by, module_list, out);
            }
        }
        if kind != AlignableKind::DetUnit {
            return;
        }
    }

    push_survey_points(tree, id, module_list, out);
}

fn push_survey_points(
    tree: &mut AlignableTree,
    id: AlignableId,
    module_list: Option<&[u32]>,
    out: &mut Vec<Vec3>,
) {
    if let Some(list) = module_list {
        let node = &tree[id];
        let mother = node.mother().map(|m| tree[m].det_id());
        if !read_module_list(node.det_id(), mother, list) {
            return;
        }
    }

    let node = &mut tree[id];
    if node.survey().is_none() {
        let survey = SurveyDet::from_surface(node.surface(), ErrorMatrix::zeros());
        node.set_survey(Some(survey));
    }

    let node = &tree[id];
    if let Some(survey) = node.survey() {
        out.extend(
            survey
                .global_points(node.surface())
                .into_iter()
                .map(|p| p.coords),
        );
    }
}
