//! Synthetic barrel geometry: rods of detectors arranged on a cylinder.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{
    AlignError, AlignableId, AlignableSpec, AlignableSurface, AlignableTree, DetId, Mat3, Pt3, Real,
    Vec3,
};

/// Layout of a synthetic barrel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrelLayout {
    pub n_rods: usize,
    pub dets_per_rod: usize,
    pub radius: Real,
    /// Spacing of detectors along z within a rod.
    pub pitch: Real,
    pub det_width: Real,
    pub det_length: Real,
}

impl Default for BarrelLayout {
    fn default() -> Self {
        Self {
            n_rods: 6,
            dets_per_rod: 4,
            radius: 25.0,
            pitch: 12.0,
            det_width: 6.0,
            det_length: 12.0,
        }
    }
}

/// Synthetic barrel with handles on every level.
///
/// Hierarchy: barrel → rods → dets → one det unit per det.
#[derive(Debug, Clone)]
pub struct SyntheticBarrel {
    pub tree: AlignableTree,
    pub barrel: AlignableId,
    pub rods: Vec<AlignableId>,
    pub dets: Vec<AlignableId>,
    pub units: Vec<AlignableId>,
}

/// Frame of a detector facing outwards at azimuth `phi`: local x tangential,
/// local y along the beam, local z radial.
pub fn barrel_frame(phi: Real) -> Mat3 {
    let (s, c) = phi.sin_cos();
    Mat3::new(-s, c, 0.0, 0.0, 0.0, 1.0, c, s, 0.0)
}

/// Build a barrel. Det ids are `1000 + 100 * rod + 2 * det` for dets and the
/// following odd number for their det unit.
///
/// # Errors
/// Propagates tree insertion errors (none for a well-formed layout).
pub fn build_barrel(layout: &BarrelLayout) -> Result<SyntheticBarrel, AlignError> {
    let mut tree = AlignableTree::new();
    let barrel = tree.add_root(AlignableSpec::composite(
        "barrel",
        AlignableSurface::default(),
    ));

    let mut rods = Vec::with_capacity(layout.n_rods);
    let mut dets = Vec::with_capacity(layout.n_rods * layout.dets_per_rod);
    let mut units = Vec::with_capacity(layout.n_rods * layout.dets_per_rod);
    let z0 = 0.5 * layout.dets_per_rod.saturating_sub(1) as Real;

    for rod_idx in 0..layout.n_rods {
        let phi = TAU * rod_idx as Real / layout.n_rods as Real;
        let frame = barrel_frame(phi);
        let center = Pt3::new(layout.radius * phi.cos(), layout.radius * phi.sin(), 0.0);

        // A rod spans its dets along the beam.
        let rod_surface = AlignableSurface::new(center, frame)
            .with_dimensions(layout.det_width, layout.pitch * layout.dets_per_rod as Real);
        let rod = tree.add_component(
            barrel,
            AlignableSpec::composite(format!("rod{rod_idx}"), rod_surface),
        )?;
        rods.push(rod);

        for det_idx in 0..layout.dets_per_rod {
            let position = center + Vec3::z() * ((det_idx as Real - z0) * layout.pitch);
            let surface = AlignableSurface::new(position, frame)
                .with_dimensions(layout.det_width, layout.det_length);
            let raw = 1000 + 100 * rod_idx as u32 + 2 * det_idx as u32;

            let det = tree.add_component(
                rod,
                AlignableSpec::det(format!("rod{rod_idx}/det{det_idx}"), DetId(raw), surface),
            )?;
            let unit = tree.add_component(
                det,
                AlignableSpec::det_unit(
                    format!("rod{rod_idx}/det{det_idx}/unit"),
                    DetId(raw + 1),
                    surface,
                ),
            )?;
            dets.push(det);
            units.push(unit);
        }
    }

    Ok(SyntheticBarrel {
        tree,
        barrel,
        rods,
        dets,
        units,
    })
}
