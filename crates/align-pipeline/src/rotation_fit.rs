use align_core::{
    center_of_mass, diff_rot_with, mat3_to_rows, rectify, to_angles, vec3_from_array,
    vec3_to_array, DiffRotOptions, Mat3, Real, Vec3,
};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationFitConfig {
    pub diff_rot: DiffRotOptions,
    /// Replace the fitted rotation by `to_matrix(to_angles(R))`.
    pub rectify: bool,
    /// Subtract each cloud's centroid before fitting.
    pub center: bool,
}

impl Default for RotationFitConfig {
    fn default() -> Self {
        Self {
            diff_rot: DiffRotOptions::default(),
            rectify: true,
            center: false,
        }
    }
}

/// Corresponding point clouds; `current[i]` is the measured position of
/// `nominal[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationFitInput {
    pub current: Vec<[Real; 3]>,
    pub nominal: Vec<[Real; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationFitReport {
    /// Fitted rotation, row-major, with `current ≈ R · nominal`.
    pub rotation: [[Real; 3]; 3],
    /// Euler angles `(alpha, beta, gamma)` of the rotation.
    pub angles: [Real; 3],
    pub iterations: usize,
    /// RMS distance between corresponding points before the fit.
    pub rms_before: Real,
    /// RMS distance between `current` and `R · nominal`.
    pub rms_after: Real,
}

/// Fit the rotation taking `input.nominal` onto `input.current`.
pub fn run_rotation_fit(
    input: &RotationFitInput,
    config: &RotationFitConfig,
) -> Result<RotationFitReport> {
    if input.current.len() != input.nominal.len() {
        anyhow::bail!(
            "current has {} points but nominal has {}",
            input.current.len(),
            input.nominal.len()
        );
    }
    if input.nominal.is_empty() {
        anyhow::bail!("need at least one point pair");
    }

    let mut current: Vec<Vec3> = input.current.iter().copied().map(vec3_from_array).collect();
    let mut nominal: Vec<Vec3> = input.nominal.iter().copied().map(vec3_from_array).collect();
    if config.center {
        let c_cm = center_of_mass(&current)?;
        let n_cm = center_of_mass(&nominal)?;
        debug!("centring clouds: current at {c_cm:?}, nominal at {n_cm:?}");
        current.iter_mut().for_each(|p| *p -= c_cm);
        nominal.iter_mut().for_each(|p| *p -= n_cm);
    }

    let fit = diff_rot_with(&current, &nominal, &config.diff_rot)
        .with_context(|| format!("rotation fit over {} points failed", nominal.len()))?;
    let mut rotation = fit.rotation;
    if config.rectify {
        rectify(&mut rotation);
    }

    let rms_before = rms(&current, &nominal, &Mat3::identity());
    let rms_after = rms(&current, &nominal, &rotation);
    info!(
        "rotation fit: {} points, {} iterations, rms {:.3e} -> {:.3e}",
        nominal.len(),
        fit.iterations,
        rms_before,
        rms_after
    );

    Ok(RotationFitReport {
        rotation: mat3_to_rows(&rotation),
        angles: vec3_to_array(&to_angles(&rotation)),
        iterations: fit.iterations,
        rms_before,
        rms_after,
    })
}

fn rms(current: &[Vec3], nominal: &[Vec3], rotation: &Mat3) -> Real {
    let sum: Real = current
        .iter()
        .zip(nominal)
        .map(|(c, n)| (c - rotation * n).norm_squared())
        .sum();
    (sum / current.len() as Real).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use align_core::{rot_x, rot_z};

    fn cloud() -> Vec<Vec3> {
        vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(-1.0, -1.0, 0.5),
        ]
    }

    fn input_for(rotation: &Mat3, offset: Vec3) -> RotationFitInput {
        let nominal = cloud();
        RotationFitInput {
            current: nominal
                .iter()
                .map(|n| vec3_to_array(&(rotation * n + offset)))
                .collect(),
            nominal: nominal.iter().map(vec3_to_array).collect(),
        }
    }

    #[test]
    fn recovers_small_rotation() {
        let truth = rot_z(0.01) * rot_x(-0.004);
        let config = RotationFitConfig {
            diff_rot: DiffRotOptions {
                tolerance: 1e-24,
                ..DiffRotOptions::default()
            },
            ..RotationFitConfig::default()
        };
        let report = run_rotation_fit(&input_for(&truth, Vec3::zeros()), &config).unwrap();

        let expected = mat3_to_rows(&truth);
        for (row, exp) in report.rotation.iter().zip(expected.iter()) {
            for (v, e) in row.iter().zip(exp) {
                assert!((v - e).abs() < 1e-9);
            }
        }
        assert!(report.rms_before > 1e-3);
        assert!(report.rms_after < 1e-9);
    }

    #[test]
    fn centring_removes_a_common_offset() {
        let truth = rot_z(0.005);
        let offset = Vec3::new(10.0, -3.0, 2.0);
        let config = RotationFitConfig {
            center: true,
            ..RotationFitConfig::default()
        };
        let report = run_rotation_fit(&input_for(&truth, offset), &config).unwrap();
        assert!((report.angles[2] - 0.005).abs() < 1e-4, "{:?}", report.angles);
        assert!(report.rms_after < report.rms_before);
    }

    #[test]
    fn rejects_mismatched_and_empty_input() {
        let input = RotationFitInput {
            current: vec![[1.0, 0.0, 0.0]],
            nominal: vec![],
        };
        let err = run_rotation_fit(&input, &RotationFitConfig::default()).unwrap_err();
        assert!(err.to_string().contains("nominal has 0"));

        let empty = RotationFitInput {
            current: vec![],
            nominal: vec![],
        };
        assert!(run_rotation_fit(&empty, &RotationFitConfig::default()).is_err());
    }

    #[test]
    fn collinear_points_report_the_fit_failure() {
        let line: Vec<[Real; 3]> = (1..4).map(|i| [i as Real, 0.0, 0.0]).collect();
        let input = RotationFitInput {
            current: line.clone(),
            nominal: line,
        };
        let err = run_rotation_fit(&input, &RotationFitConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("singular"));
    }

    #[test]
    fn config_reads_partial_json() {
        let config: RotationFitConfig =
            serde_json::from_str(r#"{"center": true, "diff_rot": {"max_iters": 5}}"#).unwrap();
        assert!(config.center);
        assert!(config.rectify);
        assert_eq!(config.diff_rot.max_iters, 5);
        assert_eq!(config.diff_rot.tolerance, 1e-8);
    }
}
