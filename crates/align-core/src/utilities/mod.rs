//! Pure transform utilities: rotation construction, Euler angle conversion,
//! centroids and the small-angle rotation fit.

mod angles;
mod diff_rot;
mod points;

pub use angles::{axis_angle_rotation, rectify, rot_x, rot_y, rot_z, to_angles, to_matrix};
pub use diff_rot::{diff_rot, diff_rot_with, inertia_tensor, DiffRotOptions, RotationFit};
pub use points::{center_of_mass, diff_r, mother_position};
