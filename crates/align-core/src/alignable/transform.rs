//! Rigid moves of alignables in the global and local frames.
//!
//! A move or rotation of a node is propagated to every descendant so that
//! the subtree moves as one body. Accumulated displacement and rotation are
//! recorded on each node touched.

use crate::{
    axis_angle_rotation, rot_x, rot_y, rot_z, AlignError, AlignableId, AlignableTree, Mat3, Real,
    Vec3,
};

impl AlignableTree {
    /// Translate `id` and all of its descendants by a global vector.
    pub fn move_by(&mut self, id: AlignableId, displacement: &Vec3) {
        let comps = self[id].components.clone();
        for comp in comps {
            self.move_by(comp, displacement);
        }

        let node = &mut self[id];
        node.add_displacement(displacement);
        node.surface.move_by(displacement);
    }

    /// Rotate `id` by a rotation given in the global frame, about the node's
    /// own position. Components are carried along: their positions relative to
    /// the node are rotated, then they are rotated themselves.
    pub fn rotate_in_global_frame(&mut self, id: AlignableId, rotation: &Mat3) {
        let center = self[id].global_position();
        let inverse = rotation.transpose();

        let comps = self[id].components.clone();
        for comp in comps {
            let offset = self[comp].global_position() - center;
            let shift = inverse * offset - offset;
            self.move_by(comp, &shift);
            self.rotate_in_global_frame(comp, rotation);
        }

        let node = &mut self[id];
        node.add_rotation(rotation);
        node.surface.rotate(rotation);
    }

    /// Rotate `id` by a rotation given in its own local frame.
    ///
    /// The rotation is first expressed globally through the node's surface
    /// and then applied with [`AlignableTree::rotate_in_global_frame`].
    pub fn rotate_in_local_frame(&mut self, id: AlignableId, rotation: &Mat3) {
        let global = self[id].surface.to_global_rotation(rotation);
        self.rotate_in_global_frame(id, &global);
    }

    /// # Errors
    /// [`AlignError::ZeroAxis`] for a zero-length axis; the node is untouched.
    pub fn rotate_around_global_axis(
        &mut self,
        id: AlignableId,
        axis: &Vec3,
        radians: Real,
    ) -> Result<(), AlignError> {
        let rotation = axis_angle_rotation(axis, radians)?;
        self.rotate_in_global_frame(id, &rotation);
        Ok(())
    }

    /// # Errors
    /// [`AlignError::ZeroAxis`] for a zero-length axis; the node is untouched.
    pub fn rotate_around_local_axis(
        &mut self,
        id: AlignableId,
        axis: &Vec3,
        radians: Real,
    ) -> Result<(), AlignError> {
        let rotation = axis_angle_rotation(axis, radians)?;
        self.rotate_in_local_frame(id, &rotation);
        Ok(())
    }

    pub fn rotate_around_global_x(&mut self, id: AlignableId, radians: Real) {
        self.rotate_in_global_frame(id, &rot_x(radians));
    }

    pub fn rotate_around_global_y(&mut self, id: AlignableId, radians: Real) {
        self.rotate_in_global_frame(id, &rot_y(radians));
    }

    pub fn rotate_around_global_z(&mut self, id: AlignableId, radians: Real) {
        self.rotate_in_global_frame(id, &rot_z(radians));
    }

    pub fn rotate_around_local_x(&mut self, id: AlignableId, radians: Real) {
        self.rotate_in_local_frame(id, &rot_x(radians));
    }

    pub fn rotate_around_local_y(&mut self, id: AlignableId, radians: Real) {
        self.rotate_in_local_frame(id, &rot_y(radians));
    }

    pub fn rotate_around_local_z(&mut self, id: AlignableId, radians: Real) {
        self.rotate_in_local_frame(id, &rot_z(radians));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlignableSpec, AlignableSurface, DetId, Pt3};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_mat_close(a: &Mat3, b: &Mat3, tol: Real) {
        let diff = (a - b).abs().max();
        assert!(diff <= tol, "matrices differ by {diff}:\n{a}\nvs\n{b}");
    }

    fn unit_at(tree: &mut AlignableTree, mother: AlignableId, x: Real, y: Real) -> AlignableId {
        let surface = AlignableSurface::new(Pt3::new(x, y, 0.0), Mat3::identity());
        tree.add_component(mother, AlignableSpec::det_unit("unit", DetId(1), surface))
            .unwrap()
    }

    #[test]
    fn quarter_turns_compose_into_half_turn() {
        let mut twice = AlignableTree::new();
        let a = twice.add_root(AlignableSpec::composite("a", AlignableSurface::default()));
        twice.rotate_around_global_z(a, FRAC_PI_2);
        twice.rotate_around_global_z(a, FRAC_PI_2);

        let mut once = AlignableTree::new();
        let b = once.add_root(AlignableSpec::composite("b", AlignableSurface::default()));
        once.rotate_around_global_z(b, PI);

        assert_mat_close(twice[a].rotation(), once[b].rotation(), 1e-15);
        assert_mat_close(&twice[a].global_rotation(), &once[b].global_rotation(), 1e-15);
    }

    #[test]
    fn rotation_accumulates_by_post_multiplication() {
        let mut tree = AlignableTree::new();
        let a = tree.add_root(AlignableSpec::composite("a", AlignableSurface::default()));
        tree.rotate_around_global_x(a, 0.1);
        tree.rotate_around_global_y(a, 0.2);
        assert_mat_close(tree[a].rotation(), &(rot_x(0.1) * rot_y(0.2)), 1e-15);
    }

    #[test]
    fn move_propagates_to_components() {
        let mut tree = AlignableTree::new();
        let top = tree.add_root(AlignableSpec::composite("top", AlignableSurface::default()));
        let u = unit_at(&mut tree, top, 1.0, 0.0);

        let d = Vec3::new(0.1, -0.2, 0.3);
        tree.move_by(top, &d);
        tree.move_by(top, &d);

        assert_eq!(tree[top].displacement(), &(d * 2.0));
        assert!((tree[u].global_position() - Pt3::new(1.2, -0.4, 0.6)).norm() < 1e-15);
        assert_eq!(tree[u].displacement(), &(d * 2.0));
    }

    #[test]
    fn global_rotation_carries_components_around_mother() {
        let mut tree = AlignableTree::new();
        let top = tree.add_root(AlignableSpec::composite("top", AlignableSurface::default()));
        let u = unit_at(&mut tree, top, 2.0, 0.0);

        tree.rotate_around_global_z(top, FRAC_PI_2);

        // rot_z(θ) maps global vectors with its transpose: +x goes to +y.
        assert!((tree[u].global_position() - Pt3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
        assert_mat_close(tree[u].rotation(), &rot_z(FRAC_PI_2), 1e-15);
        assert_mat_close(&tree[u].global_rotation(), &rot_z(FRAC_PI_2), 1e-15);
        assert!((tree[u].displacement() - Vec3::new(-2.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn local_rotation_is_conjugated_through_surface() {
        let mut tree = AlignableTree::new();
        let frame = rot_x(FRAC_PI_2);
        let surface = AlignableSurface::new(Pt3::new(0.0, 0.0, 1.0), frame);
        let det = tree.add_root(AlignableSpec::det("det", DetId(3), surface));

        tree.rotate_around_local_z(det, 0.25);

        let expected = frame.transpose() * rot_z(0.25) * frame;
        assert_mat_close(tree[det].rotation(), &expected, 1e-15);
        // The surface picks up the local rotation on the left.
        assert_mat_close(&tree[det].global_rotation(), &(rot_z(0.25) * frame), 1e-15);
    }

    #[test]
    fn local_axis_matches_principal_local_rotation() {
        let surface = AlignableSurface::new(Pt3::origin(), rot_z(0.3) * rot_x(0.1));
        let mut a = AlignableTree::new();
        let ia = a.add_root(AlignableSpec::det("d", DetId(1), surface));
        let mut b = a.clone();

        a.rotate_around_local_axis(ia, &Vec3::new(0.0, 3.0, 0.0), 0.05)
            .unwrap();
        b.rotate_around_local_y(ia, 0.05);
        assert_mat_close(a[ia].rotation(), b[ia].rotation(), 1e-15);
    }

    #[test]
    fn zero_axis_leaves_node_untouched() {
        let mut tree = AlignableTree::new();
        let a = tree.add_root(AlignableSpec::composite("a", AlignableSurface::default()));
        assert_eq!(
            tree.rotate_around_global_axis(a, &Vec3::zeros(), 1.0),
            Err(AlignError::ZeroAxis)
        );
        assert_eq!(tree[a].rotation(), &Mat3::identity());
    }
}
