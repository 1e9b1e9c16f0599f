//! Arena holding a forest of alignables.
//!
//! The tree owns every node; nodes refer to each other by [`AlignableId`].
//! Dropping the tree releases all nodes together with their parameter blocks
//! and survey records.

use std::ops::{Index, IndexMut};

use crate::{mother_position, AlignError, Alignable, AlignableId, AlignableKind, AlignableSpec, Pt3};

#[derive(Debug, Clone, Default)]
pub struct AlignableTree {
    nodes: Vec<Alignable>,
}

impl AlignableTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: AlignableId) -> Option<&Alignable> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: AlignableId) -> Option<&mut Alignable> {
        self.nodes.get_mut(id.0)
    }

    /// Insert a node without a mother.
    pub fn add_root(&mut self, spec: AlignableSpec) -> AlignableId {
        let id = AlignableId(self.nodes.len());
        self.nodes.push(Alignable::from_spec(id, spec, None));
        id
    }

    /// Insert a node as the last component of `mother`.
    ///
    /// # Errors
    /// [`AlignError::LeafHasNoComponents`] if `mother` is a det unit.
    ///
    /// # Panics
    /// Panics if `mother` does not belong to this tree.
    pub fn add_component(
        &mut self,
        mother: AlignableId,
        spec: AlignableSpec,
    ) -> Result<AlignableId, AlignError> {
        if self[mother].kind == AlignableKind::DetUnit {
            return Err(AlignError::LeafHasNoComponents(mother));
        }
        let id = AlignableId(self.nodes.len());
        self.nodes.push(Alignable::from_spec(id, spec, Some(mother)));
        self.nodes[mother.0].components.push(id);
        Ok(id)
    }

    /// Nodes without a mother, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = AlignableId> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.mother.is_none())
            .map(|node| node.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alignable> {
        self.nodes.iter()
    }

    /// Direct components of `id`.
    pub fn components(&self, id: AlignableId) -> &[AlignableId] {
        &self[id].components
    }

    /// Leaf descendants of `id` in depth-first, left-to-right order; a leaf
    /// yields only itself.
    pub fn deep_component_ids(&self, id: AlignableId) -> Vec<AlignableId> {
        let mut result = Vec::new();
        self.collect_leaves(id, &mut result);
        result
    }

    fn collect_leaves(&self, id: AlignableId, result: &mut Vec<AlignableId>) {
        let comps = &self[id].components;
        if comps.is_empty() {
            result.push(id);
        } else {
            for &comp in comps {
                self.collect_leaves(comp, result);
            }
        }
    }

    /// Leaf descendants of `id` (see [`AlignableTree::deep_component_ids`]).
    pub fn deep_components(&self, id: AlignableId) -> Vec<&Alignable> {
        self.deep_component_ids(id)
            .into_iter()
            .map(|leaf| &self[leaf])
            .collect()
    }

    /// Mutable leaf descendants of `id`, same order as
    /// [`AlignableTree::deep_components`].
    pub fn deep_components_mut(&mut self, id: AlignableId) -> Vec<&mut Alignable> {
        let leaves = self.deep_component_ids(id);
        let mut slots: Vec<Option<&mut Alignable>> = self.nodes.iter_mut().map(Some).collect();
        leaves
            .into_iter()
            .filter_map(|leaf| slots[leaf.0].take())
            .collect()
    }

    /// Append to `out` the first parameter-carrying node on every branch
    /// below `id`: a component with parameters itself, otherwise the first
    /// such nodes found by recursing into it.
    ///
    /// Returns `false` when parameter depth is not uniform:
    /// - a component contributes nothing while an earlier sibling did;
    /// - a component contributes after an earlier sibling (the first one
    ///   included) contributed nothing;
    /// - a deeper level is already inconsistent.
    ///
    /// Only the first component may contribute with nothing before it.
    /// Found nodes are appended regardless.
    pub fn first_comps_with_params(&self, id: AlignableId, out: &mut Vec<AlignableId>) -> bool {
        let mut consistent = true;
        let mut has_ali_comp = false;

        for (i, &comp) in self[id].components.iter().enumerate() {
            let first = i == 0;
            if self[comp].parameters.is_some() {
                out.push(comp);
                if !first && !has_ali_comp {
                    consistent = false;
                }
                has_ali_comp = true;
            } else {
                let before = out.len();
                if !self.first_comps_with_params(comp, out) {
                    consistent = false;
                }
                if out.len() != before {
                    if !first && !has_ali_comp {
                        consistent = false;
                    }
                    has_ali_comp = true;
                } else if has_ali_comp {
                    consistent = false;
                }
            }
        }

        consistent
    }

    /// Move a node's surface origin to the mean position of its direct
    /// components without touching the components.
    ///
    /// # Errors
    /// [`AlignError::EmptyInput`] if `id` has no components.
    pub fn center_on_components(&mut self, id: AlignableId) -> Result<Pt3, AlignError> {
        let positions: Vec<Pt3> = self[id]
            .components
            .iter()
            .map(|&comp| self[comp].global_position())
            .collect();
        let center = mother_position(&positions)?;
        self[id].surface.position = center;
        Ok(center)
    }
}

impl Index<AlignableId> for AlignableTree {
    type Output = Alignable;

    fn index(&self, id: AlignableId) -> &Alignable {
        &self.nodes[id.0]
    }
}

impl IndexMut<AlignableId> for AlignableTree {
    fn index_mut(&mut self, id: AlignableId) -> &mut Alignable {
        &mut self.nodes[id.0]
    }
}
