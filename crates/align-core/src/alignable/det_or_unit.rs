use crate::{Alignable, AlignableId, AlignableKind, AlignableTree};

/// Non-owning reference to either a det or a det unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignableDetOrUnit {
    Det(AlignableId),
    Unit(AlignableId),
}

impl AlignableDetOrUnit {
    /// Reference to `id` if it is a det or a det unit, `None` for composites
    /// and ids foreign to `tree`.
    pub fn new(tree: &AlignableTree, id: AlignableId) -> Option<Self> {
        match tree.get(id)?.kind() {
            AlignableKind::Det => Some(Self::Det(id)),
            AlignableKind::DetUnit => Some(Self::Unit(id)),
            AlignableKind::Composite => None,
        }
    }

    pub fn id(self) -> AlignableId {
        match self {
            Self::Det(id) | Self::Unit(id) => id,
        }
    }

    pub fn is_det(self) -> bool {
        matches!(self, Self::Det(_))
    }

    pub fn is_unit(self) -> bool {
        matches!(self, Self::Unit(_))
    }

    /// The referenced node seen as a plain alignable.
    pub fn resolve(self, tree: &AlignableTree) -> &Alignable {
        &tree[self.id()]
    }

    pub fn resolve_mut(self, tree: &mut AlignableTree) -> &mut Alignable {
        &mut tree[self.id()]
    }
}

impl From<AlignableDetOrUnit> for AlignableId {
    fn from(value: AlignableDetOrUnit) -> Self {
        value.id()
    }
}
