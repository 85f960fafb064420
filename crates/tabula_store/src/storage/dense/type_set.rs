use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Deref;

use crate::component::ComponentId;

// -----------------------------------------------------------------------------
// TypeSet

/// A canonical set of component ids: sorted ascending, without duplicates.
///
/// The canonical form is the key of the table graph, so two sets built from
/// the same ids in any order select the same table.
///
/// # Examples
///
/// ```
/// # use tabula_store::storage::TypeSet;
/// # use tabula_store::component::Components;
/// # use tabula_store::component::Component;
/// # struct A; unsafe impl Component for A {}
/// # struct B; unsafe impl Component for B {}
/// let mut components = Components::new();
/// let a = components.register::<A>();
/// let b = components.register::<B>();
///
/// assert_eq!(TypeSet::new([b, a, b]), TypeSet::new([a, b]));
/// assert_eq!(TypeSet::new([b, a]).as_slice(), &[a, b]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeSet(Box<[ComponentId]>);

impl TypeSet {
    /// The empty set, the schema of the root table.
    #[inline]
    pub fn empty() -> Self {
        Self(Box::new([]))
    }

    /// Canonicalizes `ids` by sorting and removing duplicates.
    pub fn new(ids: impl IntoIterator<Item = ComponentId>) -> Self {
        let mut ids: Vec<ComponentId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids.into_boxed_slice())
    }

    #[inline]
    pub fn as_slice(&self) -> &[ComponentId] {
        &self.0
    }

    /// Returns `true` if `id` is part of the set.
    #[inline]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    #[inline]
    pub(crate) fn into_boxed_slice(self) -> Box<[ComponentId]> {
        self.0
    }
}

impl Deref for TypeSet {
    type Target = [ComponentId];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for TypeSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl FromIterator<ComponentId> for TypeSet {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        Self::new(iter)
    }
}
