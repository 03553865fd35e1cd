//! `CompositeModification`: aplica una secuencia de `Modification` en orden,
//! cada una sobre la salida de la anterior.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::{Matcher, Modification};
use crate::unit::AsAny;

pub struct CompositeModification<T: ?Sized> {
    pub modifications: Vec<Modification<T>>,
}

impl<T: ?Sized> CompositeModification<T> {
    pub fn new() -> Self {
        Self { modifications: Vec::new() }
    }

    pub fn with_modifications(modifications: Vec<Modification<T>>) -> Self {
        Self { modifications }
    }

    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }
}

impl<T: ?Sized + AsAny> CompositeModification<T> {
    pub fn apply(&self, items: Vec<Arc<T>>) -> Vec<Arc<T>> {
        self.modifications.iter().fold(items, |acc, m| {
                                     let before = acc.len();
                                     let out = m.apply(acc);
                                     debug!("{:?}: {} -> {} items", m, before, out.len());
                                     out
                                 })
    }
}

// Manual: derive exigiría `T: Clone + Debug`, imposible para trait objects.
impl<T: ?Sized> Clone for CompositeModification<T> {
    fn clone(&self) -> Self {
        Self::with_modifications(self.modifications.clone())
    }
}

impl<T: ?Sized> fmt::Debug for CompositeModification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.modifications).finish()
    }
}

impl<T: ?Sized> Default for CompositeModification<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Acumula operaciones de edición; `get_configuration` entrega la
/// composición en el orden declarado.
pub struct ModificationBuilder<T: ?Sized> {
    modifications: Vec<Modification<T>>,
}

impl<T: ?Sized> ModificationBuilder<T> {
    pub fn new() -> Self {
        Self { modifications: Vec::new() }
    }

    pub fn insert(mut self, index: usize, items: impl IntoIterator<Item = Arc<T>>) -> Self {
        self.modifications.push(Modification::Insert { index,
                                                       items: items.into_iter().collect() });
        self
    }

    pub fn remove(mut self, matcher: Matcher<T>) -> Self {
        self.modifications.push(Modification::Remove(matcher));
        self
    }

    pub fn before(mut self, matcher: Matcher<T>, items: impl IntoIterator<Item = Arc<T>>) -> Self {
        self.modifications.push(Modification::Before { matcher,
                                                       items: items.into_iter().collect() });
        self
    }

    pub fn after(mut self, matcher: Matcher<T>, items: impl IntoIterator<Item = Arc<T>>) -> Self {
        self.modifications.push(Modification::After { matcher,
                                                      items: items.into_iter().collect() });
        self
    }

    pub fn get_configuration(&self) -> CompositeModification<T> {
        CompositeModification::with_modifications(self.modifications.clone())
    }
}

impl<T: ?Sized> fmt::Debug for ModificationBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModificationBuilder").field("modifications", &self.modifications).finish()
    }
}

impl<T: ?Sized> Default for ModificationBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
