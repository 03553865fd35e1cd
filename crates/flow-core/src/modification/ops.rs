use std::fmt;
use std::sync::Arc;

use super::Matcher;
use crate::unit::AsAny;

/// Operación de edición sobre una lista ordenada de elementos opacos.
pub enum Modification<T: ?Sized> {
    /// Inserta en `index`, acotado a `[0, len]`.
    Insert { index: usize, items: Vec<Arc<T>> },
    /// Elimina todo elemento que coincida.
    Remove(Matcher<T>),
    /// Inserta `items` justo antes de cada coincidencia.
    Before { matcher: Matcher<T>, items: Vec<Arc<T>> },
    /// Inserta `items` justo después de cada coincidencia.
    After { matcher: Matcher<T>, items: Vec<Arc<T>> },
}

impl<T: ?Sized + AsAny> Modification<T> {
    /// Aplica la operación y devuelve la lista nueva. Los elementos
    /// insertados no se vuelven a evaluar contra el matcher.
    pub fn apply(&self, input: Vec<Arc<T>>) -> Vec<Arc<T>> {
        match self {
            Modification::Insert { index, items } => {
                let mut out = input;
                let at = (*index).min(out.len());
                out.splice(at..at, items.iter().cloned());
                out
            }
            Modification::Remove(matcher) => input.into_iter().filter(|item| !matcher.matches(item)).collect(),
            Modification::Before { matcher, items } => {
                let mut out = Vec::with_capacity(input.len());
                for item in input {
                    if matcher.matches(&item) {
                        out.extend(items.iter().cloned());
                    }
                    out.push(item);
                }
                out
            }
            Modification::After { matcher, items } => {
                let mut out = Vec::with_capacity(input.len());
                for item in input {
                    let hit = matcher.matches(&item);
                    out.push(item);
                    if hit {
                        out.extend(items.iter().cloned());
                    }
                }
                out
            }
        }
    }
}

impl<T: ?Sized> Clone for Modification<T> {
    fn clone(&self) -> Self {
        match self {
            Modification::Insert { index, items } => Modification::Insert { index: *index,
                                                                             items: items.clone() },
            Modification::Remove(m) => Modification::Remove(m.clone()),
            Modification::Before { matcher, items } => Modification::Before { matcher: matcher.clone(),
                                                                               items: items.clone() },
            Modification::After { matcher, items } => Modification::After { matcher: matcher.clone(),
                                                                             items: items.clone() },
        }
    }
}

impl<T: ?Sized> fmt::Debug for Modification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modification::Insert { index, items } => write!(f, "Insert({index}, {} items)", items.len()),
            Modification::Remove(m) => write!(f, "Remove({m:?})"),
            Modification::Before { matcher, items } => write!(f, "Before({matcher:?}, {} items)", items.len()),
            Modification::After { matcher, items } => write!(f, "After({matcher:?}, {} items)", items.len()),
        }
    }
}
