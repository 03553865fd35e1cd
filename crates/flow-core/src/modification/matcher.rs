use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::unit::AsAny;

type Predicate<T> = dyn Fn(&T) -> bool + Send + Sync;

/// Criterio para localizar elementos dentro de una lista de modificación.
pub enum Matcher<T: ?Sized> {
    /// Misma instancia (`Arc::ptr_eq`).
    Instance(Arc<T>),
    /// Mismo tipo concreto detrás del trait object.
    Type(TypeId),
    Predicate(Arc<Predicate<T>>),
    /// OR lógico: basta con que coincida uno.
    Any(Vec<Matcher<T>>),
}

impl<T: ?Sized + AsAny> Matcher<T> {
    pub fn instance(item: &Arc<T>) -> Self {
        Matcher::Instance(Arc::clone(item))
    }

    pub fn of_type<U: Any>() -> Self {
        Matcher::Type(TypeId::of::<U>())
    }

    pub fn predicate<F>(f: F) -> Self
        where F: Fn(&T) -> bool + Send + Sync + 'static
    {
        Matcher::Predicate(Arc::new(f))
    }

    /// Combina con `other`; los `Any` anidados se aplanan.
    pub fn or(self, other: Matcher<T>) -> Self {
        let mut alternatives = match self {
            Matcher::Any(list) => list,
            single => vec![single],
        };
        match other {
            Matcher::Any(list) => alternatives.extend(list),
            single => alternatives.push(single),
        }
        Matcher::Any(alternatives)
    }

    pub fn matches(&self, item: &Arc<T>) -> bool {
        match self {
            Matcher::Instance(target) => Arc::ptr_eq(target, item),
            Matcher::Type(type_id) => {
                // Deref explícito: sobre el Arc el blanket impl devolvería el Arc.
                let any: &dyn Any = AsAny::as_any(&**item);
                any.type_id() == *type_id
            }
            Matcher::Predicate(f) => f(&**item),
            Matcher::Any(list) => list.iter().any(|m| m.matches(item)),
        }
    }
}

impl<T: ?Sized> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        match self {
            Matcher::Instance(item) => Matcher::Instance(Arc::clone(item)),
            Matcher::Type(id) => Matcher::Type(*id),
            Matcher::Predicate(f) => Matcher::Predicate(Arc::clone(f)),
            Matcher::Any(list) => Matcher::Any(list.clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Instance(item) => write!(f, "Instance({:p})", Arc::as_ptr(item)),
            Matcher::Type(id) => write!(f, "Type({id:?})"),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
            Matcher::Any(list) => f.debug_tuple("Any").field(list).finish(),
        }
    }
}
