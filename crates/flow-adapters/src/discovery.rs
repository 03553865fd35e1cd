//! Proveedores de objetos declarantes de unidades.
//!
//! Un provider entrega instancias sin orden ni resolución; quien lo consume
//! (normalmente un `Pipeline`) decide cómo ordenarlas y ejecutarlas.

use std::sync::Arc;

use flow_core::UnitObject;

pub trait ObjectProvider: Send + Sync {
    fn objects(&self) -> Vec<Arc<dyn UnitObject>>;
}

/// Lista explícita de objetos, devuelta en el orden de registro.
#[derive(Default, Clone)]
pub struct StaticProvider {
    objects: Vec<Arc<dyn UnitObject>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, object: impl UnitObject + 'static) -> Self {
        self.objects.push(Arc::new(object));
        self
    }

    pub fn with_shared(mut self, object: Arc<dyn UnitObject>) -> Self {
        self.objects.push(object);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectProvider for StaticProvider {
    fn objects(&self) -> Vec<Arc<dyn UnitObject>> {
        self.objects.clone()
    }
}

impl std::fmt::Debug for StaticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.objects.iter().map(|o| o.identity())).finish()
    }
}

type IdentityFilter = dyn Fn(&str) -> bool + Send + Sync;

/// Deja pasar sólo los objetos cuya identidad cumple el predicado.
pub struct FilteredProvider<P: ObjectProvider> {
    inner: P,
    filter: Box<IdentityFilter>,
}

impl<P: ObjectProvider> FilteredProvider<P> {
    pub fn new<F>(inner: P, filter: F) -> Self
        where F: Fn(&str) -> bool + Send + Sync + 'static
    {
        Self { inner,
               filter: Box::new(filter) }
    }

    /// Atajo: identidades que empiezan con `prefix`.
    pub fn with_prefix(inner: P, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self::new(inner, move |identity| identity.starts_with(prefix.as_str()))
    }
}

impl<P: ObjectProvider> ObjectProvider for FilteredProvider<P> {
    fn objects(&self) -> Vec<Arc<dyn UnitObject>> {
        self.inner.objects().into_iter().filter(|o| (self.filter)(o.identity())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::UnitSet;

    fn provider() -> StaticProvider {
        StaticProvider::new().with(UnitSet::new("text.Trim"))
                             .with(UnitSet::new("math.Sum"))
                             .with(UnitSet::new("text.Upper"))
    }

    #[test]
    fn static_provider_keeps_registration_order() {
        let ids: Vec<String> = provider().objects().iter().map(|o| o.identity().to_string()).collect();
        assert_eq!(ids, vec!["text.Trim", "math.Sum", "text.Upper"]);
    }

    #[test]
    fn filtered_provider_applies_predicate() {
        let filtered = FilteredProvider::with_prefix(provider(), "text.");
        let ids: Vec<String> = filtered.objects().iter().map(|o| o.identity().to_string()).collect();
        assert_eq!(ids, vec!["text.Trim", "text.Upper"]);
    }
}
