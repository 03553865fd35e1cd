//! Caché concurrente de órdenes resueltos.
//!
//! Sólo se guarda el orden (índices sobre `units()`), nunca las unidades: en
//! cada acceso los índices se aplican a las unidades del objeto recibido, así
//! que dos instancias con la misma identidad y configuración distinta
//! ejecutan cada una sus propias closures. La clave incluye un hash de los
//! descriptores declarados; si un objeto cambia lo que declara, la entrada
//! vieja simplemente deja de coincidir.
use std::sync::Arc;

use dashmap::DashMap;
use flow_core::hashing::hash_value;
use flow_core::resolver::order_indices;
use flow_core::{OrderCycleError, ResolverOptions, Unit, UnitDescriptor, UnitObject, UnitSequence};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    identity: String,
    smart_order: bool,
    prefixes: Vec<String>,
    /// Hash de los descriptores en orden de declaración.
    shape: String,
}

#[derive(Debug, Default)]
pub struct SequenceCache {
    entries: DashMap<CacheKey, Arc<[usize]>>,
}

fn shape_of(descriptors: &[&UnitDescriptor]) -> Option<String> {
    match serde_json::to_value(descriptors) {
        Ok(value) => Some(hash_value(&value)),
        Err(e) => {
            warn!("descriptors are not serializable, skipping cache: {e}");
            None
        }
    }
}

impl SequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devuelve la secuencia del objeto reutilizando el orden cacheado, o lo
    /// resuelve y lo guarda. Un ciclo no se cachea.
    pub fn get_or_resolve(&self, object: &dyn UnitObject, options: &ResolverOptions)
                          -> Result<Arc<UnitSequence>, OrderCycleError> {
        let units = object.units();
        let descriptors: Vec<&UnitDescriptor> = units.iter().map(|u| u.descriptor()).collect();
        let Some(shape) = shape_of(&descriptors) else {
            return UnitSequence::resolve(object, options).map(Arc::new);
        };
        let key = CacheKey { identity: object.identity().to_string(),
                             smart_order: options.smart_order,
                             prefixes: options.prefixes.clone(),
                             shape };

        let order = match self.entries.get(&key) {
            Some(hit) => {
                debug!("sequence cache hit for '{}'", object.identity());
                Arc::clone(hit.value())
            }
            None => {
                let order: Arc<[usize]> = order_indices(&descriptors, options)?.into();
                Arc::clone(self.entries.entry(key).or_insert(order).value())
            }
        };
        let ordered: Vec<Arc<dyn Unit>> = order.iter().map(|&i| Arc::clone(&units[i])).collect();
        Ok(Arc::new(UnitSequence::from_ordered(object.identity(), ordered)))
    }

    /// Descarta todas las entradas de `identity`, con cualquier opción.
    pub fn invalidate(&self, identity: &str) {
        self.entries.retain(|k, _| k.identity != identity);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
