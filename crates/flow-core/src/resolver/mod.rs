//! Order Resolver: descriptores sin orden de un objeto → secuencia total y
//! determinista.
//!
//! Precedencia de señales (de mayor a menor):
//! 1. `explicit_order` (sin valor = 0), usado como comparador débil.
//! 2. `after`: arista dura hacia la unidad nombrada; se ignora si no existe.
//! 3. smart order: arista dura productor → consumidor por nombre de salida.
//! 4. nombre, ascendente.
//!
//! Las aristas duras siempre ganan al comparador; el orden explícito sólo
//! desempata unidades sin camino entre ellas. Un ciclo en las aristas duras
//! es un `OrderCycleError` y no se devuelve orden parcial.

mod graph;
mod sequence;

pub use sequence::UnitSequence;

use serde::{Deserialize, Serialize};

use crate::errors::OrderCycleError;
use crate::unit::UnitDescriptor;
use graph::DependencyGraph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Activa la inferencia de dependencias por datos.
    pub smart_order: bool,
    /// Allow-list de prefijos de nombres de parámetro que participan en smart
    /// order. Vacía = todos.
    pub prefixes: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { smart_order: true,
               prefixes: Vec::new() }
    }
}

impl ResolverOptions {
    pub fn without_smart_order() -> Self {
        Self { smart_order: false,
               ..Self::default() }
    }

    pub fn with_prefixes<I, S>(prefixes: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { smart_order: true,
               prefixes: prefixes.into_iter().map(Into::into).collect() }
    }

    pub fn participates(&self, param_name: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| param_name.starts_with(p.as_str()))
    }
}

/// Índices (sobre `units`) de las unidades no omitidas, en orden de
/// ejecución.
pub fn order_indices(units: &[&UnitDescriptor], options: &ResolverOptions) -> Result<Vec<usize>, OrderCycleError> {
    let live: Vec<usize> = (0..units.len()).filter(|&i| !units[i].skipped).collect();
    let descriptors: Vec<&UnitDescriptor> = live.iter().map(|&i| units[i]).collect();
    let graph = DependencyGraph::build(&descriptors, options)?;
    let order = graph.sort()?;
    Ok(order.into_iter().map(|i| live[i]).collect())
}

/// `resolveOrder`: función pura sobre descriptores.
pub fn resolve_order<'a>(units: &'a [UnitDescriptor], options: &ResolverOptions) -> Result<Vec<&'a UnitDescriptor>, OrderCycleError> {
    let refs: Vec<&UnitDescriptor> = units.iter().collect();
    let order = order_indices(&refs, options)?;
    Ok(order.into_iter().map(|i| &units[i]).collect())
}
