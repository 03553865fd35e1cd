use std::sync::Arc;

use log::debug;
use serde_json::json;

use super::{order_indices, ResolverOptions};
use crate::constants::ENGINE_VERSION;
use crate::errors::OrderCycleError;
use crate::hashing::hash_value;
use crate::unit::{Unit, UnitDescriptor, UnitObject};

/// Secuencia ordenada de unidades listas para ejecutar.
///
/// Se resuelve una vez por objeto y se reutiliza en tantas ejecuciones como
/// haga falta, contra bags distintos. El fingerprint identifica la secuencia
/// (versión del motor + owner + pares owner/nombre en orden).
#[derive(Debug, Clone)]
pub struct UnitSequence {
    owner: String,
    units: Vec<Arc<dyn Unit>>,
    fingerprint: String,
}

impl UnitSequence {
    /// Extrae las unidades del objeto y las ordena.
    pub fn resolve(object: &dyn UnitObject, options: &ResolverOptions) -> Result<Self, OrderCycleError> {
        let units = object.units();
        let descriptors: Vec<&UnitDescriptor> = units.iter().map(|u| u.descriptor()).collect();
        let order = order_indices(&descriptors, options)?;
        let ordered: Vec<Arc<dyn Unit>> = order.into_iter().map(|i| Arc::clone(&units[i])).collect();
        debug!("resolved '{}': {} of {} units", object.identity(), ordered.len(), units.len());
        Ok(Self::from_ordered(object.identity(), ordered))
    }

    /// Confía en el orden recibido tal cual (sin resolver).
    pub fn from_ordered(owner: impl Into<String>, units: Vec<Arc<dyn Unit>>) -> Self {
        let owner = owner.into();
        let fingerprint = fingerprint_of(&owner, &units);
        Self { owner,
               units,
               fingerprint }
    }

    /// Concatena secuencias ya resueltas conservando el orden de cada una.
    pub fn concat(owner: impl Into<String>, parts: impl IntoIterator<Item = UnitSequence>) -> Self {
        let units = parts.into_iter().flat_map(|p| p.units).collect();
        Self::from_ordered(owner, units)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn units(&self) -> &[Arc<dyn Unit>] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name()).collect()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint_of(owner: &str, units: &[Arc<dyn Unit>]) -> String {
    let entries: Vec<_> = units.iter()
                               .map(|u| json!({ "owner": u.descriptor().owner, "name": u.name() }))
                               .collect();
    hash_value(&json!({
        "engine_version": ENGINE_VERSION,
        "owner": owner,
        "units": entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{UnitSet, ValueKind};
    use serde_json::json;

    fn calc() -> UnitSet {
        UnitSet::new("Calc").unit(UnitDescriptor::new("UseProperty").required("property", ValueKind::Integer),
                                  |_| Ok(None))
                            .unit(UnitDescriptor::new("GetProperty").produces("property"), |_| Ok(Some(json!(1))))
                            .unit(UnitDescriptor::new("Disabled").skip(), |_| Ok(None))
    }

    #[test]
    fn resolve_orders_object_units_and_drops_skipped() {
        let seq = UnitSequence::resolve(&calc(), &ResolverOptions::default()).expect("seq");
        assert_eq!(seq.owner(), "Calc");
        assert_eq!(seq.names(), vec!["GetProperty", "UseProperty"]);
        assert!(seq.units().iter().all(|u| u.descriptor().owner == "Calc"));
    }

    #[test]
    fn fingerprint_is_stable_and_order_sensitive() {
        let a = UnitSequence::resolve(&calc(), &ResolverOptions::default()).expect("seq");
        let b = UnitSequence::resolve(&calc(), &ResolverOptions::default()).expect("seq");
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut flipped: Vec<_> = a.units().to_vec();
        flipped.reverse();
        let c = UnitSequence::from_ordered("Calc", flipped);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn concat_keeps_part_order() {
        let first = UnitSequence::resolve(&calc(), &ResolverOptions::default()).expect("seq");
        let other = UnitSet::new("Other").unit(UnitDescriptor::new("Z"), |_| Ok(None))
                                         .unit(UnitDescriptor::new("A"), |_| Ok(None));
        let second = UnitSequence::resolve(&other, &ResolverOptions::default()).expect("seq");
        let joined = UnitSequence::concat("pipeline", [second, first]);
        assert_eq!(joined.names(), vec!["A", "Z", "GetProperty", "UseProperty"]);
    }
}
