//! Grafo de dependencias duras de un objeto y su orden topológico.
//!
//! Aristas:
//! - after: `C.after == P.name` ⇒ P → C.
//! - smart order: `P.output_key() == C.param.name` ⇒ P → C (sin auto-aristas).
//!
//! El orden se calcula con Kahn; entre los nodos listos se elige siempre el
//! menor según `(rank, name, índice de declaración)`, de modo que el
//! resultado es total y determinista.

use std::collections::BTreeSet;

use log::{debug, warn};

use super::ResolverOptions;
use crate::errors::OrderCycleError;
use crate::unit::UnitDescriptor;

pub(crate) struct DependencyGraph<'a> {
    units: &'a [&'a UnitDescriptor],
    successors: Vec<BTreeSet<usize>>,
    in_degree: Vec<usize>,
}

impl<'a> DependencyGraph<'a> {
    pub(crate) fn build(units: &'a [&'a UnitDescriptor], options: &ResolverOptions) -> Result<Self, OrderCycleError> {
        let n = units.len();
        let mut graph = Self { units,
                               successors: vec![BTreeSet::new(); n],
                               in_degree: vec![0; n] };

        for (child, unit) in units.iter().enumerate() {
            let Some(target) = unit.after.as_deref() else {
                continue;
            };
            let parents: Vec<usize> = units.iter()
                                           .enumerate()
                                           .filter(|(_, u)| u.name == target)
                                           .map(|(i, _)| i)
                                           .collect();
            if parents.is_empty() {
                warn!("unit '{}' in '{}' declares after '{}' which does not exist; ignoring", unit.name, unit.owner, target);
                continue;
            }
            if parents.contains(&child) {
                return Err(OrderCycleError { owner: unit.owner.clone(),
                                             units: vec![unit.name.clone()] });
            }
            for parent in parents {
                debug!("after edge {} -> {}", units[parent].name, unit.name);
                graph.add_edge(parent, child);
            }
        }

        if options.smart_order {
            for (parent, producer) in units.iter().enumerate() {
                let Some(key) = producer.output_key() else {
                    continue;
                };
                if !options.participates(key) {
                    continue;
                }
                for (child, consumer) in units.iter().enumerate() {
                    if child != parent && consumer.consumes(key) {
                        debug!("data edge {} -> {} via '{}'", producer.name, consumer.name, key);
                        graph.add_edge(parent, child);
                    }
                }
            }
        }

        Ok(graph)
    }

    fn add_edge(&mut self, from: usize, to: usize) {
        if self.successors[from].insert(to) {
            self.in_degree[to] += 1;
        }
    }

    fn sort_key(&self, idx: usize) -> (i32, &'a str, usize) {
        let unit = self.units[idx];
        (unit.rank(), unit.name.as_str(), idx)
    }

    /// Orden topológico preferente o error con las unidades del ciclo.
    pub(crate) fn sort(&self) -> Result<Vec<usize>, OrderCycleError> {
        let mut in_degree = self.in_degree.clone();
        let mut ready: BTreeSet<(i32, &str, usize)> = (0..self.units.len()).filter(|&i| in_degree[i] == 0)
                                                                            .map(|i| self.sort_key(i))
                                                                            .collect();
        let mut order = Vec::with_capacity(self.units.len());

        while let Some((_, _, current)) = ready.pop_first() {
            order.push(current);
            for &next in &self.successors[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.insert(self.sort_key(next));
                }
            }
        }

        if order.len() == self.units.len() {
            return Ok(order);
        }
        Err(self.cycle_error(&order))
    }

    /// Quita repetidamente los nodos pendientes sin sucesores pendientes; lo
    /// que queda está en un ciclo (o entre ciclos).
    fn cycle_error(&self, emitted: &[usize]) -> OrderCycleError {
        let mut pending: BTreeSet<usize> = (0..self.units.len()).filter(|i| !emitted.contains(i)).collect();
        loop {
            let sinks: Vec<usize> = pending.iter()
                                           .copied()
                                           .filter(|&i| !self.successors[i].iter().any(|s| pending.contains(s)))
                                           .collect();
            if sinks.is_empty() {
                break;
            }
            for s in sinks {
                pending.remove(&s);
            }
        }
        let mut units: Vec<String> = pending.iter().map(|&i| self.units[i].name.clone()).collect();
        units.sort();
        units.dedup();
        let owner = self.units.first().map(|u| u.owner.clone()).unwrap_or_default();
        OrderCycleError { owner, units }
    }
}
