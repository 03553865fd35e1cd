//! Core ExecutionEngine implementation

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::binding::{bind, Binding};
use super::builder::EngineBuilder;
use crate::bag::Bag;
use crate::errors::ExecutionError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind, SkipReason};
use crate::resolver::UnitSequence;
use crate::unit::{BoundArgs, Invocation, InvocationMode, Unit};

/// Opciones de ejecución que no viajan en el bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Equivale a activar `__throw_on_missing` en todos los bags.
    pub throw_on_missing: bool,
}

/// Resumen devuelto por `execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Unidades invocadas que retornaron, en orden.
    pub executed: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    /// El flag de fin quedó activo al terminar el run.
    pub ended_early: bool,
}

impl RunSummary {
    fn new(run_id: Uuid) -> Self {
        Self { run_id,
               executed: Vec::new(),
               skipped: Vec::new(),
               ended_early: false }
    }
}

/// Motor de ejecución de secuencias de unidades.
///
/// Recorre la secuencia en orden contra un único bag mutable. Cada unidad
/// ve el bag tal como lo dejaron las anteriores. El engine no guarda estado
/// entre ejecuciones salvo el store de eventos, así que la misma secuencia
/// puede ejecutarse contra muchos bags.
#[derive(Debug)]
pub struct ExecutionEngine<E = InMemoryEventStore>
    where E: EventStore
{
    event_store: E,
    options: EngineOptions,
    last_run: Option<Uuid>,
}

impl ExecutionEngine<InMemoryEventStore> {
    /// Engine con store en memoria y opciones por defecto.
    pub fn new() -> Self {
        Self::with_store(InMemoryEventStore::default())
    }

    pub fn builder() -> EngineBuilder<InMemoryEventStore> {
        EngineBuilder::new(InMemoryEventStore::default())
    }
}

impl Default for ExecutionEngine<InMemoryEventStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventStore> ExecutionEngine<E> {
    pub fn with_store(event_store: E) -> Self {
        Self { event_store,
               options: EngineOptions::default(),
               last_run: None }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Acceso mutable al store, p. ej. para drenar runs viejos de un engine
    /// reutilizado.
    pub fn event_store_mut(&mut self) -> &mut E {
        &mut self.event_store
    }

    pub fn into_event_store(self) -> E {
        self.event_store
    }

    /// Ejecuta `sequence` contra `bag`.
    ///
    /// Las condiciones blandas (parámetro faltante, flag de fin) nunca son
    /// errores: se registran como eventos y en el resumen. Sólo el fallo de
    /// una unidad o un faltante con throw-on-missing activo cortan el run con
    /// `Err`; el bag conserva las escrituras hechas hasta ese punto.
    pub fn execute(&mut self, sequence: &UnitSequence, bag: &mut Bag) -> Result<RunSummary, ExecutionError> {
        let run_id = Uuid::new_v4();
        self.last_run = Some(run_id);
        let mut summary = RunSummary::new(run_id);
        let throw_on_missing = self.options.throw_on_missing || bag.throw_on_missing();

        info!("run {} started: '{}' with {} units", run_id, sequence.owner(), sequence.len());
        self.event_store.append_kind(run_id,
                                     RunEventKind::RunStarted { sequence_fingerprint: sequence.fingerprint().to_string(),
                                                                unit_count: sequence.len() });

        for (index, unit) in sequence.units().iter().enumerate() {
            if bag.is_ended() {
                self.skip(&mut summary, index, unit.name(), SkipReason::Ended);
                continue;
            }

            let args = match self.prepare(unit.as_ref(), bag, throw_on_missing) {
                Ok(Binding::Ready(args)) => args,
                Ok(Binding::Skip(reason)) => {
                    self.skip(&mut summary, index, unit.name(), reason);
                    continue;
                }
                Ok(Binding::End { param, message }) => {
                    info!("run {} ended by unit '{}': missing '{}'", run_id, unit.name(), param);
                    bag.error(message)?;
                    bag.abort();
                    self.event_store.append_kind(run_id,
                                                 RunEventKind::RunEnded { index,
                                                                          unit: unit.name().to_string(),
                                                                          param });
                    continue;
                }
                Err(err) => {
                    self.fail(run_id, index, unit.name(), err.to_string());
                    return Err(err.into());
                }
            };

            self.invoke(&mut summary, index, unit.as_ref(), args, bag)?;
        }

        summary.ended_early = bag.is_ended();
        self.event_store.append_kind(run_id,
                                     RunEventKind::RunCompleted { executed: summary.executed.len(),
                                                                  ended_early: summary.ended_early });
        info!("run {} completed: {} executed, {} skipped{}",
              run_id,
              summary.executed.len(),
              summary.skipped.len(),
              if summary.ended_early { " (ended early)" } else { "" });
        Ok(summary)
    }

    fn prepare(&self, unit: &dyn Unit, bag: &Bag, throw_on_missing: bool)
               -> Result<Binding, crate::errors::MissingOrWrongTypePropertyError> {
        match unit.descriptor().mode {
            InvocationMode::AggregateBag => Ok(Binding::Ready(BoundArgs::new())),
            InvocationMode::PerParameter => bind(unit.descriptor(), bag, throw_on_missing),
        }
    }

    fn invoke(&mut self, summary: &mut RunSummary, index: usize, unit: &dyn Unit, args: BoundArgs, bag: &mut Bag)
              -> Result<(), ExecutionError> {
        let run_id = summary.run_id;
        let name = unit.name().to_string();
        self.event_store.append_kind(run_id, RunEventKind::UnitStarted { index, unit: name.clone() });
        debug!("invoking '{}' with {} bound args", name, args.len());

        let returned = match unit.invoke(Invocation::new(args, bag)) {
            Ok(returned) => returned,
            Err(source) => {
                self.fail(run_id, index, &name, source.to_string());
                return Err(ExecutionError::UnitFailed { unit: name, source });
            }
        };

        let output = match unit.descriptor().output_key() {
            Some(key) => {
                bag.set(key, returned.unwrap_or(Value::Null));
                Some(key.to_string())
            }
            None => {
                if returned.is_some() {
                    debug!("unit '{}' returned a value without a declared output; discarded", name);
                }
                None
            }
        };

        self.event_store.append_kind(run_id,
                                     RunEventKind::UnitFinished { index,
                                                                  unit: name.clone(),
                                                                  output });
        summary.executed.push(name);
        Ok(())
    }

    fn skip(&mut self, summary: &mut RunSummary, index: usize, unit: &str, reason: SkipReason) {
        debug!("skipping '{}': {:?}", unit, reason);
        self.event_store.append_kind(summary.run_id,
                                     RunEventKind::UnitSkipped { index,
                                                                 unit: unit.to_string(),
                                                                 reason: reason.clone() });
        summary.skipped.push((unit.to_string(), reason));
    }

    fn fail(&mut self, run_id: Uuid, index: usize, unit: &str, error: String) {
        warn!("run {} aborted at unit '{}': {}", run_id, unit, error);
        self.event_store.append_kind(run_id,
                                     RunEventKind::UnitFailed { index,
                                                                unit: unit.to_string(),
                                                                error });
    }

    pub fn last_run(&self) -> Option<Uuid> {
        self.last_run
    }

    /// Eventos de un run concreto.
    pub fn events_for(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    /// Eventos del último run ejecutado.
    pub fn events(&self) -> Option<Vec<RunEvent>> {
        self.last_run.map(|id| self.event_store.list(id))
    }

    /// Letras de los eventos del último run (ej. `["I","S","F","C"]`).
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| events.iter().map(|e| e.kind.letter()).collect())
    }
}
