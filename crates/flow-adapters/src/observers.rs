//! Stores de eventos que actúan como observadores de una ejecución.
//!
//! El engine sólo conoce `EventStore`; cualquier suscriptor se engancha
//! envolviendo el store real:
//! - `LoggingEventStore`: reenvía cada evento al facade `log`.
//! - `BroadcastStore`: reparte cada evento a una lista de `RunObserver`.

use flow_core::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use log::{debug, info, warn};
use uuid::Uuid;

/// Envuelve un store y registra cada evento vía `log`.
#[derive(Debug, Default)]
pub struct LoggingEventStore<S: EventStore = InMemoryEventStore> {
    inner: S,
}

impl<S: EventStore> LoggingEventStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

fn log_event(event: &RunEvent) {
    let run = event.run_id;
    match &event.kind {
        RunEventKind::RunStarted { sequence_fingerprint, unit_count } => {
            info!("[{run}] started: {unit_count} units, fingerprint {sequence_fingerprint}")
        }
        RunEventKind::UnitStarted { index, unit } => debug!("[{run}] #{index} {unit} started"),
        RunEventKind::UnitFinished { index, unit, output } => match output {
            Some(key) => debug!("[{run}] #{index} {unit} finished -> '{key}'"),
            None => debug!("[{run}] #{index} {unit} finished"),
        },
        RunEventKind::UnitSkipped { index, unit, reason } => debug!("[{run}] #{index} {unit} skipped: {reason:?}"),
        RunEventKind::RunEnded { index, unit, param } => {
            warn!("[{run}] #{index} {unit} ended the run: '{param}' missing")
        }
        RunEventKind::UnitFailed { index, unit, error } => warn!("[{run}] #{index} {unit} failed: {error}"),
        RunEventKind::RunCompleted { executed, ended_early } => {
            info!("[{run}] completed: {executed} executed, ended_early={ended_early}")
        }
    }
}

impl<S: EventStore> EventStore for LoggingEventStore<S> {
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent {
        let event = self.inner.append_kind(run_id, kind);
        log_event(&event);
        event
    }

    fn list(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.inner.list(run_id)
    }
}

/// Suscriptor de eventos de ejecución.
pub trait RunObserver: Send {
    fn on_event(&mut self, event: &RunEvent);
}

impl<F> RunObserver for F where F: FnMut(&RunEvent) + Send
{
    fn on_event(&mut self, event: &RunEvent) {
        self(event)
    }
}

/// Store que persiste en `inner` y luego notifica a cada observador, en el
/// orden en que se suscribieron. Los observadores reciben el evento ya
/// numerado por `inner`.
pub struct BroadcastStore<S: EventStore = InMemoryEventStore> {
    inner: S,
    observers: Vec<Box<dyn RunObserver>>,
}

impl<S: EventStore> BroadcastStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner,
               observers: Vec::new() }
    }

    pub fn subscribe(mut self, observer: impl RunObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: EventStore + Default> Default for BroadcastStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: EventStore + std::fmt::Debug> std::fmt::Debug for BroadcastStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastStore")
         .field("inner", &self.inner)
         .field("observers", &self.observers.len())
         .finish()
    }
}

impl<S: EventStore> EventStore for BroadcastStore<S> {
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent {
        let event = self.inner.append_kind(run_id, kind);
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
        event
    }

    fn list(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.inner.list(run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn logging_store_delegates_storage() {
        let mut store = LoggingEventStore::new(InMemoryEventStore::default());
        let run = Uuid::new_v4();
        store.append_kind(run, RunEventKind::RunCompleted { executed: 0, ended_early: false });
        assert_eq!(store.list(run).len(), 1);
        assert_eq!(store.inner().inner.len(), 1);
    }

    #[test]
    fn broadcast_notifies_every_observer_in_order() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let (a, b) = (Arc::clone(&seen), Arc::clone(&seen));
        let mut store = BroadcastStore::<InMemoryEventStore>::default().subscribe(move |e: &RunEvent| {
                                                                             a.lock().unwrap().push(format!("a{}", e.seq))
                                                                         })
                                                                         .subscribe(move |e: &RunEvent| {
                                                                             b.lock().unwrap().push(format!("b{}", e.seq))
                                                                         });
        let run = Uuid::new_v4();
        store.append_kind(run, RunEventKind::UnitStarted { index: 0, unit: "x".into() });
        store.append_kind(run, RunEventKind::RunCompleted { executed: 1, ended_early: false });
        assert_eq!(*seen.lock().unwrap(), vec!["a0", "b0", "a1", "b1"]);
        assert_eq!(store.observer_count(), 2);
    }
}
