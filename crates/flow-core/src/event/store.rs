use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{RunEvent, RunEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent;
    /// Lista eventos de un run (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<RunEvent>;
}

/// Store en memoria. Conserva los eventos de cada run mientras viva; quien
/// reutilice un engine durante mucho tiempo debe drenarlo con `take_run` o
/// `clear`.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    pub inner: HashMap<Uuid, Vec<RunEvent>>,
}

impl InMemoryEventStore {
    pub fn runs(&self) -> impl Iterator<Item = &Uuid> {
        self.inner.keys()
    }

    /// Quita y devuelve los eventos de un run.
    pub fn take_run(&mut self, run_id: Uuid) -> Vec<RunEvent> {
        self.inner.remove(&run_id).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent {
        let events = self.inner.entry(run_id).or_default();
        let ev = RunEvent { seq: events.len() as u64,
                            run_id,
                            kind,
                            ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.inner.get(&run_id).cloned().unwrap_or_default()
    }
}

impl<S: EventStore + ?Sized> EventStore for Box<S> {
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent {
        (**self).append_kind(run_id, kind)
    }

    fn list(&self, run_id: Uuid) -> Vec<RunEvent> {
        (**self).list(run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_per_run_and_ascending() {
        let mut store = InMemoryEventStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.append_kind(a, RunEventKind::RunCompleted { executed: 0, ended_early: false });
        let second = store.append_kind(a, RunEventKind::RunCompleted { executed: 1, ended_early: false });
        let other = store.append_kind(b, RunEventKind::RunCompleted { executed: 0, ended_early: true });
        assert_eq!(second.seq, 1);
        assert_eq!(other.seq, 0);
        assert_eq!(store.list(a).len(), 2);
        assert!(store.list(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn runs_can_be_drained() {
        let mut store = InMemoryEventStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.append_kind(a, RunEventKind::RunCompleted { executed: 0, ended_early: false });
        store.append_kind(b, RunEventKind::RunCompleted { executed: 0, ended_early: false });
        assert_eq!(store.runs().count(), 2);

        assert_eq!(store.take_run(a).len(), 1);
        assert!(store.list(a).is_empty());
        assert_eq!(store.runs().collect::<Vec<_>>(), vec![&b]);

        store.clear();
        assert_eq!(store.runs().count(), 0);
        assert!(store.take_run(b).is_empty());
    }
}
