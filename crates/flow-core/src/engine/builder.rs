//! Builder para `ExecutionEngine`.
//!
//! ```ignore
//! let mut engine = ExecutionEngine::builder().throw_on_missing(true).build();
//! let logged = ExecutionEngine::builder().event_store(LoggingEventStore::new(inner)).build();
//! ```

use crate::engine::{EngineOptions, ExecutionEngine};
use crate::event::EventStore;

#[derive(Debug)]
pub struct EngineBuilder<E: EventStore> {
    event_store: E,
    options: EngineOptions,
}

impl<E: EventStore> EngineBuilder<E> {
    pub fn new(event_store: E) -> Self {
        Self { event_store,
               options: EngineOptions::default() }
    }

    /// Reemplaza el store de eventos conservando las opciones acumuladas.
    pub fn event_store<S: EventStore>(self, event_store: S) -> EngineBuilder<S> {
        EngineBuilder { event_store,
                        options: self.options }
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn throw_on_missing(mut self, enabled: bool) -> Self {
        self.options.throw_on_missing = enabled;
        self
    }

    pub fn build(self) -> ExecutionEngine<E> {
        ExecutionEngine::with_store(self.event_store).with_options(self.options)
    }
}
