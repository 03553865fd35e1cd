//! Execution Engine: ejecuta una `UnitSequence` contra un `Bag`.
//!
//! Provee el engine, su builder y el enlace de parámetros por unidad.

mod binding;
pub mod builder;
pub mod core;

pub use builder::EngineBuilder;
pub use self::core::{EngineOptions, ExecutionEngine, RunSummary};

pub use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind, SkipReason};
