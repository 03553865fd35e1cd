//! flow-adapters: colaboradores alrededor del core.
//!
//! Este crate provee:
//! - Providers de descubrimiento (`ObjectProvider`): entregan objetos sin
//!   ordenar al pipeline.
//! - Stores de eventos observadores: `LoggingEventStore` (facade `log`) y
//!   `BroadcastStore` (fan-out a `RunObserver`s).
//! - Objetos de demostración (`PropertyCalculator`, `TextNormalizer`) usados
//!   por el binario demo y los tests de integración.
//!
//! Nota: el core no depende de nada de aquí; todo se conecta por los traits
//! `UnitObject` y `EventStore`.

pub mod discovery;
pub mod objects;
pub mod observers;

pub use discovery::{FilteredProvider, ObjectProvider, StaticProvider};
pub use objects::{NormalizerParams, PropertyCalculator, TextNormalizer};
pub use observers::{BroadcastStore, LoggingEventStore, RunObserver};
