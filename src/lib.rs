//! UnitFlow Rust Library
//!
//! Este crate actúa como la capa de aplicación sobre `flow-core`:
//! - Expone `config` con la configuración global (`CONFIG`) cargada de env.
//! - Expone `errors` con `CoreError` para configuración, orden y ejecución.
//! - Expone `pipeline` para ejecutar varios objetos como una sola secuencia,
//!   y `cache` para reutilizar secuencias ya resueltas.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod cache;
pub mod config;
pub mod errors;
pub mod pipeline;

pub use cache::SequenceCache;
pub use config::{AppConfig, CONFIG};
pub use errors::CoreError;
pub use pipeline::{identity_is, Pipeline, PipelineBuilder};

pub use flow_adapters;
pub use flow_core;
