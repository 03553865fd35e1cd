//! Errores de la capa de aplicación (configuración y pipelines).
pub mod core_error;

pub use core_error::CoreError;
