//! Errores específicos del core.
//!
//! Sólo las condiciones nombradas aquí se recuperan localmente; el resto
//! (fallos de una unidad, configuración inválida) se propaga al caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error opaco devuelto por una unidad al invocarse. El engine no lo captura:
/// lo envuelve en `ExecutionError::UnitFailed` y lo devuelve.
pub type UnitFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// El grafo de dependencias (after + smart order) de un objeto tiene un ciclo.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[error("dependency cycle detected in '{owner}' involving: {}", units.join(", "))]
pub struct OrderCycleError {
    pub owner: String,
    /// Nombres de las unidades implicadas, ordenados lexicográficamente.
    pub units: Vec<String>,
}

/// Lanzado únicamente por la familia "fail" de accesores del `Bag`.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[error("property '{key}' is missing or is not a {expected}")]
pub struct MissingOrWrongTypePropertyError {
    pub key: String,
    pub expected: String,
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum MessageError {
    #[error("message text must not be empty")] EmptyText,
}

#[derive(Debug, Error)]
pub enum BagError {
    #[error("record must serialize to an object, got {0}")] NotAnObject(&'static str),
    #[error("record serialization failed: {0}")] Serialize(#[from] serde_json::Error),
}

/// Errores que `ExecutionEngine::execute` devuelve al caller.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("unit '{unit}' failed: {source}")]
    UnitFailed {
        unit: String,
        #[source]
        source: UnitFailure,
    },
    #[error(transparent)] Property(#[from] MissingOrWrongTypePropertyError),
    #[error(transparent)] Message(#[from] MessageError),
}

impl ExecutionError {
    /// Nombre de la unidad que falló, si el error viene de una invocación.
    pub fn unit(&self) -> Option<&str> {
        match self {
            ExecutionError::UnitFailed { unit, .. } => Some(unit),
            _ => None,
        }
    }
}
