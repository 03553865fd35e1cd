//! Tipos de evento de una ejecución y estructura `RunEvent`.
//!
//! Rol en el flujo:
//! - Cada `execute` del engine emite eventos a un `EventStore` append-only.
//! - Los stores son el punto de suscripción (pub/sub) para observadores
//!   externos; el engine no depende de quién escuche.
//! - El enum `RunEventKind` define el contrato observable del motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Motivo por el cual una unidad no se invocó.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// El bag ya tenía el flag de fin activo.
    Ended,
    /// Falta un parámetro requerido sin `end_on_missing`.
    MissingRequired { param: String },
    /// Falta un parámetro opcional y no hay default representable.
    NoDefault { param: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija el fingerprint de la secuencia.
    RunStarted { sequence_fingerprint: String, unit_count: usize },
    /// Una unidad fue invocada. No implica éxito.
    UnitStarted { index: usize, unit: String },
    /// La unidad retornó; `output` es la clave escrita en el bag, si hubo.
    UnitFinished { index: usize, unit: String, output: Option<String> },
    UnitSkipped { index: usize, unit: String, reason: SkipReason },
    /// Un requerido con `end_on_missing` faltó: se activó el flag de fin.
    RunEnded { index: usize, unit: String, param: String },
    /// La unidad falló; el error se propagó al caller.
    UnitFailed { index: usize, unit: String, error: String },
    /// Cierre: unidades invocadas y si el run terminó antes de tiempo.
    RunCompleted { executed: usize, ended_early: bool },
}

impl RunEventKind {
    /// Letra compacta usada por `event_variants`.
    pub fn letter(&self) -> &'static str {
        match self {
            RunEventKind::RunStarted { .. } => "I",
            RunEventKind::UnitStarted { .. } => "S",
            RunEventKind::UnitFinished { .. } => "F",
            RunEventKind::UnitSkipped { .. } => "K",
            RunEventKind::RunEnded { .. } => "E",
            RunEventKind::UnitFailed { .. } => "X",
            RunEventKind::RunCompleted { .. } => "C",
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            RunEventKind::UnitStarted { unit, .. }
            | RunEventKind::UnitFinished { unit, .. }
            | RunEventKind::UnitSkipped { unit, .. }
            | RunEventKind::RunEnded { unit, .. }
            | RunEventKind::UnitFailed { unit, .. } => Some(unit.as_str()),
            RunEventKind::RunStarted { .. } | RunEventKind::RunCompleted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por el store (orden de append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}

impl RunEvent {
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
