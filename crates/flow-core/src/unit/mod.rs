//! Definiciones relacionadas a unidades.
//!
//! Una unidad es un paso discreto e invocable de forma independiente,
//! declarado por un objeto plano. Este módulo define:
//! - `UnitDescriptor` / `ParamDescriptor`: metadata estática usada por el
//!   resolver y el engine.
//! - `Unit`: interfaz neutral que el engine invoca.
//! - `UnitObject`: el objeto declarante (`extractUnits`), y `UnitSet` como
//!   implementación por auto-registro de closures.
//! - `Invocation` / `BoundArgs`: lo que recibe una unidad al ejecutarse.

mod descriptor;
mod invocation;
mod object;
mod param;

pub use descriptor::{InvocationMode, UnitDescriptor, UnitOutput};
pub use invocation::{BoundArgs, Invocation};
pub use object::{AsAny, FnUnit, Unit, UnitObject, UnitResult, UnitSet};
pub use param::{ParamDescriptor, ValueKind};
