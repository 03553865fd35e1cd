use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::descriptor::UnitDescriptor;
use super::invocation::Invocation;
use crate::errors::UnitFailure;

/// Resultado de invocar una unidad: `Ok(None)` para unidades void.
pub type UnitResult = Result<Option<Value>, UnitFailure>;

/// Paso ejecutable: descriptor estático + cierre sobre su objeto declarante.
pub trait Unit: Send + Sync {
    fn descriptor(&self) -> &UnitDescriptor;

    fn invoke(&self, call: Invocation<'_>) -> UnitResult;

    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

impl fmt::Debug for dyn Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit").field("descriptor", self.descriptor()).finish()
    }
}

type UnitFn = dyn Fn(Invocation<'_>) -> UnitResult + Send + Sync;

/// Unidad respaldada por un closure. Es la forma habitual de auto-registro.
#[derive(Clone)]
pub struct FnUnit {
    descriptor: UnitDescriptor,
    body: Arc<UnitFn>,
}

impl FnUnit {
    pub fn new<F>(descriptor: UnitDescriptor, body: F) -> Self
        where F: Fn(Invocation<'_>) -> UnitResult + Send + Sync + 'static
    {
        Self { descriptor,
               body: Arc::new(body) }
    }
}

impl fmt::Debug for FnUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnUnit").field("descriptor", &self.descriptor).finish()
    }
}

impl Unit for FnUnit {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    fn invoke(&self, call: Invocation<'_>) -> UnitResult {
        (self.body)(call)
    }
}

/// Acceso a `Any` para comparar por tipo concreto detrás de un trait object.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Objeto plano que declara unidades (`extractUnits`).
///
/// Las implementaciones devuelven sus unidades sin orden; el resolver se
/// encarga de ordenarlas. Cada descriptor devuelto debe llevar `owner ==
/// identity()`.
pub trait UnitObject: AsAny + Send + Sync {
    fn identity(&self) -> &str;

    fn units(&self) -> Vec<Arc<dyn Unit>>;
}

/// `UnitObject` genérico armado por auto-registro de closures.
///
/// ```ignore
/// let calc = UnitSet::new("Calc")
///     .unit(UnitDescriptor::new("GetProperty").produces("property"), |_| Ok(Some(json!(1))))
///     .unit(UnitDescriptor::new("UseProperty").required("property", ValueKind::Integer), |_| Ok(None));
/// ```
#[derive(Debug, Clone)]
pub struct UnitSet {
    identity: String,
    units: Vec<FnUnit>,
}

impl UnitSet {
    pub fn new(identity: impl Into<String>) -> Self {
        Self { identity: identity.into(),
               units: Vec::new() }
    }

    /// Registra una unidad. El `owner` del descriptor se fija a la identidad
    /// del set.
    pub fn unit<F>(mut self, descriptor: UnitDescriptor, body: F) -> Self
        where F: Fn(Invocation<'_>) -> UnitResult + Send + Sync + 'static
    {
        let descriptor = descriptor.owner(self.identity.clone());
        self.units.push(FnUnit::new(descriptor, body));
        self
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl UnitObject for UnitSet {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn units(&self) -> Vec<Arc<dyn Unit>> {
        self.units.iter().map(|u| Arc::new(u.clone()) as Arc<dyn Unit>).collect()
    }
}
