use serde::{Deserialize, Serialize};

use super::param::{ParamDescriptor, ValueKind};

/// Forma en que el engine invoca una unidad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InvocationMode {
    /// Cada parámetro declarado se enlaza desde el bag por nombre y tipo.
    #[default]
    PerParameter,
    /// La unidad recibe el bag completo y valida sus propias entradas.
    AggregateBag,
}

/// Salida declarada de una unidad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnitOutput {
    /// La unidad no produce valor (void).
    #[default]
    None,
    /// El retorno se guarda en el bag bajo `name`, o bajo el nombre de la
    /// unidad si `name` es `None`.
    Value { name: Option<String> },
}

/// Metadata estática de una unidad. Inmutable una vez construida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub name: String,
    /// Identidad del objeto que declara la unidad.
    pub owner: String,
    pub params: Vec<ParamDescriptor>,
    pub output: UnitOutput,
    pub explicit_order: Option<i32>,
    pub after: Option<String>,
    pub mode: InvocationMode,
    /// Todos los parámetros se tratan como requeridos.
    pub strict: bool,
    /// Excluida antes de resolver el orden; nunca se ejecuta.
    pub skipped: bool,
}

impl UnitDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               owner: String::new(),
               params: Vec::new(),
               output: UnitOutput::None,
               explicit_order: None,
               after: None,
               mode: InvocationMode::PerParameter,
               strict: false,
               skipped: false }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn required(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.param(ParamDescriptor::required(name, kind))
    }

    pub fn optional(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.param(ParamDescriptor::optional(name, kind))
    }

    /// La salida se guarda bajo el nombre de la unidad.
    pub fn returns(mut self) -> Self {
        self.output = UnitOutput::Value { name: None };
        self
    }

    pub fn produces(mut self, output: impl Into<String>) -> Self {
        self.output = UnitOutput::Value { name: Some(output.into()) };
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.explicit_order = Some(order);
        self
    }

    pub fn after(mut self, target: impl Into<String>) -> Self {
        self.after = Some(target.into());
        self
    }

    pub fn claims_all(mut self) -> Self {
        self.mode = InvocationMode::AggregateBag;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn skip(mut self) -> Self {
        self.skipped = true;
        self
    }

    /// Clave del bag donde se escribe la salida, si la unidad produce una.
    pub fn output_key(&self) -> Option<&str> {
        match &self.output {
            UnitOutput::None => None,
            UnitOutput::Value { name: Some(n) } => Some(n.as_str()),
            UnitOutput::Value { name: None } => Some(self.name.as_str()),
        }
    }

    pub fn rank(&self) -> i32 {
        self.explicit_order.unwrap_or(0)
    }

    pub fn consumes(&self, key: &str) -> bool {
        self.params.iter().any(|p| p.name == key)
    }

    pub fn is_required(&self, param: &ParamDescriptor) -> bool {
        self.strict || param.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_key_defaults_to_unit_name() {
        assert_eq!(UnitDescriptor::new("Total").returns().output_key(), Some("Total"));
        assert_eq!(UnitDescriptor::new("Load").produces("rows").output_key(), Some("rows"));
        assert_eq!(UnitDescriptor::new("Log").output_key(), None);
    }

    #[test]
    fn strict_units_require_every_param() {
        let d = UnitDescriptor::new("u").optional("a", ValueKind::Any).strict();
        assert!(d.is_required(&d.params[0]));
        assert_eq!(d.rank(), 0);
        assert_eq!(d.clone().order(-3).rank(), -3);
    }
}
