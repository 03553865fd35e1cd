use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tipo en runtime que un parámetro acepta al enlazarse desde el bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValueKind {
    /// Acepta cualquier valor, incluido `null`.
    #[default]
    Any,
    Bool,
    /// Entero con signo o sin signo.
    Integer,
    /// Cualquier número (entero o flotante).
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueKind::Any => true,
            ValueKind::Bool => value.is_boolean(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
            ValueKind::Number => value.is_number(),
            ValueKind::String => value.is_string(),
            ValueKind::Array => value.is_array(),
            ValueKind::Object => value.is_object(),
        }
    }

    /// Valor por defecto natural del tipo.
    ///
    /// `Any` no tiene uno: `null` es un valor válido que un productor puede
    /// dejar en el bag, y enlazarlo implícitamente haría indistinguible
    /// "ausente" de "presente y nulo" para la unidad. Un opcional `Any` que
    /// falta omite la invocación (`SkipReason::NoDefault`), salvo que declare
    /// `with_default(Value::Null)`.
    pub fn zero(&self) -> Option<Value> {
        match self {
            ValueKind::Any => None,
            ValueKind::Bool => Some(Value::Bool(false)),
            ValueKind::Integer | ValueKind::Number => Some(Value::from(0)),
            ValueKind::String => Some(Value::String(String::new())),
            ValueKind::Array => Some(Value::Array(Vec::new())),
            ValueKind::Object => Some(Value::Object(serde_json::Map::new())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueKind::Any => "any",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

/// Descriptor de un parámetro declarado por una unidad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub kind: ValueKind,
    pub required: bool,
    /// Sólo aplica a requeridos: si falta, se registra un error y se marca
    /// el fin del run.
    pub end_on_missing: bool,
    pub end_message: Option<String>,
    /// Default explícito para parámetros opcionales; tiene prioridad sobre
    /// `ValueKind::zero`.
    pub default: Option<Value>,
}

impl ParamDescriptor {
    pub fn optional(name: impl Into<String>, kind: ValueKind) -> Self {
        Self { name: name.into(),
               kind,
               required: false,
               end_on_missing: false,
               end_message: None,
               default: None }
    }

    pub fn required(name: impl Into<String>, kind: ValueKind) -> Self {
        Self { required: true,
               ..Self::optional(name, kind) }
    }

    /// Requerido; su ausencia termina el run con `message` (o el texto por
    /// defecto del engine).
    pub fn end_on_missing(mut self, message: Option<&str>) -> Self {
        self.required = true;
        self.end_on_missing = true;
        self.end_message = message.map(str::to_string);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Default a enlazar cuando el parámetro opcional no se encuentra.
    pub fn fallback(&self) -> Option<Value> {
        self.default.clone().or_else(|| self.kind.zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_accept_matching_values() {
        assert!(ValueKind::Integer.accepts(&json!(3)));
        assert!(!ValueKind::Integer.accepts(&json!(3.5)));
        assert!(ValueKind::Number.accepts(&json!(3.5)));
        assert!(!ValueKind::String.accepts(&json!(1)));
        assert!(ValueKind::Any.accepts(&Value::Null));
    }

    #[test]
    fn fallback_prefers_explicit_default() {
        let p = ParamDescriptor::optional("limit", ValueKind::Integer).with_default(25);
        assert_eq!(p.fallback(), Some(json!(25)));
        assert_eq!(ParamDescriptor::optional("x", ValueKind::String).fallback(), Some(json!("")));
        assert_eq!(ParamDescriptor::optional("y", ValueKind::Any).fallback(), None);
    }
}
