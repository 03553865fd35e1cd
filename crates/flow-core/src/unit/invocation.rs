use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bag::Bag;
use crate::errors::MissingOrWrongTypePropertyError;

/// Argumentos enlazados por el engine, en el orden declarado por la unidad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: IndexMap<String, Value>,
}

impl BoundArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.value(name).and_then(|v| T::deserialize(v).ok())
    }

    pub fn require<T: DeserializeOwned>(&self, name: &str) -> Result<T, MissingOrWrongTypePropertyError> {
        self.get(name).ok_or_else(|| MissingOrWrongTypePropertyError { key: name.to_string(),
                                                                        expected: std::any::type_name::<T>().to_string() })
    }
}

/// Contexto entregado a `Unit::invoke`.
///
/// En modo `PerParameter` `args` trae los parámetros enlazados; en modo
/// `AggregateBag` está vacío y la unidad lee directamente de `bag`. En ambos
/// casos la unidad puede mutar el bag: el engine no enlaza la siguiente
/// unidad hasta que ésta retorna.
pub struct Invocation<'a> {
    pub args: BoundArgs,
    pub bag: &'a mut Bag,
}

impl<'a> Invocation<'a> {
    pub fn new(args: BoundArgs, bag: &'a mut Bag) -> Self {
        Self { args, bag }
    }

    /// Atajo: argumento enlazado `name` deserializado como `T`.
    pub fn arg<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.args.get(name)
    }

    pub fn require<T: DeserializeOwned>(&self, name: &str) -> Result<T, MissingOrWrongTypePropertyError> {
        self.args.require(name)
    }
}
