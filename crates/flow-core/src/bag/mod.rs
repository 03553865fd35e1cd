//! `Bag`: almacén compartido y mutable que atraviesa una ejecución.
//!
//! Rol en el flujo:
//! - El engine enlaza los parámetros de cada unidad leyendo entradas del bag
//!   y escribe la salida de la unidad de vuelta en él.
//! - Las claves son case-insensitive para la búsqueda, pero conservan la
//!   grafía de su primera inserción. La enumeración respeta el orden de
//!   inserción; sobrescribir una clave existente no la mueve.
//! - Los valores son `serde_json::Value` neutros; los accesores tipados
//!   deserializan bajo demanda y tratan un fallo de deserialización igual que
//!   una ausencia.
//!
//! Las claves reservadas (`constants::RESERVED_KEYS`) son entradas normales
//! del mapa; los helpers (`abort`, `info`, `set_result`, ...) sólo envuelven
//! `set` y el append al log de mensajes.

mod message;

pub use message::{Message, MessageKind};

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::constants::{END_KEY, MESSAGES_KEY, RESERVED_KEYS, RESULT_KEY, SERVICE_PROVIDER_KEY, THROW_ON_MISSING_KEY};
use crate::errors::{BagError, MessageError, MissingOrWrongTypePropertyError};

/// Política de escritura para `apply` y `transform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modificator {
    /// Nunca sobrescribe un valor existente.
    #[default]
    SkipIfExists,
    /// Siempre sobrescribe.
    UpdateValue,
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bag {
    entries: IndexMap<String, Entry>,
}

fn fold(key: &str) -> String {
    key.to_lowercase()
}

fn type_label<T>() -> String {
    std::any::type_name::<T>().to_string()
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construye un bag copiando un mapa plano. Si dos claves colisionan sin
    /// distinguir mayúsculas gana la primera (skip-if-exists por entrada).
    pub fn from_map<I, K, V>(entries: I) -> Self
        where I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<Value>
    {
        let mut bag = Self::new();
        for (k, v) in entries {
            bag.set_with(k, v, true);
        }
        bag
    }

    /// Construye un bag a partir de un registro serializable: cada campo
    /// público pasa a ser una entrada, con la misma regla que `from_map`.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, BagError> {
        match serde_json::to_value(record)? {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Err(BagError::NotAnObject("null")),
            Value::Bool(_) => Err(BagError::NotAnObject("bool")),
            Value::Number(_) => Err(BagError::NotAnObject("number")),
            Value::String(_) => Err(BagError::NotAnObject("string")),
            Value::Array(_) => Err(BagError::NotAnObject("array")),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&fold(key))
    }

    /// Valor crudo almacenado bajo `key` (case-insensitive).
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(&fold(key)).map(|e| &e.value)
    }

    /// Grafía original con la que se insertó `key`.
    pub fn stored_key(&self, key: &str) -> Option<&str> {
        self.entries.get(&fold(key)).map(|e| e.key.as_str())
    }

    /// Enumeración en orden de inserción con la grafía original.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.values().map(|e| (e.key.as_str(), &e.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.key.as_str())
    }

    /// Como `keys`, sin las claves reservadas del motor.
    pub fn user_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(folded, _)| !RESERVED_KEYS.iter().any(|r| fold(r) == **folded))
            .map(|(_, e)| e.key.as_str())
    }

    /// Lookup tipado: `None` si falta o si el valor no deserializa como `T`.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.value(key).and_then(|v| T::deserialize(v).ok())
    }

    /// Como `try_get`, devolviendo `default` ante ausencia o tipo incorrecto.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.try_get(key).unwrap_or(default)
    }

    pub fn get_or_fail<T: DeserializeOwned>(&self, key: &str) -> Result<T, MissingOrWrongTypePropertyError> {
        self.try_get(key).ok_or_else(|| MissingOrWrongTypePropertyError { key: key.to_string(),
                                                                           expected: type_label::<T>() })
    }

    /// Inserta o sobrescribe. Una clave existente conserva su posición y su
    /// grafía original.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.set_with(key, value, false);
    }

    /// `set` con `skip_if_exists`: si es true y la clave existe, no hace nada.
    pub fn set_with(&mut self, key: impl Into<String>, value: impl Into<Value>, skip_if_exists: bool) {
        let key = key.into();
        let folded = fold(&key);
        match self.entries.get_mut(&folded) {
            Some(_) if skip_if_exists => {}
            Some(entry) => entry.value = value.into(),
            None => {
                self.entries.insert(folded, Entry { key, value: value.into() });
            }
        }
    }

    /// Serializa `value` y lo guarda bajo `key`.
    pub fn set_serialized<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<(), BagError> {
        let v = serde_json::to_value(value)?;
        self.set(key, v);
        Ok(())
    }

    pub fn apply(&mut self, key: impl Into<String>, value: impl Into<Value>, modificator: Modificator) {
        self.set_with(key, value, modificator == Modificator::SkipIfExists);
    }

    /// Forma factory de `apply`: la factory se evalúa contra el bag actual,
    /// también al sobrescribir. Con `SkipIfExists` y la clave presente la
    /// factory no se ejecuta.
    pub fn apply_with<F>(&mut self, key: impl Into<String>, factory: F, modificator: Modificator)
        where F: FnOnce(&Bag) -> Value
    {
        let key = key.into();
        if modificator == Modificator::SkipIfExists && self.contains(&key) {
            return;
        }
        let value = factory(self);
        self.set(key, value);
    }

    /// Lee `from` y escribe `f(bag, valor)` en `to` con la semántica de
    /// `apply`. No hace nada si `from` no existe, ni si `to` ya existe con
    /// `SkipIfExists`.
    pub fn transform<F>(&mut self, from: &str, to: impl Into<String>, f: F, modificator: Modificator)
        where F: FnOnce(&Bag, &Value) -> Value
    {
        let to = to.into();
        if modificator == Modificator::SkipIfExists && self.contains(&to) {
            return;
        }
        let Some(current) = self.value(from) else {
            return;
        };
        let next = f(self, current);
        self.set(to, next);
    }

    /// Elimina `key` si existe y devuelve su valor. El resto de entradas
    /// conserva su orden relativo.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(&fold(key)).map(|e| e.value)
    }

    // ---------------------------------------------------------------
    // Claves reservadas
    // ---------------------------------------------------------------

    /// Marca el fin: el engine no invocará más unidades sobre este bag.
    pub fn abort(&mut self) {
        self.set(END_KEY, true);
    }

    pub fn is_ended(&self) -> bool {
        self.get(END_KEY, false)
    }

    pub fn set_throw_on_missing(&mut self, enabled: bool) {
        self.set(THROW_ON_MISSING_KEY, enabled);
    }

    pub fn throw_on_missing(&self) -> bool {
        self.get(THROW_ON_MISSING_KEY, false)
    }

    pub fn set_service_provider(&mut self, handle: impl Into<Value>) {
        self.set(SERVICE_PROVIDER_KEY, handle);
    }

    pub fn service_provider(&self) -> Option<&Value> {
        self.value(SERVICE_PROVIDER_KEY)
    }

    /// Mensajes en orden de append. Un log corrupto se lee como vacío.
    pub fn messages(&self) -> Vec<Message> {
        self.get(MESSAGES_KEY, Vec::new())
    }

    pub fn messages_of(&self, kind: MessageKind) -> Vec<Message> {
        self.messages().into_iter().filter(|m| m.kind() == kind).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.messages().iter().any(|m| m.kind() == MessageKind::Error)
    }

    pub fn push_message(&mut self, message: Message) {
        let mut log = self.messages();
        log.push(message);
        let encoded: Vec<Value> = log.into_iter()
                                     .map(|m| serde_json::json!({ "text": m.text(), "kind": m.kind() }))
                                     .collect();
        self.set(MESSAGES_KEY, Value::Array(encoded));
    }

    pub fn info(&mut self, text: impl Into<String>) -> Result<(), MessageError> {
        self.push_message(Message::info(text)?);
        Ok(())
    }

    pub fn warning(&mut self, text: impl Into<String>) -> Result<(), MessageError> {
        self.push_message(Message::warning(text)?);
        Ok(())
    }

    pub fn error(&mut self, text: impl Into<String>) -> Result<(), MessageError> {
        self.push_message(Message::error(text)?);
        Ok(())
    }

    pub fn set_result(&mut self, value: impl Into<Value>) {
        self.set(RESULT_KEY, value);
    }

    pub fn result<T: DeserializeOwned>(&self) -> Option<T> {
        self.try_get(RESULT_KEY)
    }

    pub fn info_result(&mut self, text: impl Into<String>, value: impl Into<Value>) -> Result<(), MessageError> {
        self.info(text)?;
        self.set_result(value);
        Ok(())
    }

    pub fn warning_result(&mut self, text: impl Into<String>, value: impl Into<Value>) -> Result<(), MessageError> {
        self.warning(text)?;
        self.set_result(value);
        Ok(())
    }

    /// Registra un error, fija el resultado y marca el fin del run.
    pub fn error_result(&mut self, text: impl Into<String>, value: impl Into<Value>) -> Result<(), MessageError> {
        self.error(text)?;
        self.set_result(value);
        self.abort();
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookups_ignore_case_but_keep_first_casing() {
        let mut bag = Bag::new();
        bag.set("UserName", "ana");
        bag.set("username", "bea");
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.stored_key("USERNAME"), Some("UserName"));
        assert_eq!(bag.try_get::<String>("userNAME").as_deref(), Some("bea"));
    }

    #[test]
    fn overwrite_keeps_position_and_delete_keeps_order() {
        let mut bag = Bag::new();
        bag.set("a", 1);
        bag.set("b", 2);
        bag.set("c", 3);
        bag.set("A", 10);
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(bag.delete("B"), Some(json!(2)));
        assert_eq!(bag.delete("missing"), None);
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(bag.get("a", 0), 10);
    }

    #[test]
    fn user_keys_hide_reserved_entries() {
        let mut bag = Bag::new();
        bag.set("input", "x");
        bag.abort();
        bag.info("loaded").unwrap();
        bag.set_result(1);
        bag.set("output", 2);
        assert_eq!(bag.keys().count(), 5);
        assert_eq!(bag.user_keys().collect::<Vec<_>>(), vec!["input", "output"]);
    }

    #[test]
    fn set_serialized_stores_json_form() {
        #[derive(Serialize)]
        struct Limits {
            min: u8,
            max: u8,
        }
        let mut bag = Bag::new();
        bag.set_serialized("limits", &Limits { min: 1, max: 9 }).unwrap();
        assert_eq!(bag.value("LIMITS"), Some(&json!({"min": 1, "max": 9})));
    }

    #[test]
    fn get_degrades_to_default_on_wrong_type() {
        let mut bag = Bag::new();
        bag.set("count", "not a number");
        assert_eq!(bag.get("count", 7i64), 7);
        assert_eq!(bag.get("absent", 3i64), 3);
        let err = bag.get_or_fail::<i64>("count").unwrap_err();
        assert_eq!(err.key, "count");
        assert!(err.expected.contains("i64"));
    }

    #[test]
    fn set_with_skip_if_exists_is_noop_when_present() {
        let mut bag = Bag::new();
        bag.set("k", 1);
        bag.set_with("K", 2, true);
        assert_eq!(bag.get("k", 0), 1);
        bag.set_with("other", 5, true);
        assert_eq!(bag.get("other", 0), 5);
    }

    #[test]
    fn apply_respects_modificator() {
        let mut bag = Bag::new();
        bag.apply("key", "v1", Modificator::SkipIfExists);
        bag.apply("key", "v2", Modificator::SkipIfExists);
        assert_eq!(bag.try_get::<String>("key").as_deref(), Some("v1"));

        let mut bag = Bag::new();
        bag.apply("key", "v1", Modificator::UpdateValue);
        bag.apply("key", "v2", Modificator::UpdateValue);
        assert_eq!(bag.try_get::<String>("key").as_deref(), Some("v2"));
    }

    #[test]
    fn apply_with_evaluates_factory_against_current_bag() {
        let mut bag = Bag::new();
        bag.set("base", 4);
        bag.set("total", 1);
        bag.apply_with("total", |b| json!(b.get("base", 0) * 10), Modificator::UpdateValue);
        assert_eq!(bag.get("total", 0), 40);

        let mut called = false;
        bag.apply_with("total", |_| {
                           called = true;
                           json!(0)
                       },
                       Modificator::SkipIfExists);
        assert!(!called);
        assert_eq!(bag.get("total", 0), 40);
    }

    #[test]
    fn transform_reads_source_and_honours_skip() {
        let mut bag = Bag::new();
        bag.transform("missing", "out", |_, v| v.clone(), Modificator::UpdateValue);
        assert!(!bag.contains("out"));

        bag.set("n", 2);
        bag.transform("n", "double", |_, v| json!(v.as_i64().unwrap_or(0) * 2), Modificator::SkipIfExists);
        assert_eq!(bag.get("double", 0), 4);

        bag.set("n", 5);
        bag.transform("n", "double", |_, v| json!(v.as_i64().unwrap_or(0) * 2), Modificator::SkipIfExists);
        assert_eq!(bag.get("double", 0), 4);
        bag.transform("n", "double", |_, v| json!(v.as_i64().unwrap_or(0) * 2), Modificator::UpdateValue);
        assert_eq!(bag.get("double", 0), 10);
    }

    #[test]
    fn from_map_enumerates_equivalent_mapping() {
        let bag = Bag::from_map([("1", "x"), ("2", "y")]);
        let pairs: Vec<(String, Value)> = bag.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        assert_eq!(pairs, vec![("1".to_string(), json!("x")), ("2".to_string(), json!("y"))]);
    }

    #[test]
    fn from_map_first_colliding_key_wins() {
        let bag = Bag::from_map([("Key", 1), ("KEY", 2)]);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.stored_key("key"), Some("Key"));
        assert_eq!(bag.get("key", 0), 1);
    }

    #[test]
    fn from_record_copies_public_fields() {
        #[derive(serde::Serialize)]
        struct Order {
            id: u32,
            customer: String,
        }
        let bag = Bag::from_record(&Order { id: 9,
                                            customer: "ACME".into() }).expect("record");
        assert_eq!(bag.get("ID", 0u32), 9);
        assert_eq!(bag.try_get::<String>("customer").as_deref(), Some("ACME"));
        assert!(matches!(Bag::from_record(&42), Err(BagError::NotAnObject("number"))));
    }

    #[test]
    fn messages_and_result_helpers() {
        let mut bag = Bag::new();
        bag.info("loaded").unwrap();
        bag.warning("slow").unwrap();
        assert!(bag.error("").is_err());
        assert!(!bag.has_errors());
        bag.error_result("broken", json!({"code": 3})).unwrap();

        let all = bag.messages();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].text(), "loaded");
        assert_eq!(bag.messages_of(MessageKind::Warning).len(), 1);
        assert!(bag.has_errors());
        assert!(bag.is_ended());
        assert_eq!(bag.result::<Value>(), Some(json!({"code": 3})));

        bag.info_result("done", 1).unwrap();
        assert_eq!(bag.result::<i32>(), Some(1));
    }
}
