//! Enlace de parámetros `PerParameter` desde el bag.

use crate::bag::Bag;
use crate::errors::MissingOrWrongTypePropertyError;
use crate::event::SkipReason;
use crate::unit::{BoundArgs, UnitDescriptor};

/// Resultado de enlazar los parámetros de una unidad.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Binding {
    Ready(BoundArgs),
    Skip(SkipReason),
    /// Falta un requerido con `end_on_missing`.
    End { param: String, message: String },
}

pub(crate) fn default_end_message(unit: &str, param: &str) -> String {
    format!("required parameter '{param}' of unit '{unit}' is missing")
}

/// Recorre los parámetros en orden declarado. Un valor presente pero de tipo
/// incompatible cuenta como ausente.
///
/// Con `throw_on_missing` un requerido ausente es un error en vez de la
/// condición blanda (skip o fin).
pub(crate) fn bind(descriptor: &UnitDescriptor, bag: &Bag, throw_on_missing: bool) -> Result<Binding, MissingOrWrongTypePropertyError> {
    let mut args = BoundArgs::new();
    for param in &descriptor.params {
        if let Some(value) = bag.value(&param.name).filter(|v| param.kind.accepts(v)) {
            args.bind(&param.name, value.clone());
            continue;
        }

        if !descriptor.is_required(param) {
            match param.fallback() {
                Some(default) => {
                    args.bind(&param.name, default);
                    continue;
                }
                None => return Ok(Binding::Skip(SkipReason::NoDefault { param: param.name.clone() })),
            }
        }

        if throw_on_missing {
            return Err(MissingOrWrongTypePropertyError { key: param.name.clone(),
                                                         expected: param.kind.label().to_string() });
        }
        if param.end_on_missing {
            let message = param.end_message
                               .as_deref()
                               .filter(|m| !m.trim().is_empty())
                               .map(str::to_string)
                               .unwrap_or_else(|| default_end_message(&descriptor.name, &param.name));
            return Ok(Binding::End { param: param.name.clone(),
                                     message });
        }
        return Ok(Binding::Skip(SkipReason::MissingRequired { param: param.name.clone() }));
    }
    Ok(Binding::Ready(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{ParamDescriptor, ValueKind};
    use serde_json::{json, Value};

    #[test]
    fn binds_case_insensitively_in_declared_order() {
        let mut bag = Bag::new();
        bag.set("Second", "b");
        bag.set("FIRST", 1);
        let d = UnitDescriptor::new("u").required("first", ValueKind::Integer)
                                        .required("second", ValueKind::String);
        let Binding::Ready(args) = bind(&d, &bag, false).expect("bind") else {
            panic!("expected ready binding");
        };
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(args.get::<i64>("first"), Some(1));
    }

    #[test]
    fn optional_params_fall_back_or_skip() {
        let bag = Bag::new();
        let d = UnitDescriptor::new("u").param(ParamDescriptor::optional("limit", ValueKind::Integer).with_default(10));
        assert_eq!(bind(&d, &bag, false).expect("bind"),
                   Binding::Ready({
                       let mut a = BoundArgs::new();
                       a.bind("limit", json!(10));
                       a
                   }));

        let d = UnitDescriptor::new("u").optional("anything", ValueKind::Any);
        assert_eq!(bind(&d, &bag, false).expect("bind"),
                   Binding::Skip(SkipReason::NoDefault { param: "anything".into() }));
    }

    #[test]
    fn incompatible_optional_binds_fallback_and_keeps_bag_value() {
        let mut bag = Bag::new();
        bag.set("size", "ten");
        bag.set("limit", "many");
        let d = UnitDescriptor::new("u").optional("size", ValueKind::Integer)
                                        .param(ParamDescriptor::optional("limit", ValueKind::Integer).with_default(5));
        let Binding::Ready(args) = bind(&d, &bag, false).expect("bind") else {
            panic!("expected ready binding");
        };
        assert_eq!(args.get::<i64>("size"), Some(0));
        assert_eq!(args.get::<i64>("limit"), Some(5));
        assert_eq!(bag.value("size"), Some(&json!("ten")));
        assert_eq!(bag.value("limit"), Some(&json!("many")));
    }

    #[test]
    fn optional_any_binds_null_only_when_declared() {
        let bag = Bag::new();
        let d = UnitDescriptor::new("u").param(ParamDescriptor::optional("anything", ValueKind::Any).with_default(Value::Null));
        let Binding::Ready(args) = bind(&d, &bag, false).expect("bind") else {
            panic!("expected ready binding");
        };
        assert_eq!(args.value("anything"), Some(&Value::Null));
    }

    #[test]
    fn wrong_type_counts_as_missing() {
        let mut bag = Bag::new();
        bag.set("count", "three");
        let d = UnitDescriptor::new("u").required("count", ValueKind::Integer);
        assert_eq!(bind(&d, &bag, false).expect("bind"),
                   Binding::Skip(SkipReason::MissingRequired { param: "count".into() }));
        let err = bind(&d, &bag, true).unwrap_err();
        assert_eq!(err.key, "count");
        assert_eq!(err.expected, "integer");
    }

    #[test]
    fn end_on_missing_uses_custom_or_default_message() {
        let bag = Bag::new();
        let d = UnitDescriptor::new("Load").param(ParamDescriptor::required("path", ValueKind::String).end_on_missing(Some("no path")));
        assert_eq!(bind(&d, &bag, false).expect("bind"),
                   Binding::End { param: "path".into(),
                                  message: "no path".into() });

        let d = UnitDescriptor::new("Load").param(ParamDescriptor::required("path", ValueKind::String).end_on_missing(None));
        assert_eq!(bind(&d, &bag, false).expect("bind"),
                   Binding::End { param: "path".into(),
                                  message: default_end_message("Load", "path") });
    }
}
