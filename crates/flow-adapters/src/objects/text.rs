//! TextNormalizer (objeto de demostración)
//!
//! - `Load` exige `input`; si falta termina el run con un mensaje de error.
//! - `Trim` y `Case` encadenan por datos (`text` → `trimmed` → `normalized`).
//! - `Report` se ejecuta después de `Case` y lee el bag completo.

use std::sync::Arc;

use flow_core::{FnUnit, ParamDescriptor, Unit, UnitDescriptor, UnitObject, ValueKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizerParams {
    /// Pasa el texto a mayúsculas en vez de minúsculas.
    pub uppercase: bool,
    /// Longitud máxima aceptada; por encima se emite un warning.
    pub max_len: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    params: NormalizerParams,
}

impl TextNormalizer {
    pub const IDENTITY: &'static str = "TextNormalizer";

    pub fn new(params: NormalizerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NormalizerParams {
        &self.params
    }
}

impl UnitObject for TextNormalizer {
    fn identity(&self) -> &str {
        Self::IDENTITY
    }

    fn units(&self) -> Vec<Arc<dyn Unit>> {
        let uppercase = self.params.uppercase;
        let max_len = self.params.max_len;

        let load = FnUnit::new(UnitDescriptor::new("Load").owner(Self::IDENTITY)
                                                          .param(ParamDescriptor::required("input", ValueKind::String).end_on_missing(Some("no input text was provided")))
                                                          .produces("text"),
                               |call| Ok(call.args.value("input").cloned()));

        let trim = FnUnit::new(UnitDescriptor::new("Trim").owner(Self::IDENTITY)
                                                          .required("text", ValueKind::String)
                                                          .produces("trimmed"),
                               move |call| {
                                   let text: String = call.require("text")?;
                                   let trimmed = text.trim().to_string();
                                   if let Some(max) = max_len.filter(|&max| trimmed.chars().count() > max) {
                                       call.bag.warning(format!("text longer than {max} chars"))?;
                                   }
                                   Ok(Some(json!(trimmed)))
                               });

        let case = FnUnit::new(UnitDescriptor::new("Case").owner(Self::IDENTITY)
                                                          .required("trimmed", ValueKind::String)
                                                          .produces("normalized"),
                               move |call| {
                                   let text: String = call.require("trimmed")?;
                                   let out = if uppercase { text.to_uppercase() } else { text.to_lowercase() };
                                   Ok(Some(json!(out)))
                               });

        let report = FnUnit::new(UnitDescriptor::new("Report").owner(Self::IDENTITY).after("Case").claims_all(),
                                 |call| {
                                     let normalized = call.bag.get("normalized", String::new());
                                     call.bag.info_result(format!("normalized {} chars", normalized.chars().count()), normalized)?;
                                     Ok(None)
                                 });

        vec![Arc::new(report), Arc::new(case), Arc::new(trim), Arc::new(load)]
    }
}
