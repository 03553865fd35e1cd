//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`). Quien prefiera no depender del global puede llamar a
//! `AppConfig::from_env` o `AppConfig::from_lookup` directamente.
//!
//! Variables:
//! - `UNITFLOW_SMART_ORDER` (bool, default true)
//! - `UNITFLOW_SMART_ORDER_PREFIXES` (lista separada por comas, default vacía)
//! - `UNITFLOW_THROW_ON_MISSING` (bool, default false)
use std::env;

use flow_core::{Bag, EngineOptions, ResolverOptions};
use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const SMART_ORDER_VAR: &str = "UNITFLOW_SMART_ORDER";
pub const PREFIXES_VAR: &str = "UNITFLOW_SMART_ORDER_PREFIXES";
pub const THROW_ON_MISSING_VAR: &str = "UNITFLOW_THROW_ON_MISSING";

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub smart_order: bool,
    /// Allow-list de prefijos para smart order. Vacía = todos.
    pub smart_order_prefixes: Vec<String>,
    /// Se copia al flag reservado de cada bag creado con `new_bag`.
    pub throw_on_missing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { smart_order: true,
               smart_order_prefixes: Vec::new(),
               throw_on_missing: false }
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez. Un
/// valor inválido se reporta y se usan los defaults.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
        warn!("{e}; using default configuration");
        AppConfig::default()
    }
});

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración desde una fuente arbitraria de variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let smart_order = match lookup(SMART_ORDER_VAR) {
            Some(v) => parse_bool(SMART_ORDER_VAR, &v)?,
            None => defaults.smart_order,
        };
        let throw_on_missing = match lookup(THROW_ON_MISSING_VAR) {
            Some(v) => parse_bool(THROW_ON_MISSING_VAR, &v)?,
            None => defaults.throw_on_missing,
        };
        let smart_order_prefixes = lookup(PREFIXES_VAR).map(|v| {
                                                         v.split(',')
                                                          .map(str::trim)
                                                          .filter(|p| !p.is_empty())
                                                          .map(str::to_string)
                                                          .collect()
                                                     })
                                                     .unwrap_or_default();
        Ok(Self { smart_order,
                  smart_order_prefixes,
                  throw_on_missing })
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions { smart_order: self.smart_order,
                          prefixes: self.smart_order_prefixes.clone() }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions { throw_on_missing: self.throw_on_missing }
    }

    /// Bag vacío con los flags reservados de esta configuración.
    pub fn new_bag(&self) -> Bag {
        let mut bag = Bag::new();
        if self.throw_on_missing {
            bag.set_throw_on_missing(true);
        }
        bag
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, CoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CoreError::Config(format!("{key} debe ser booleano, se recibió '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])).unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_all_variables() {
        let cfg = AppConfig::from_lookup(lookup(&[(SMART_ORDER_VAR, "off"),
                                                  (PREFIXES_VAR, " in_, ,out_ "),
                                                  (THROW_ON_MISSING_VAR, "Yes")])).unwrap();
        assert!(!cfg.smart_order);
        assert_eq!(cfg.smart_order_prefixes, vec!["in_", "out_"]);
        assert!(cfg.throw_on_missing);
        assert!(cfg.engine_options().throw_on_missing);
        assert!(cfg.new_bag().throw_on_missing());
        assert_eq!(cfg.resolver_options().prefixes, vec!["in_", "out_"]);
    }

    #[test]
    fn invalid_bool_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[(SMART_ORDER_VAR, "maybe")])).unwrap_err();
        assert_eq!(err.to_string(),
                   "Error de configuración: UNITFLOW_SMART_ORDER debe ser booleano, se recibió 'maybe'");
    }
}
