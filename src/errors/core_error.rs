use flow_core::{ExecutionError, OrderCycleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de orden: {0}")]
    Order(#[from] OrderCycleError),
    #[error("Error de ejecución: {0}")]
    Execution(#[from] ExecutionError),
}

impl CoreError {
    /// Unidad implicada, si el error viene de una ejecución.
    pub fn unit(&self) -> Option<&str> {
        match self {
            CoreError::Execution(e) => e.unit(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_variant_format() {
        let err = CoreError::Config("mala configuración".into());
        assert_eq!(err.to_string(), "Error de configuración: mala configuración");
    }

    #[test]
    fn test_order_variant_from() {
        let cycle = OrderCycleError { owner: "Calc".into(),
                                      units: vec!["a".into(), "b".into()] };
        let err: CoreError = cycle.into();
        assert_eq!(err.to_string(), "Error de orden: dependency cycle detected in 'Calc' involving: a, b");
        assert_eq!(err.unit(), None);
    }

    #[test]
    fn test_execution_variant_keeps_unit() {
        let err: CoreError = ExecutionError::UnitFailed { unit: "Load".into(),
                                                          source: "boom".into() }.into();
        assert_eq!(err.unit(), Some("Load"));
        assert_eq!(err.to_string(), "Error de ejecución: unit 'Load' failed: boom");
    }
}
