//! PropertyCalculator: GetProperty produce `property`, UseProperty la
//! consume. Se declaran en orden inverso a propósito; smart order las
//! reordena.

use std::sync::Arc;

use flow_core::{FnUnit, Unit, UnitDescriptor, UnitObject, ValueKind};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct PropertyCalculator {
    pub base: i64,
    pub factor: i64,
}

impl PropertyCalculator {
    pub const IDENTITY: &'static str = "PropertyCalculator";

    pub fn new(base: i64, factor: i64) -> Self {
        Self { base, factor }
    }
}

impl Default for PropertyCalculator {
    fn default() -> Self {
        Self::new(21, 2)
    }
}

impl UnitObject for PropertyCalculator {
    fn identity(&self) -> &str {
        Self::IDENTITY
    }

    fn units(&self) -> Vec<Arc<dyn Unit>> {
        let factor = self.factor;
        let base = self.base;
        let use_property =
            FnUnit::new(UnitDescriptor::new("UseProperty").owner(Self::IDENTITY)
                                                          .required("property", ValueKind::Integer)
                                                          .produces("scaled"),
                        move |call| {
                            let property: i64 = call.require("property")?;
                            let scaled = property.checked_mul(factor).ok_or("scaled property overflows i64")?;
                            call.bag.info(format!("property {property} scaled by {factor}"))?;
                            Ok(Some(json!(scaled)))
                        });
        let get_property = FnUnit::new(UnitDescriptor::new("GetProperty").owner(Self::IDENTITY).produces("property"),
                                       move |_| Ok(Some(json!(base))));
        vec![Arc::new(use_property), Arc::new(get_property)]
    }
}
