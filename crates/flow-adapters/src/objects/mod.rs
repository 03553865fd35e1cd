//! Objetos de demostración que declaran unidades.
pub mod calculator;
pub mod text;

pub use calculator::PropertyCalculator;
pub use text::{NormalizerParams, TextNormalizer};
