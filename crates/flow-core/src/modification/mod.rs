//! Álgebra de modificación de pipelines.
//!
//! Operaciones de edición (insert/remove/before/after) sobre una lista
//! ordenada de elementos opacos compartidos (`Arc<T>`). No conoce unidades
//! ni bags: el caller decide qué lista edita (objetos, pasos, etc.).
//!
//! ```ignore
//! let config = ModificationBuilder::new()
//!     .remove(Matcher::of_type::<Legacy>())
//!     .before(Matcher::instance(&load), [audit.clone()])
//!     .get_configuration();
//! let edited = config.apply(objects);
//! ```

mod composite;
mod matcher;
mod ops;

pub use composite::{CompositeModification, ModificationBuilder};
pub use matcher::Matcher;
pub use ops::Modification;
