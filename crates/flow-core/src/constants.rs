//! Constantes del motor core.
//!
//! Agrupa las claves reservadas del `Bag` y la versión lógica del motor. Las
//! claves reservadas usan el prefijo `__` para no chocar con nombres de
//! parámetros habituales; cambiar cualquiera de ellas rompe la compatibilidad
//! con bags construidos por colaboradores externos.

/// Versión lógica del motor. Forma parte del fingerprint de cada
/// `UnitSequence`, así que un cambio de versión invalida fingerprints previos
/// aunque las unidades no cambien.
pub const ENGINE_VERSION: &str = "U1.0";

/// Flag booleano que detiene la ejecución de las unidades restantes.
pub const END_KEY: &str = "__end";

/// Slot del resultado final de la ejecución.
pub const RESULT_KEY: &str = "__result";

/// Log ordenado de `Message`.
pub const MESSAGES_KEY: &str = "__messages";

/// Modo debug: un parámetro requerido ausente aborta `execute` con error.
pub const THROW_ON_MISSING_KEY: &str = "__throw_on_missing";

/// Handle opaco de servicios; el core nunca lo lee.
pub const SERVICE_PROVIDER_KEY: &str = "__service_provider";

/// Todas las claves reservadas, en el orden en que se documentan.
pub const RESERVED_KEYS: [&str; 5] = [END_KEY, RESULT_KEY, MESSAGES_KEY, THROW_ON_MISSING_KEY, SERVICE_PROVIDER_KEY];
