use std::sync::Arc;

use flow_adapters::{BroadcastStore, LoggingEventStore, NormalizerParams, PropertyCalculator, StaticProvider, TextNormalizer};
use flow_core::event::{InMemoryEventStore, RunEvent};
use flow_core::{ExecutionEngine, MessageKind, UnitDescriptor, UnitObject, UnitSet};
use unitflow_rust::{identity_is, CoreError, Pipeline, SequenceCache, CONFIG};

/// Objeto de auditoría que se inserta en el pipeline vía modificación.
fn audit() -> Arc<dyn UnitObject> {
    Arc::new(UnitSet::new("Audit").unit(UnitDescriptor::new("Snapshot").claims_all(), |call| {
                                      let keys: Vec<String> = call.bag.user_keys().map(str::to_string).collect();
                                      call.bag.info(format!("bag keys after calculator: {}", keys.join(", ")))?;
                                      Ok(None)
                                  }))
}

fn run_demo() -> Result<(), CoreError> {
    let config = serde_json::to_string(&*CONFIG).map_err(|e| CoreError::Config(e.to_string()))?;
    println!("Configuración: {config}");

    let provider = StaticProvider::new().with(PropertyCalculator::default())
                                        .with(TextNormalizer::new(NormalizerParams { uppercase: true,
                                                                                     max_len: Some(32) }));
    let cache = Arc::new(SequenceCache::new());
    let pipeline = Pipeline::builder("demo").provider(&provider)
                                            .after(identity_is(PropertyCalculator::IDENTITY), [audit()])
                                            .config(&CONFIG)
                                            .cache(Arc::clone(&cache))
                                            .build();

    let sequence = pipeline.resolve()?;
    println!("Secuencia ({}): {:?}", sequence.fingerprint(), sequence.names());

    let store = BroadcastStore::new(LoggingEventStore::new(InMemoryEventStore::default())).subscribe(|e: &RunEvent| {
                                                                                            println!("  evento {} {:?}", e.seq, e.kind)
                                                                                        });
    let mut engine = ExecutionEngine::builder().event_store(store).options(CONFIG.engine_options()).build();

    let mut bag = CONFIG.new_bag();
    bag.set("input", "  Hola Mundo  ");
    let summary = pipeline.run_with(&mut engine, &mut bag)?;
    println!("Ejecutadas: {:?}", summary.executed);
    println!("Resultado: {:?}", bag.result::<String>());
    for m in bag.messages() {
        println!("[{:?}] {}", m.kind(), m.text());
    }
    println!("Eventos: {:?}", engine.event_variants().unwrap_or_default());

    // Segunda corrida sin input: Load termina el run con un error en el bag.
    let mut empty = CONFIG.new_bag();
    let summary = pipeline.run_with(&mut engine, &mut empty)?;
    println!("Sin input: ended_early={} errores={}",
             summary.ended_early,
             empty.messages_of(MessageKind::Error).len());
    println!("Secuencias en caché: {}", cache.len());
    Ok(())
}

fn main() {
    if let Err(e) = run_demo() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
