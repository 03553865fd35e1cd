//! Tests de integración: objetos de demostración a través del core.

use std::sync::{Arc, Mutex};

use flow_adapters::{BroadcastStore, LoggingEventStore, NormalizerParams, PropertyCalculator, TextNormalizer};
use flow_core::event::{InMemoryEventStore, RunEvent, RunEventKind};
use flow_core::{Bag, ExecutionEngine, MessageKind, ResolverOptions, UnitSequence};

#[test]
fn calculator_runs_in_data_order() {
    let seq = UnitSequence::resolve(&PropertyCalculator::new(5, 3), &ResolverOptions::default()).expect("resolve");
    assert_eq!(seq.names(), vec!["GetProperty", "UseProperty"]);

    let mut engine = ExecutionEngine::new();
    let mut bag = Bag::new();
    engine.execute(&seq, &mut bag).expect("run");
    assert_eq!(bag.try_get::<i64>("scaled"), Some(15));
    assert_eq!(bag.messages_of(MessageKind::Information).len(), 1);
}

#[test]
fn calculator_overflow_is_a_unit_failure() {
    let seq = UnitSequence::resolve(&PropertyCalculator::new(i64::MAX, 2), &ResolverOptions::default()).expect("resolve");
    let err = ExecutionEngine::new().execute(&seq, &mut Bag::new()).unwrap_err();
    assert_eq!(err.unit(), Some("UseProperty"));
}

#[test]
fn normalizer_chains_load_trim_case_report() {
    let normalizer = TextNormalizer::new(NormalizerParams { uppercase: true,
                                                            max_len: Some(3) });
    let seq = UnitSequence::resolve(&normalizer, &ResolverOptions::default()).expect("resolve");
    assert_eq!(seq.names(), vec!["Load", "Trim", "Case", "Report"]);

    let mut bag = Bag::new();
    bag.set("Input", "  hello ");
    let summary = ExecutionEngine::new().execute(&seq, &mut bag).expect("run");

    assert_eq!(summary.executed.len(), 4);
    assert_eq!(bag.result::<String>().as_deref(), Some("HELLO"));
    assert_eq!(bag.messages_of(MessageKind::Warning)[0].text(), "text longer than 3 chars");
}

#[test]
fn normalizer_without_input_ends_with_error() {
    let seq = UnitSequence::resolve(&TextNormalizer::default(), &ResolverOptions::default()).expect("resolve");
    let mut engine = ExecutionEngine::new();
    let mut bag = Bag::new();
    let summary = engine.execute(&seq, &mut bag).expect("run");

    assert!(summary.ended_early);
    assert!(summary.executed.is_empty());
    assert_eq!(bag.messages_of(MessageKind::Error)[0].text(), "no input text was provided");
    assert_eq!(engine.event_variants(), Some(vec!["I", "E", "K", "K", "K", "C"]));
}

#[test]
fn broadcast_observer_sees_the_same_events_as_the_store() {
    let seen: Arc<Mutex<Vec<&'static str>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let store = BroadcastStore::new(LoggingEventStore::new(InMemoryEventStore::default())).subscribe(move |e: &RunEvent| {
                                                                                             if let Ok(mut v) = sink.lock() {
                                                                                                 v.push(e.kind.letter());
                                                                                             }
                                                                                         });
    let mut engine = ExecutionEngine::with_store(store);
    let seq = UnitSequence::resolve(&PropertyCalculator::default(), &ResolverOptions::default()).expect("resolve");
    let summary = engine.execute(&seq, &mut Bag::new()).expect("run");

    let stored: Vec<&str> = engine.events_for(summary.run_id).iter().map(|e| e.kind.letter()).collect();
    assert_eq!(*seen.lock().unwrap(), stored);
    assert!(matches!(engine.events_for(summary.run_id).last().map(|e| &e.kind),
                     Some(RunEventKind::RunCompleted { executed: 2, ended_early: false })));
}
