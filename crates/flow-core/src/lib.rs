//! flow-core: orquestación determinista de unidades sobre un bag compartido.
pub mod bag;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod modification;
pub mod resolver;
pub mod unit;

pub use bag::{Bag, Message, MessageKind, Modificator};
pub use engine::{EngineBuilder, EngineOptions, ExecutionEngine, RunSummary};
pub use errors::{ExecutionError, MissingOrWrongTypePropertyError, OrderCycleError, UnitFailure};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind, SkipReason};
pub use modification::{CompositeModification, Matcher, Modification, ModificationBuilder};
pub use resolver::{order_indices, resolve_order, ResolverOptions, UnitSequence};
pub use unit::{AsAny, BoundArgs, FnUnit, Invocation, InvocationMode, ParamDescriptor, Unit, UnitDescriptor, UnitObject,
               UnitOutput, UnitResult, UnitSet, ValueKind};
