//! `Pipeline`: lista ordenada de objetos declarantes que se ejecuta como una
//! sola secuencia.
//!
//! Flujo: objetos (provider o registro explícito) → `CompositeModification`
//! sobre la lista → resolución por objeto (en paralelo, cada objeto es
//! independiente) → concatenación en orden de pipeline → un solo run del
//! engine contra un solo bag.
use std::fmt;
use std::sync::Arc;

use flow_adapters::ObjectProvider;
use flow_core::{Bag, CompositeModification, EngineOptions, EventStore, ExecutionEngine, Matcher, ModificationBuilder,
                ResolverOptions, RunSummary, UnitObject, UnitSequence};
use log::{debug, info};
use rayon::prelude::*;

use crate::cache::SequenceCache;
use crate::config::AppConfig;
use crate::errors::CoreError;

type Object = Arc<dyn UnitObject>;

pub struct Pipeline {
    name: String,
    objects: Vec<Object>,
    modifications: CompositeModification<dyn UnitObject>,
    resolver: ResolverOptions,
    engine: EngineOptions,
    cache: Option<Arc<SequenceCache>>,
}

impl Pipeline {
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objetos efectivos: la lista registrada con las modificaciones
    /// aplicadas en orden.
    pub fn objects(&self) -> Vec<Object> {
        self.modifications.apply(self.objects.clone())
    }

    /// Resuelve cada objeto y concatena sus secuencias. Si algún objeto
    /// tiene un ciclo se devuelve ese error y no se ejecuta nada.
    pub fn resolve(&self) -> Result<UnitSequence, CoreError> {
        let objects = self.objects();
        let options = &self.resolver;
        let parts: Vec<Arc<UnitSequence>> = objects.par_iter()
                                                   .map(|object| match &self.cache {
                                                       Some(cache) => cache.get_or_resolve(&**object, options),
                                                       None => UnitSequence::resolve(&**object, options).map(Arc::new),
                                                   })
                                                   .collect::<Result<_, _>>()?;
        debug!("pipeline '{}': {} objects resolved", self.name, parts.len());
        Ok(UnitSequence::concat(self.name.clone(), parts.iter().map(|p| UnitSequence::clone(p))))
    }

    /// Ejecuta con un engine nuevo (store en memoria) y las opciones del
    /// pipeline.
    pub fn run(&self, bag: &mut Bag) -> Result<RunSummary, CoreError> {
        let mut engine = ExecutionEngine::new().with_options(self.engine);
        self.run_with(&mut engine, bag)
    }

    /// Ejecuta con un engine provisto por el caller (p. ej. con un store
    /// observador). Las opciones del engine no se tocan. Los eventos de cada
    /// run quedan en el store del engine hasta que el caller los drene.
    pub fn run_with<E: EventStore>(&self, engine: &mut ExecutionEngine<E>, bag: &mut Bag) -> Result<RunSummary, CoreError> {
        let sequence = self.resolve()?;
        info!("pipeline '{}' running {} units", self.name, sequence.len());
        Ok(engine.execute(&sequence, bag)?)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
         .field("name", &self.name)
         .field("objects", &self.objects.iter().map(|o| o.identity()).collect::<Vec<_>>())
         .field("modifications", &self.modifications)
         .field("resolver", &self.resolver)
         .field("engine", &self.engine)
         .finish()
    }
}

/// Builder de `Pipeline`. Las ediciones (`insert`/`remove`/`before`/`after`)
/// se acumulan y se aplican sobre la lista de objetos en el orden
/// declarado, después de todos los `object`/`provider`.
pub struct PipelineBuilder {
    name: String,
    objects: Vec<Object>,
    edits: ModificationBuilder<dyn UnitObject>,
    resolver: ResolverOptions,
    engine: EngineOptions,
    cache: Option<Arc<SequenceCache>>,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               objects: Vec::new(),
               edits: ModificationBuilder::new(),
               resolver: ResolverOptions::default(),
               engine: EngineOptions::default(),
               cache: None }
    }

    pub fn object(mut self, object: impl UnitObject + 'static) -> Self {
        self.objects.push(Arc::new(object));
        self
    }

    pub fn shared(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    pub fn provider(mut self, provider: &dyn ObjectProvider) -> Self {
        self.objects.extend(provider.objects());
        self
    }

    pub fn insert(mut self, index: usize, objects: impl IntoIterator<Item = Object>) -> Self {
        self.edits = self.edits.insert(index, objects);
        self
    }

    pub fn remove(mut self, matcher: Matcher<dyn UnitObject>) -> Self {
        self.edits = self.edits.remove(matcher);
        self
    }

    pub fn before(mut self, matcher: Matcher<dyn UnitObject>, objects: impl IntoIterator<Item = Object>) -> Self {
        self.edits = self.edits.before(matcher, objects);
        self
    }

    pub fn after(mut self, matcher: Matcher<dyn UnitObject>, objects: impl IntoIterator<Item = Object>) -> Self {
        self.edits = self.edits.after(matcher, objects);
        self
    }

    pub fn resolver_options(mut self, options: ResolverOptions) -> Self {
        self.resolver = options;
        self
    }

    pub fn engine_options(mut self, options: EngineOptions) -> Self {
        self.engine = options;
        self
    }

    /// Toma resolver y engine options de la configuración.
    pub fn config(self, config: &AppConfig) -> Self {
        self.resolver_options(config.resolver_options()).engine_options(config.engine_options())
    }

    pub fn cache(mut self, cache: Arc<SequenceCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline { name: self.name,
                   objects: self.objects,
                   modifications: self.edits.get_configuration(),
                   resolver: self.resolver,
                   engine: self.engine,
                   cache: self.cache }
    }
}

/// Matcher por identidad de objeto.
pub fn identity_is(identity: impl Into<String>) -> Matcher<dyn UnitObject> {
    let identity = identity.into();
    Matcher::<dyn UnitObject>::predicate(move |o| o.identity() == identity)
}
