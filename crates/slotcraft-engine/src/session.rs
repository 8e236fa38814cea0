//! Engine wiring and serialized access.
//!
//! [`CraftingSession`] owns an engine and processes queued inputs strictly in
//! arrival order. [`SharedEngine`] wraps an engine in a mutex for embedders
//! that drive it from several threads.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use slotcraft_common::{ConfigResult, GridResult};
use slotcraft_gameplay::{
    CraftingEngine, CraftingGrid, CraftingInput, CraftingOutput, EventBus, OutputHandler,
    RecipeBook, StepOutcome,
};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::recipe_loader::{CraftingCatalog, LoadResult, RecipeLoader};

/// Builds an engine from an already loaded catalog.
pub fn engine_from_catalog(
    catalog: &CraftingCatalog,
    config: &EngineConfig,
) -> ConfigResult<CraftingEngine> {
    let dimensions = config.dimensions()?;
    let book = Arc::new(catalog.build_book(dimensions)?);
    let supply = catalog.build_supply(config.supply_enabled)?;
    let grid = CraftingGrid::new(dimensions).with_policy(config.occupied_policy);

    CraftingEngine::with_event_bus(grid, book, supply, EventBus::new(config.event_capacity))
}

/// Loads the configured catalog and builds an engine.
pub fn build_engine(config: &EngineConfig) -> LoadResult<CraftingEngine> {
    let mut loader = RecipeLoader::new(&config.recipe_path);
    loader.load_all()?;
    Ok(engine_from_catalog(loader.catalog(), config)?)
}

/// Single-owner engine with a FIFO input queue.
pub struct CraftingSession {
    engine: CraftingEngine,
    sender: Sender<CraftingInput>,
    inbox: Receiver<CraftingInput>,
    handlers: Vec<Box<dyn OutputHandler>>,
}

impl CraftingSession {
    /// Wraps an engine.
    #[must_use]
    pub fn new(engine: CraftingEngine) -> Self {
        let (sender, inbox) = unbounded();
        Self {
            engine,
            sender,
            inbox,
            handlers: Vec::new(),
        }
    }

    /// Loads configuration-driven state and starts a session.
    pub fn from_config(config: &EngineConfig) -> LoadResult<Self> {
        let engine = build_engine(config)?;
        info!("Crafting session started");
        Ok(Self::new(engine))
    }

    /// Handle for queueing inputs from any thread.
    #[must_use]
    pub fn sender(&self) -> Sender<CraftingInput> {
        self.sender.clone()
    }

    /// Registers a handler that receives every processed output.
    pub fn add_handler(&mut self, handler: Box<dyn OutputHandler>) {
        self.handlers.push(handler);
    }

    /// Number of queued inputs.
    #[must_use]
    pub fn pending_inputs(&self) -> usize {
        self.inbox.len()
    }

    /// Processes every queued input in arrival order.
    ///
    /// Each input runs its full evaluation before the next one is taken.
    /// Returns all outputs produced, including any left over from
    /// construction, after dispatching them to the handlers.
    pub fn process_pending(&mut self) -> Vec<CraftingOutput> {
        let mut outputs = self.engine.drain_events();

        while let Ok(input) = self.inbox.try_recv() {
            if let Err(err) = self.engine.handle(input) {
                debug!("Input rejected: {}", err);
            }
            outputs.extend(self.engine.drain_events());
        }

        for output in &outputs {
            for handler in &self.handlers {
                handler.handle(output);
            }
        }

        outputs
    }

    /// The engine.
    #[must_use]
    pub fn engine(&self) -> &CraftingEngine {
        &self.engine
    }

    /// Mutable engine access, for collecting results and materials.
    pub fn engine_mut(&mut self) -> &mut CraftingEngine {
        &mut self.engine
    }
}

/// Engine behind a mutex. Every call takes the lock for its full cycle.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<CraftingEngine>>,
}

impl SharedEngine {
    /// Wraps an engine.
    #[must_use]
    pub fn new(engine: CraftingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Dispatches one input under the lock.
    pub fn handle(&self, input: CraftingInput) -> GridResult<StepOutcome> {
        self.inner.lock().handle(input)
    }

    /// Drains outbound events.
    pub fn drain_events(&self) -> Vec<CraftingOutput> {
        self.inner.lock().drain_events()
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut CraftingEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// The recipe book, readable without the lock.
    #[must_use]
    pub fn book(&self) -> Arc<RecipeBook> {
        Arc::clone(self.inner.lock().book())
    }
}
