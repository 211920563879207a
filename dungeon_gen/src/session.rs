//! Regenerates the dungeon whenever the graph or the dungeon seed changes.

use room_graph::{DirtyFlag, GraphStore, ListenerId};
use tracing::debug;

use crate::generator::{DungeonGenerator, DungeonLayout};

/// Keeps a generated layout in step with a [`GraphStore`].
///
/// The session subscribes to the store when created. Store changes only mark the layout
/// stale; the layout is rebuilt on the next [`refresh`](Self::refresh).
#[derive(Debug)]
pub struct DungeonSession {
    generator: DungeonGenerator,
    seed: String,
    stale: DirtyFlag,
    subscription: ListenerId,
    layout: DungeonLayout,
}

impl DungeonSession {
    pub fn new(generator: DungeonGenerator, store: &GraphStore, seed: impl Into<String>) -> Self {
        let stale = DirtyFlag::new(true);
        let subscription = store.listen(stale.listener());
        Self {
            generator,
            seed: seed.into(),
            stale,
            subscription,
            layout: DungeonLayout::default(),
        }
    }

    pub fn generator(&self) -> &DungeonGenerator {
        &self.generator
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Change the dungeon seed. The layout is rebuilt on the next refresh if it differs.
    pub fn set_seed(&mut self, seed: impl Into<String>) {
        let seed = seed.into();
        if seed != self.seed {
            self.seed = seed;
            self.stale.set();
        }
    }

    pub fn is_stale(&self) -> bool {
        self.stale.is_dirty()
    }

    /// Rebuild the layout if anything changed. Returns whether it was rebuilt.
    pub fn refresh(&mut self, store: &GraphStore) -> bool {
        if !self.stale.take() {
            return false;
        }
        debug!(seed = %self.seed, "regenerating dungeon");
        self.layout = self.generator.generate(store, &self.seed);
        true
    }

    /// The most recently generated layout.
    pub fn layout(&self) -> &DungeonLayout {
        &self.layout
    }

    /// Stop listening to `store`.
    pub fn detach(self, store: &GraphStore) -> DungeonLayout {
        store.unlisten(self.subscription);
        self.layout
    }
}
