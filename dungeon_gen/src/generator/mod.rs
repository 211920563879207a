//! Dungeon Generator - expands the room graph into placed footprints.
//!
//! Generation works as follows:
//! 1. **Seed**: A generation-local RNG is seeded from the dungeon seed
//! 2. **Start**: The start node's footprint is placed at the origin
//! 3. **Doorways**: Every bound connection leaving the start node gets a free perimeter point
//! 4. **Corridors**: A corridor chain is grown out of each doorway
//!
//! Target nodes are not placed; each connection yields its own independent corridor chain.

mod corridor;
mod placement;

pub use corridor::*;
pub use placement::*;

use room_graph::{GraphStore, GridPoint, Listener, ListenerId, Notification, Notifier, Prng};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GeneratorConfig};

/// Deterministic layout generator.
#[derive(Debug, Default)]
pub struct DungeonGenerator {
    config: GeneratorConfig,
    notifications: Notifier<Notification>,
}

impl DungeonGenerator {
    /// Create a new generator, rejecting an invalid configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            notifications: Notifier::new(),
        })
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: GeneratorConfig::default(),
            notifications: Notifier::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Subscribe to generation warnings.
    pub fn listen<L: Listener<Notification> + 'static>(&self, listener: L) -> ListenerId {
        self.notifications.listen(listener)
    }

    /// Generate the layout for `store` under the dungeon `seed`.
    ///
    /// The output depends only on the seed, the node seeds and sizing, and the order of the
    /// store's connections. Problems never abort generation: they are recorded as
    /// [`GenerationWarning`]s on the returned layout and published as notifications.
    pub fn generate(&self, store: &GraphStore, seed: &str) -> DungeonLayout {
        let mut rng = Prng::from_seed(seed);
        let mut layout = DungeonLayout::default();

        let Some(start) = store.find_start_node() else {
            self.report(&mut layout, GenerationWarning::NoStartNode);
            return layout;
        };
        debug!(node = %start.id, kind = ?start.kind, "placing start node");

        let incoming = store.incoming_connections(start.id).count();
        layout.tiles.push(PlacedFootprint::room(
            start.kind,
            start.id,
            GridPoint::ORIGIN,
            start.build_footprint(incoming),
        ));

        let outgoing: Vec<_> = store
            .outgoing_connections(start.id)
            .filter(|connection| connection.is_bound())
            .map(|connection| connection.id)
            .collect();

        for connection in outgoing {
            let placed = allocate_connection_point(&mut rng, &layout.tiles[0].footprint);
            let doorway = match placed {
                Ok(doorway) => doorway,
                Err(PlacementExhausted { attempts }) => {
                    self.report(
                        &mut layout,
                        GenerationWarning::ConnectionPlacementExhausted {
                            connection,
                            attempts,
                        },
                    );
                    continue;
                }
            };
            layout.tiles[0].footprint.connections.push(doorway);

            let chain = grow_corridor(&mut rng, &self.config.corridor, &layout.tiles[0], doorway);
            debug!(%connection, segments = chain.len(), "placed corridor");
            layout.tiles.extend(chain);
        }

        info!(
            seed,
            tiles = layout.tiles.len(),
            warnings = layout.warnings.len(),
            "generated dungeon"
        );
        layout
    }

    fn report(&self, layout: &mut DungeonLayout, warning: GenerationWarning) {
        warn!(%warning, "dungeon generation");
        self.notifications
            .notify(&Notification::warn(warning.to_string()));
        layout.warnings.push(warning);
    }
}
