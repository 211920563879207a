//! Generator output and perimeter connection allocation.

use std::fmt;

use room_graph::{
    perimeter_point, ConnectionId, Direction, GridPoint, NodeId, NodeKind, Prng, RoomConnection,
    RoomFootprint,
};
use serde::{Deserialize, Serialize};

/// A footprint placed at an absolute grid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFootprint {
    /// `Path` for corridor segments.
    pub kind: NodeKind,
    /// The graph node this tile was generated from; `None` for corridors.
    pub node: Option<NodeId>,
    /// Absolute position of the footprint's top-left cell.
    pub position: GridPoint,
    pub footprint: RoomFootprint,
}

impl PlacedFootprint {
    pub fn room(kind: NodeKind, node: NodeId, position: GridPoint, footprint: RoomFootprint) -> Self {
        Self {
            kind,
            node: Some(node),
            position,
            footprint,
        }
    }

    pub fn corridor(position: GridPoint, footprint: RoomFootprint) -> Self {
        Self {
            kind: NodeKind::Path,
            node: None,
            position,
            footprint,
        }
    }

    pub fn is_corridor(&self) -> bool {
        self.node.is_none()
    }

    /// Absolute cell of one of this tile's connection points.
    pub fn absolute(&self, connection: &RoomConnection) -> GridPoint {
        self.position.offset(connection.position)
    }
}

/// A non-fatal condition met during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationWarning {
    /// No node is flagged as start and there is no Entry node.
    NoStartNode,
    /// Every attempt to find a free perimeter point for the connection collided.
    ConnectionPlacementExhausted {
        connection: ConnectionId,
        attempts: u32,
    },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationWarning::NoStartNode => write!(f, "No start node found!"),
            GenerationWarning::ConnectionPlacementExhausted {
                connection,
                attempts,
            } => write!(
                f,
                "No free connection point for connection {connection} after {attempts} attempts, skipping it"
            ),
        }
    }
}

/// Ordered generator output, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub tiles: Vec<PlacedFootprint>,
    pub warnings: Vec<GenerationWarning>,
}

impl DungeonLayout {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn corridors(&self) -> impl Iterator<Item = &PlacedFootprint> {
        self.tiles.iter().filter(|tile| tile.is_corridor())
    }
}

/// Allocation failed after the full retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementExhausted {
    pub attempts: u32,
}

/// Pick a random wall and a random cell along it until the pair is not used by any of the
/// footprint's connections yet.
///
/// The budget is one attempt per distinct perimeter cell, so a room of `W` x `H` is given
/// at most `2 * (W + H)` attempts (zero extents count as one cell).
pub fn allocate_connection_point(
    rng: &mut Prng,
    footprint: &RoomFootprint,
) -> Result<RoomConnection, PlacementExhausted> {
    let budget = footprint.perimeter_cells();
    let (width, height) = footprint.perimeter_extent();

    for _ in 0..budget {
        let Some(&direction) = rng.choose(&Direction::ALL) else {
            break;
        };
        let candidate = RoomConnection::new(
            perimeter_point(rng, width, height, direction),
            direction,
        );
        if !footprint.has_connection(&candidate) {
            return Ok(candidate);
        }
    }

    Err(PlacementExhausted { attempts: budget })
}
