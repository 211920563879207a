//! Pin definitions.

use serde::{Deserialize, Serialize};

use super::{NodeId, PinId};
use crate::error::GraphError;
use crate::geometry::{Bounds, Position};

/// Whether a pin receives or emits connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PinDirection {
    In,
    Out,
}

impl From<PinDirection> for u8 {
    fn from(direction: PinDirection) -> Self {
        match direction {
            PinDirection::In => 0,
            PinDirection::Out => 1,
        }
    }
}

impl TryFrom<u8> for PinDirection {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PinDirection::In),
            1 => Ok(PinDirection::Out),
            other => Err(GraphError::UnknownPinDirection(other)),
        }
    }
}

/// A typed connection endpoint owned by exactly one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub owner: NodeId,
    pub direction: PinDirection,
    /// Set while at least one connection references this pin.
    pub has_connection: bool,
    /// Editor hit area, written by the renderer each frame.
    pub hitbox: Bounds,
}

impl Pin {
    /// Create an unconnected pin for `owner`.
    pub fn new(owner: NodeId, direction: PinDirection) -> Self {
        Self {
            id: PinId::new(),
            owner,
            direction,
            has_connection: false,
            hitbox: Bounds::default(),
        }
    }

    pub fn with_id(mut self, id: PinId) -> Self {
        self.id = id;
        self
    }

    pub fn set_hitbox(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.hitbox = Bounds::from_origin_size(Position::new(x, y), width, height);
    }

    /// Whether `point` hits this pin.
    pub fn hit(&self, point: Position) -> bool {
        self.hitbox.contains(point)
    }
}
