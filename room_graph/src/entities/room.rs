//! Graph nodes (rooms) and footprint generation.

use serde::{Deserialize, Serialize};

use super::{NodeId, NodeKind, Pin, PinDirection, PinId, PropertyDescriptor, RoomSizing};
use crate::error::GraphError;
use crate::geometry::{Bounds, Position};
use crate::layout::{perimeter_point, Direction, RoomConnection, RoomFootprint};
use crate::rng::{generate_seed, Prng};

/// Editor width of a node card.
pub const NODE_WIDTH: f64 = 150.0;
const NODE_BASE_HEIGHT: f64 = 70.0;
const PIN_RADIUS: f64 = 7.0;
const PIN_SPACING: f64 = 7.0;

/// Largest width or height a room's sizing may ask for.
pub const MAX_ROOM_EXTENT: i32 = 1024;

/// A vertex of the room graph.
///
/// Seed and sizing are private so that every change to them refreshes the cached footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Position,
    pub title: String,
    pub is_start: bool,
    pub pins: Vec<Pin>,
    seed: String,
    sizing: RoomSizing,
    footprint: RoomFootprint,
}

impl Room {
    /// Create a node of `kind` with its initial pins, default title and a random seed.
    pub fn new(kind: NodeKind, position: Position) -> Self {
        let profile = kind.profile();
        let id = NodeId::new();
        let mut room = Self {
            id,
            kind,
            position,
            title: profile.default_title.to_string(),
            is_start: false,
            pins: profile
                .initial_pins
                .iter()
                .map(|direction| Pin::new(id, *direction))
                .collect(),
            seed: generate_seed(),
            sizing: profile.sizing,
            footprint: RoomFootprint::default(),
        };
        room.regenerate_footprint(0);
        room
    }

    /// Replace the node ID, re-parenting its pins.
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        for pin in &mut self.pins {
            pin.owner = id;
        }
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.set_seed(seed);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_start(mut self, is_start: bool) -> Self {
        self.is_start = is_start;
        self
    }

    pub fn with_sizing(mut self, sizing: RoomSizing) -> Result<Self, GraphError> {
        self.set_sizing(sizing)?;
        Ok(self)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Change the seed and regenerate the footprint.
    pub fn set_seed(&mut self, seed: impl Into<String>) {
        self.seed = seed.into();
        self.regenerate_footprint(self.footprint.connections.len());
    }

    pub fn sizing(&self) -> RoomSizing {
        self.sizing
    }

    /// Change the size bounds and regenerate the footprint.
    pub fn set_sizing(&mut self, sizing: RoomSizing) -> Result<(), GraphError> {
        check_range(sizing.min_width, sizing.max_width)?;
        check_range(sizing.min_height, sizing.max_height)?;
        self.sizing = sizing;
        self.regenerate_footprint(self.footprint.connections.len());
        Ok(())
    }

    /// The cached footprint from the last regeneration.
    pub fn footprint(&self) -> &RoomFootprint {
        &self.footprint
    }

    /// Compute this room's footprint for `incoming` bound connections arriving at it.
    ///
    /// Uses a private generator seeded from the room's own seed, so the result does not
    /// depend on any other random state. Each incoming connection takes a wall direction
    /// from a pool of the four directions, refilled once it runs dry.
    pub fn build_footprint(&self, incoming: usize) -> RoomFootprint {
        let mut rng = Prng::from_seed(&self.seed);
        let height = rng.next_range(self.sizing.min_height, self.sizing.max_height + 1);
        let width = rng.next_range(self.sizing.min_width, self.sizing.max_width + 1);

        let mut footprint = RoomFootprint::new(width, height);
        let (extent_x, extent_y) = footprint.perimeter_extent();
        let mut remaining: Vec<Direction> = Vec::with_capacity(4);

        for _ in 0..incoming {
            if remaining.is_empty() {
                remaining.extend(Direction::ALL);
            }
            let index = rng.choose_index(remaining.len()).unwrap_or(0);
            let direction = remaining.remove(index);
            let position = perimeter_point(&mut rng, extent_x, extent_y, direction);
            footprint
                .connections
                .push(RoomConnection::new(position, direction));
        }

        footprint
    }

    /// Rebuild and cache the footprint.
    pub fn regenerate_footprint(&mut self, incoming: usize) -> &RoomFootprint {
        self.footprint = self.build_footprint(incoming);
        &self.footprint
    }

    /// Ordered property descriptors for the property panel.
    pub fn properties(&self) -> Vec<PropertyDescriptor> {
        self.kind
            .profile()
            .properties
            .iter()
            .map(|binding| binding.describe(self))
            .collect()
    }

    /// Apply an edited property and regenerate the footprint.
    pub fn apply_property(&mut self, update: PropertyDescriptor) -> Result<(), GraphError> {
        let binding = self
            .kind
            .profile()
            .properties
            .iter()
            .find(|binding| binding.id == update.id)
            .ok_or(GraphError::PropertyNotExposed {
                kind: self.kind,
                property: update.id,
            })?;
        binding.apply(self, update.value)?;
        self.regenerate_footprint(self.footprint.connections.len());
        Ok(())
    }

    /// Append a new pin. Fails for kinds without an add-pin button.
    pub fn add_pin(&mut self, direction: PinDirection) -> Result<PinId, GraphError> {
        if !self.kind.profile().can_add_pins {
            return Err(GraphError::PinsLocked(self.kind));
        }
        let pin = Pin::new(self.id, direction);
        let id = pin.id;
        self.pins.push(pin);
        Ok(id)
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.id == id)
    }

    pub fn pin_mut(&mut self, id: PinId) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|pin| pin.id == id)
    }

    pub fn owns_pin(&self, id: PinId) -> bool {
        self.pin(id).is_some()
    }

    /// Editor-space rectangle of the node card; grows with the longest pin column.
    pub fn editor_bounds(&self) -> Bounds {
        let inputs = self
            .pins
            .iter()
            .filter(|pin| pin.direction == PinDirection::In)
            .count();
        let outputs = self.pins.len() - inputs;
        let rows = inputs.max(outputs) as f64;
        let height = NODE_BASE_HEIGHT + rows * (PIN_RADIUS * 2.0 + PIN_SPACING);
        Bounds::from_origin_size(self.position, NODE_WIDTH, height)
    }
}

fn check_range(min: i32, max: i32) -> Result<(), GraphError> {
    if min < 0 || min > max || max > MAX_ROOM_EXTENT {
        return Err(GraphError::InvalidRange { min, max });
    }
    Ok(())
}
