//! Grid layout primitives shared by room footprints and the dungeon generator.
//!
//! Grid coordinates grow to the east (`x`) and to the south (`y`).

use serde::{Deserialize, Serialize};

use crate::rng::Prng;

/// Facing of a wall or connection point on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions, in the order random picks index into.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The three directions that do not double back on `self`.
    pub fn turns(self) -> [Direction; 3] {
        let opposite = self.opposite();
        let mut turns = [self; 3];
        let mut next = 0;
        for direction in Direction::ALL {
            if direction != opposite {
                turns[next] = direction;
                next += 1;
            }
        }
        turns
    }

    /// Whether travel in this direction runs along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}

/// An integer cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const ORIGIN: GridPoint = GridPoint { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, other: GridPoint) -> GridPoint {
        GridPoint::new(self.x + other.x, self.y + other.y)
    }
}

/// A doorway on a footprint's perimeter: local cell plus the wall it faces out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomConnection {
    pub position: GridPoint,
    pub direction: Direction,
}

impl RoomConnection {
    pub fn new(position: GridPoint, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// The generated shape of a room or corridor segment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomFootprint {
    pub width: i32,
    pub height: i32,
    pub connections: Vec<RoomConnection>,
}

impl RoomFootprint {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            connections: Vec::new(),
        }
    }

    /// Size used when sampling perimeter cells. A zero extent counts as a single anchor cell.
    pub fn perimeter_extent(&self) -> (i32, i32) {
        (self.width.max(1), self.height.max(1))
    }

    /// Number of distinct perimeter cells, `2 * (width + height)` over the perimeter extent.
    pub fn perimeter_cells(&self) -> u32 {
        let (width, height) = self.perimeter_extent();
        2 * (width + height) as u32
    }

    /// Whether a connection with the same cell and facing is already present.
    pub fn has_connection(&self, connection: &RoomConnection) -> bool {
        self.connections.contains(connection)
    }
}

/// Pick a random cell along the wall facing `direction` of a `width` x `height` room.
pub fn perimeter_point(rng: &mut Prng, width: i32, height: i32, direction: Direction) -> GridPoint {
    match direction {
        Direction::North => GridPoint::new(rng.next_range(0, width), 0),
        Direction::East => GridPoint::new(width - 1, rng.next_range(0, height)),
        Direction::South => GridPoint::new(rng.next_range(0, width), height - 1),
        Direction::West => GridPoint::new(0, rng.next_range(0, height)),
    }
}
