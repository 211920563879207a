//! Corridor chains.
//!
//! A chain starts at a doorway on a placed tile and consists of straight, one cell wide
//! segments. Each segment travels in the facing of the doorway it leaves from and carries two
//! connections: an entry on the wall facing back where it came from, and an exit facing the
//! next turn. The exit of one segment is the doorway the next segment leaves from.

use room_graph::{Direction, GridPoint, Prng, RoomConnection, RoomFootprint};
use tracing::debug;

use super::placement::PlacedFootprint;
use crate::config::CorridorConfig;

/// Build one segment of `length` cells leaving `from` through its connection `exit`.
///
/// The new segment's own exit faces `turn`.
pub fn corridor_segment(
    from: &PlacedFootprint,
    exit: &RoomConnection,
    turn: Direction,
    length: i32,
) -> PlacedFootprint {
    let travel = exit.direction;
    let cell = from.absolute(exit);
    let last = length - 1;

    let (position, entry_cell, exit_cell) = match travel {
        Direction::North => (
            GridPoint::new(cell.x, cell.y - length),
            GridPoint::new(0, last),
            GridPoint::new(0, 0),
        ),
        Direction::East => (
            GridPoint::new(cell.x + 1, cell.y),
            GridPoint::new(0, 0),
            GridPoint::new(last, 0),
        ),
        Direction::South => (
            GridPoint::new(cell.x, cell.y + 1),
            GridPoint::new(0, 0),
            GridPoint::new(0, last),
        ),
        Direction::West => (
            GridPoint::new(cell.x - length, cell.y),
            GridPoint::new(last, 0),
            GridPoint::new(0, 0),
        ),
    };

    let mut footprint = if travel.is_horizontal() {
        RoomFootprint::new(length, 1)
    } else {
        RoomFootprint::new(1, length)
    };
    footprint
        .connections
        .push(RoomConnection::new(entry_cell, travel.opposite()));
    footprint
        .connections
        .push(RoomConnection::new(exit_cell, turn));

    PlacedFootprint::corridor(position, footprint)
}

/// Grow a chain of segments out of `from` through `doorway`.
///
/// Draws the number of segments from the configured weights, then for every segment its
/// length followed by the direction its exit turns to. A segment never turns straight back.
pub fn grow_corridor(
    rng: &mut Prng,
    config: &CorridorConfig,
    from: &PlacedFootprint,
    doorway: RoomConnection,
) -> Vec<PlacedFootprint> {
    let steps = rng
        .percentage_chance(&config.step_counts, &config.step_weights)
        .unwrap_or(1);
    debug!(steps, ?doorway, "growing corridor");

    let mut segments: Vec<PlacedFootprint> = Vec::with_capacity(steps as usize);
    let mut exit = doorway;

    for _ in 0..steps {
        let length = rng.next_range(config.min_segment_length, config.max_segment_length);
        let turns = exit.direction.turns();
        let turn = rng.choose(&turns).copied().unwrap_or(exit.direction);

        let previous = segments.last().unwrap_or(from);
        let segment = corridor_segment(previous, &exit, turn, length);
        exit = segment.footprint.connections[1];
        segments.push(segment);
    }

    segments
}
