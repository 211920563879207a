//! Node kinds and their fixed per-kind profile.

use serde::{Deserialize, Serialize};

use super::{PinDirection, PropertyBinding, ENTRY_PROPERTIES, ROOM_PROPERTIES};
use crate::error::GraphError;

/// Kinds of graph nodes. `Path` marks corridor segments in generated layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum NodeKind {
    Entry,
    Room,
    Hallway,
    Elite,
    Teleport,
    Boss,
    Path,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Entry,
        NodeKind::Room,
        NodeKind::Hallway,
        NodeKind::Elite,
        NodeKind::Teleport,
        NodeKind::Boss,
        NodeKind::Path,
    ];

    /// Look up the fixed profile for this kind.
    pub fn profile(self) -> &'static KindProfile {
        match self {
            NodeKind::Entry => &ENTRY,
            NodeKind::Room => &DEFAULT_ROOM,
            NodeKind::Hallway => &HALLWAY,
            NodeKind::Elite => &ELITE,
            NodeKind::Teleport => &TELEPORTER,
            NodeKind::Boss => &BOSS,
            NodeKind::Path => &PATH,
        }
    }
}

impl From<NodeKind> for u8 {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Entry => 0,
            NodeKind::Room => 1,
            NodeKind::Hallway => 2,
            NodeKind::Elite => 3,
            NodeKind::Teleport => 4,
            NodeKind::Boss => 5,
            NodeKind::Path => 6,
        }
    }
}

impl TryFrom<u8> for NodeKind {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        NodeKind::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(GraphError::UnknownNodeKind(value))
    }
}

/// Inclusive bounds for a room's generated width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSizing {
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

impl RoomSizing {
    pub const fn new(min_width: i32, max_width: i32, min_height: i32, max_height: i32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// A fixed `width` x `height` size.
    pub const fn fixed(width: i32, height: i32) -> Self {
        Self::new(width, width, height, height)
    }
}

/// Everything that differs between node kinds.
#[derive(Debug)]
pub struct KindProfile {
    pub sizing: RoomSizing,
    pub initial_pins: &'static [PinDirection],
    /// Whether the editor offers an "add pin" button.
    pub can_add_pins: bool,
    pub default_title: &'static str,
    pub properties: &'static [PropertyBinding],
}

const IN_OUT: &[PinDirection] = &[PinDirection::In, PinDirection::Out];

static ENTRY: KindProfile = KindProfile {
    sizing: RoomSizing::fixed(0, 0),
    initial_pins: &[PinDirection::Out],
    can_add_pins: false,
    default_title: "New Entry Node",
    properties: ENTRY_PROPERTIES,
};

static DEFAULT_ROOM: KindProfile = KindProfile {
    sizing: RoomSizing::new(1, 2, 1, 2),
    initial_pins: IN_OUT,
    can_add_pins: true,
    default_title: "New Default Node",
    properties: ROOM_PROPERTIES,
};

static HALLWAY: KindProfile = KindProfile {
    sizing: RoomSizing::new(1, 5, 1, 5),
    initial_pins: IN_OUT,
    can_add_pins: true,
    default_title: "New Hallway Node",
    properties: ROOM_PROPERTIES,
};

static ELITE: KindProfile = KindProfile {
    sizing: RoomSizing::fixed(2, 2),
    initial_pins: IN_OUT,
    can_add_pins: true,
    default_title: "New Elite Node",
    properties: ROOM_PROPERTIES,
};

static TELEPORTER: KindProfile = KindProfile {
    sizing: RoomSizing::fixed(1, 1),
    initial_pins: IN_OUT,
    can_add_pins: true,
    default_title: "New Teleporter Node",
    properties: ROOM_PROPERTIES,
};

static BOSS: KindProfile = KindProfile {
    sizing: RoomSizing::new(3, 5, 3, 5),
    initial_pins: IN_OUT,
    can_add_pins: true,
    default_title: "New Boss Node",
    properties: ROOM_PROPERTIES,
};

static PATH: KindProfile = KindProfile {
    sizing: RoomSizing::fixed(1, 1),
    initial_pins: IN_OUT,
    can_add_pins: false,
    default_title: "New Path Node",
    properties: ROOM_PROPERTIES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::try_from(u8::from(kind)).unwrap(), kind);
        }
        assert!(matches!(
            NodeKind::try_from(42),
            Err(GraphError::UnknownNodeKind(42))
        ));
    }

    #[test]
    fn test_entry_profile() {
        let profile = NodeKind::Entry.profile();
        assert_eq!(profile.sizing, RoomSizing::fixed(0, 0));
        assert_eq!(profile.initial_pins, &[PinDirection::Out]);
        assert!(!profile.can_add_pins);
    }

    #[test]
    fn test_fixed_size_kinds() {
        assert_eq!(NodeKind::Elite.profile().sizing, RoomSizing::fixed(2, 2));
        assert_eq!(NodeKind::Teleport.profile().sizing, RoomSizing::fixed(1, 1));
        assert_eq!(
            NodeKind::Boss.profile().sizing,
            RoomSizing::new(3, 5, 3, 5)
        );
    }
}
