//! Editable node properties.
//!
//! Each node kind exposes an ordered table of [`PropertyBinding`]s. The property panel reads
//! [`PropertyDescriptor`]s built from the table and sends one back when the user edits it;
//! the update is dispatched by its stable [`PropertyId`] to the binding's setter.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Room;
use crate::error::GraphError;
use crate::rng::generate_seed;

/// Stable identifier of a node property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PropertyId {
    Seed,
    GenerateSeed,
    Title,
    RoomHeight,
    RoomWidth,
    IsStart,
}

impl From<PropertyId> for u8 {
    fn from(id: PropertyId) -> Self {
        match id {
            PropertyId::Seed => 0,
            PropertyId::GenerateSeed => 1,
            PropertyId::Title => 2,
            PropertyId::RoomHeight => 3,
            PropertyId::RoomWidth => 4,
            PropertyId::IsStart => 5,
        }
    }
}

impl TryFrom<u8> for PropertyId {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PropertyId::Seed),
            1 => Ok(PropertyId::GenerateSeed),
            2 => Ok(PropertyId::Title),
            3 => Ok(PropertyId::RoomHeight),
            4 => Ok(PropertyId::RoomWidth),
            5 => Ok(PropertyId::IsStart),
            other => Err(GraphError::UnknownProperty(other)),
        }
    }
}

/// The editor widget a property is shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    String,
    Boolean,
    Integer,
    Range,
    Text,
    Action,
}

/// Current (or updated) value of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PropertyValue {
    String(String),
    Boolean(bool),
    Integer(i32),
    /// Two fields bound by one widget, applied together.
    Range { min: i32, max: i32 },
    /// Multi-line text.
    Text(String),
    /// A button; applying it runs the action.
    Action,
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Range { .. } => PropertyKind::Range,
            PropertyValue::Text(_) => PropertyKind::Text,
            PropertyValue::Action => PropertyKind::Action,
        }
    }
}

/// A property as presented to (and returned from) the property panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub id: PropertyId,
    pub label: String,
    pub value: PropertyValue,
}

impl PropertyDescriptor {
    pub fn new(id: PropertyId, label: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            id,
            label: label.into(),
            value,
        }
    }
}

/// One row of a kind's property table.
pub struct PropertyBinding {
    pub id: PropertyId,
    pub label: &'static str,
    pub kind: PropertyKind,
    get: fn(&Room) -> PropertyValue,
    set: fn(&mut Room, PropertyValue) -> Result<(), GraphError>,
}

impl fmt::Debug for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl PropertyBinding {
    /// Describe the current value of this property on `room`.
    pub fn describe(&self, room: &Room) -> PropertyDescriptor {
        PropertyDescriptor::new(self.id, self.label, (self.get)(room))
    }

    /// Apply `value`, rejecting values of the wrong kind.
    pub fn apply(&self, room: &mut Room, value: PropertyValue) -> Result<(), GraphError> {
        if value.kind() != self.kind {
            return Err(GraphError::PropertyMismatch {
                property: self.id,
                expected: self.kind,
            });
        }
        (self.set)(room, value)
    }
}

fn mismatch(property: PropertyId, expected: PropertyKind) -> GraphError {
    GraphError::PropertyMismatch { property, expected }
}

const SEED: PropertyBinding = PropertyBinding {
    id: PropertyId::Seed,
    label: "Seed",
    kind: PropertyKind::Text,
    get: |room| PropertyValue::Text(room.seed().to_string()),
    set: |room, value| match value {
        PropertyValue::Text(seed) => {
            room.set_seed(seed);
            Ok(())
        }
        _ => Err(mismatch(PropertyId::Seed, PropertyKind::Text)),
    },
};

const GENERATE_SEED: PropertyBinding = PropertyBinding {
    id: PropertyId::GenerateSeed,
    label: "Generate new seed",
    kind: PropertyKind::Action,
    get: |_| PropertyValue::Action,
    set: |room, value| match value {
        PropertyValue::Action => {
            room.set_seed(generate_seed());
            Ok(())
        }
        _ => Err(mismatch(PropertyId::GenerateSeed, PropertyKind::Action)),
    },
};

const TITLE: PropertyBinding = PropertyBinding {
    id: PropertyId::Title,
    label: "Title",
    kind: PropertyKind::String,
    get: |room| PropertyValue::String(room.title.clone()),
    set: |room, value| match value {
        PropertyValue::String(title) => {
            room.title = title;
            Ok(())
        }
        _ => Err(mismatch(PropertyId::Title, PropertyKind::String)),
    },
};

const ROOM_HEIGHT: PropertyBinding = PropertyBinding {
    id: PropertyId::RoomHeight,
    label: "Room Height",
    kind: PropertyKind::Range,
    get: |room| PropertyValue::Range {
        min: room.sizing().min_height,
        max: room.sizing().max_height,
    },
    set: |room, value| match value {
        PropertyValue::Range { min, max } => {
            let mut sizing = room.sizing();
            sizing.min_height = min;
            sizing.max_height = max;
            room.set_sizing(sizing)
        }
        _ => Err(mismatch(PropertyId::RoomHeight, PropertyKind::Range)),
    },
};

const ROOM_WIDTH: PropertyBinding = PropertyBinding {
    id: PropertyId::RoomWidth,
    label: "Room Width",
    kind: PropertyKind::Range,
    get: |room| PropertyValue::Range {
        min: room.sizing().min_width,
        max: room.sizing().max_width,
    },
    set: |room, value| match value {
        PropertyValue::Range { min, max } => {
            let mut sizing = room.sizing();
            sizing.min_width = min;
            sizing.max_width = max;
            room.set_sizing(sizing)
        }
        _ => Err(mismatch(PropertyId::RoomWidth, PropertyKind::Range)),
    },
};

const IS_START: PropertyBinding = PropertyBinding {
    id: PropertyId::IsStart,
    label: "Is Start?",
    kind: PropertyKind::Boolean,
    get: |room| PropertyValue::Boolean(room.is_start),
    set: |room, value| match value {
        PropertyValue::Boolean(is_start) => {
            room.is_start = is_start;
            Ok(())
        }
        _ => Err(mismatch(PropertyId::IsStart, PropertyKind::Boolean)),
    },
};

/// Properties of every sized room kind.
pub const ROOM_PROPERTIES: &[PropertyBinding] =
    &[SEED, GENERATE_SEED, TITLE, ROOM_HEIGHT, ROOM_WIDTH, IS_START];

/// Entry nodes have no size to edit.
pub const ENTRY_PROPERTIES: &[PropertyBinding] = &[SEED, GENERATE_SEED, TITLE, IS_START];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NodeKind;
    use crate::geometry::Position;

    #[test]
    fn test_setters_reject_wrong_value_kind() {
        let mut room = Room::new(NodeKind::Room, Position::default()).with_seed("setter");
        let before = room.clone();
        for binding in ROOM_PROPERTIES {
            let wrong = match binding.kind {
                PropertyKind::Integer => PropertyValue::Text("x".into()),
                _ => PropertyValue::Integer(7),
            };
            let err = (binding.set)(&mut room, wrong).unwrap_err();
            assert!(matches!(
                err,
                GraphError::PropertyMismatch { property, expected }
                    if property == binding.id && expected == binding.kind
            ));
        }
        assert_eq!(room, before);
    }

    #[test]
    fn test_property_id_codes() {
        assert_eq!(u8::from(PropertyId::RoomWidth), 4);
        assert_eq!(PropertyId::try_from(5).unwrap(), PropertyId::IsStart);
        assert!(matches!(
            PropertyId::try_from(9),
            Err(GraphError::UnknownProperty(9))
        ));
    }

    #[test]
    fn test_tables_are_ordered() {
        let ids: Vec<_> = ROOM_PROPERTIES.iter().map(|b| b.id).collect();
        assert_eq!(
            ids,
            vec![
                PropertyId::Seed,
                PropertyId::GenerateSeed,
                PropertyId::Title,
                PropertyId::RoomHeight,
                PropertyId::RoomWidth,
                PropertyId::IsStart,
            ]
        );
        assert!(ENTRY_PROPERTIES
            .iter()
            .all(|b| b.kind != PropertyKind::Range));
    }

    #[test]
    fn test_descriptor_json_shape() {
        let descriptor = PropertyDescriptor::new(
            PropertyId::RoomHeight,
            "Room Height",
            PropertyValue::Range { min: 1, max: 3 },
        );
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["value"]["type"], "Range");
        assert_eq!(json["value"]["data"]["min"], 1);

        let back: PropertyDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, descriptor);
    }
}
