//! Persisted record shapes for projects, nodes, pins and connections.
//!
//! Records are plain serde structs with camelCase field names and integer enum
//! discriminants. [`ProjectRecord::capture`] snapshots a [`GraphStore`];
//! [`ProjectRecord::restore`] rebuilds one.

mod library;

pub use library::*;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{
    Connection, ConnectionId, NodeId, NodeKind, Pin, PinDirection, PinId, PropertyDescriptor,
    PropertyValue, Room,
};
use crate::error::{GraphError, Result};
use crate::geometry::Position;
use crate::graph_store::GraphStore;
use crate::rng::generate_seed;

/// How the dungeon preview renders a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DrawMode {
    #[default]
    Simple,
    Complex,
}

impl From<DrawMode> for u8 {
    fn from(mode: DrawMode) -> Self {
        match mode {
            DrawMode::Simple => 0,
            DrawMode::Complex => 1,
        }
    }
}

impl TryFrom<u8> for DrawMode {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(DrawMode::Simple),
            1 => Ok(DrawMode::Complex),
            other => Err(GraphError::UnknownDrawMode(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRecord {
    pub has_connection: bool,
    /// Owning node.
    pub related_id: NodeId,
    #[serde(rename = "type")]
    pub direction: PinDirection,
    pub id: PinId,
}

impl From<&Pin> for PinRecord {
    fn from(pin: &Pin) -> Self {
        Self {
            has_connection: pin.has_connection,
            related_id: pin.owner,
            direction: pin.direction,
            id: pin.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub position: Position,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: NodeId,
    pub title: String,
    pub pins: Vec<PinRecord>,
    pub seed: String,
    pub properties: Vec<PropertyDescriptor>,
}

impl From<&Room> for NodeRecord {
    fn from(room: &Room) -> Self {
        Self {
            position: room.position,
            kind: room.kind,
            id: room.id,
            title: room.title.clone(),
            pins: room.pins.iter().map(PinRecord::from).collect(),
            seed: room.seed().to_string(),
            properties: room.properties(),
        }
    }
}

impl NodeRecord {
    /// Rebuild the node.
    ///
    /// Pins keep their recorded IDs but start unconnected; the store marks them again as
    /// connections are restored. Action properties are not replayed.
    pub fn to_room(&self) -> Result<Room> {
        let mut room = Room::new(self.kind, self.position)
            .with_id(self.id)
            .with_seed(self.seed.clone())
            .with_title(self.title.clone());

        for property in &self.properties {
            if property.value == PropertyValue::Action {
                continue;
            }
            room.apply_property(property.clone())?;
        }

        room.pins = self
            .pins
            .iter()
            .map(|pin| Pin::new(self.id, pin.direction).with_id(pin.id))
            .collect();
        Ok(room)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub from: PinId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<PinId>,
    pub id: ConnectionId,
}

impl From<&Connection> for ConnectionRecord {
    fn from(connection: &Connection) -> Self {
        Self {
            from: connection.from(),
            to: connection.to(),
            id: connection.id,
        }
    }
}

/// A saved project: the graph plus the dungeon seed and preview mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub name: String,
    pub id: Uuid,
    pub seed: String,
    pub draw_mode: DrawMode,
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl Default for ProjectRecord {
    fn default() -> Self {
        Self {
            name: "New Project".to_string(),
            id: Uuid::new_v4(),
            seed: generate_seed(),
            draw_mode: DrawMode::Simple,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }
}

impl ProjectRecord {
    /// Replace the recorded graph with the current contents of `store`.
    pub fn capture(&mut self, store: &GraphStore) {
        self.nodes = store.nodes().iter().map(NodeRecord::from).collect();
        self.connections = store
            .connections()
            .iter()
            .map(ConnectionRecord::from)
            .collect();
    }

    /// Clear `store` and load this project's graph into it.
    ///
    /// Connections are only restored when both endpoints resolve to restored pins; pending or
    /// dangling records are dropped.
    pub fn restore(&self, store: &mut GraphStore) -> Result<()> {
        let rooms = self
            .nodes
            .iter()
            .map(NodeRecord::to_room)
            .collect::<Result<Vec<_>>>()?;

        store.clear();
        for room in rooms {
            store.add_node(room);
        }

        for record in &self.connections {
            let Some(to) = record.to else {
                debug!(connection = %record.id, "skipping pending connection record");
                continue;
            };
            if store.pin(record.from).is_none() || store.pin(to).is_none() {
                debug!(connection = %record.id, "skipping dangling connection record");
                continue;
            }
            store.add(Connection::between(record.from, to).with_id(record.id))?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PropertyId, RoomSizing};

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        let entry = Room::new(NodeKind::Entry, Position::new(5.0, 10.0))
            .with_seed("entry")
            .with_start(true);
        let room = Room::new(NodeKind::Hallway, Position::new(200.0, 10.0))
            .with_seed("hall")
            .with_title("Long Hall")
            .with_sizing(RoomSizing::new(2, 4, 1, 1))
            .unwrap();
        let from = entry.pins[0].id;
        let to = room.pins[0].id;
        store.add_node(entry);
        store.add_node(room);
        store.add(Connection::between(from, to)).unwrap();
        store
    }

    #[test]
    fn test_record_field_names() {
        let store = sample_store();
        let mut project = ProjectRecord::default();
        project.capture(&store);

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["name"], "New Project");
        assert_eq!(json["drawMode"], 0);
        assert_eq!(json["nodes"][0]["type"], 0);
        assert_eq!(json["nodes"][1]["type"], 2);
        assert_eq!(json["nodes"][1]["title"], "Long Hall");
        assert_eq!(json["nodes"][0]["pins"][0]["type"], 1);
        assert_eq!(json["nodes"][0]["pins"][0]["hasConnection"], true);
        assert_eq!(
            json["nodes"][0]["pins"][0]["relatedId"],
            json["nodes"][0]["id"]
        );
        assert!(json["connections"][0]["to"].is_string());
    }

    #[test]
    fn test_pending_connection_omits_to() {
        let record = ConnectionRecord::from(&Connection::create(PinId::new()));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("to").is_none());

        let back: ConnectionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.to, None);
    }

    #[test]
    fn test_capture_then_restore() {
        let original = sample_store();
        let mut project = ProjectRecord::default();
        project.capture(&original);

        let json = project.to_json().unwrap();
        let loaded = ProjectRecord::from_json(&json).unwrap();
        let mut restored = GraphStore::new();
        loaded.restore(&mut restored).unwrap();

        assert_eq!(restored.nodes().len(), 2);
        assert_eq!(restored.connections().len(), 1);
        for (a, b) in original.nodes().iter().zip(restored.nodes()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.title, b.title);
            assert_eq!(a.seed(), b.seed());
            assert_eq!(a.sizing(), b.sizing());
            assert_eq!(a.is_start, b.is_start);
            assert_eq!(a.footprint(), b.footprint());
            let pins: Vec<_> = a.pins.iter().map(PinRecord::from).collect();
            let restored_pins: Vec<_> = b.pins.iter().map(PinRecord::from).collect();
            assert_eq!(pins, restored_pins);
        }
        assert_eq!(original.connections()[0].id, restored.connections()[0].id);
    }

    #[test]
    fn test_restore_skips_dangling_and_pending_records() {
        let store = sample_store();
        let mut project = ProjectRecord::default();
        project.capture(&store);
        project.connections.push(ConnectionRecord {
            from: PinId::new(),
            to: Some(PinId::new()),
            id: ConnectionId::new(),
        });
        project.connections.push(ConnectionRecord {
            from: project.connections[0].from,
            to: None,
            id: ConnectionId::new(),
        });

        let mut restored = GraphStore::new();
        project.restore(&mut restored).unwrap();
        assert_eq!(restored.connections().len(), 1);
    }

    #[test]
    fn test_restore_replaces_existing_graph() {
        let mut store = sample_store();
        let project = ProjectRecord::default();
        project.restore(&mut store).unwrap();
        assert!(store.nodes().is_empty());
        assert!(store.connections().is_empty());
    }

    #[test]
    fn test_restore_rejects_bad_property() {
        let mut project = ProjectRecord::default();
        let entry = Room::new(NodeKind::Entry, Position::default());
        let mut record = NodeRecord::from(&entry);
        record.properties.push(PropertyDescriptor::new(
            PropertyId::RoomWidth,
            "Room Width",
            PropertyValue::Range { min: 1, max: 2 },
        ));
        project.nodes.push(record);

        let mut store = GraphStore::new();
        assert!(matches!(
            project.restore(&mut store),
            Err(GraphError::PropertyNotExposed { .. })
        ));
    }

    #[test]
    fn test_unknown_discriminants_fail_to_load() {
        let json = r#"{"name":"p","id":"00000000-0000-0000-0000-000000000000","seed":"s","drawMode":7,"nodes":[],"connections":[]}"#;
        assert!(matches!(
            ProjectRecord::from_json(json),
            Err(GraphError::Persistence(_))
        ));
    }
}
