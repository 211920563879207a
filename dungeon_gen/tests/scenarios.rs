//! End-to-end generation scenarios.

use dungeon_gen::{DungeonGenerator, DungeonLayout, DungeonSession, GenerationWarning};
use room_graph::{
    Connection, GraphStore, GridPoint, NodeKind, PinDirection, PinId, Position, ProjectRecord,
    Room, RoomSizing, Selectable, Severity, Sink,
};

fn pin(room: &Room, direction: PinDirection) -> PinId {
    room.pins
        .iter()
        .find(|pin| pin.direction == direction)
        .map(|pin| pin.id)
        .unwrap()
}

/// Entry node bound to one default room seeded "room1".
fn entry_to_room() -> GraphStore {
    let mut store = GraphStore::new();
    let entry = Room::new(NodeKind::Entry, Position::default()).with_seed("entry");
    let room = Room::new(NodeKind::Room, Position::new(200.0, 0.0))
        .with_seed("room1")
        .with_sizing(RoomSizing::new(1, 2, 1, 2))
        .unwrap();
    let connection = Connection::between(pin(&entry, PinDirection::Out), pin(&room, PinDirection::In));
    store.add_node(entry);
    store.add_node(room);
    store.add(connection).unwrap();
    store
}

/// Layout without node identities, for comparing separately built graphs.
fn shape(layout: &DungeonLayout) -> Vec<(NodeKind, GridPoint, i32, i32, usize)> {
    layout
        .tiles
        .iter()
        .map(|tile| {
            (
                tile.kind,
                tile.position,
                tile.footprint.width,
                tile.footprint.height,
                tile.footprint.connections.len(),
            )
        })
        .collect()
}

#[test]
fn test_scenario_entry_to_single_room() {
    let store = entry_to_room();
    let generator = DungeonGenerator::with_defaults();

    let layout = generator.generate(&store, "abc");
    assert!(layout.len() >= 2);
    assert!(layout.len() <= 4);
    assert_eq!(layout.tiles[0].position, GridPoint::ORIGIN);
    assert_eq!(layout.tiles[0].kind, NodeKind::Entry);
    assert!(layout.tiles[1..].iter().all(|tile| tile.is_corridor()));
    assert!(layout.warnings.is_empty());

    let again = generator.generate(&store, "abc");
    assert_eq!(
        serde_json::to_string(&layout).unwrap(),
        serde_json::to_string(&again).unwrap()
    );
}

#[test]
fn test_scenario_no_start_node() {
    let mut store = GraphStore::new();
    let a = Room::new(NodeKind::Room, Position::default());
    let b = Room::new(NodeKind::Boss, Position::default());
    let connection = Connection::between(pin(&a, PinDirection::Out), pin(&b, PinDirection::In));
    store.add_node(a);
    store.add_node(b);
    store.add(connection).unwrap();

    let generator = DungeonGenerator::with_defaults();
    let sink = Sink::new();
    generator.listen(sink.listener());

    let layout = generator.generate(&store, "abc");
    assert!(layout.is_empty());
    assert_eq!(layout.warnings, vec![GenerationWarning::NoStartNode]);
    let notifications = sink.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Warn);
}

#[test]
fn test_same_seed_and_graph_give_same_layout() {
    let generator = DungeonGenerator::with_defaults();
    for seed in ["abc", "def", "dungeon-42", ""] {
        let first = generator.generate(&entry_to_room(), seed);
        let second = generator.generate(&entry_to_room(), seed);
        assert_eq!(shape(&first), shape(&second), "seed {seed:?}");
    }
}

#[test]
fn test_layout_survives_project_round_trip() {
    let store = entry_to_room();
    let mut project = ProjectRecord::default();
    project.capture(&store);
    let json = project.to_json().unwrap();

    let mut restored = GraphStore::new();
    ProjectRecord::from_json(&json)
        .unwrap()
        .restore(&mut restored)
        .unwrap();

    let generator = DungeonGenerator::with_defaults();
    assert_eq!(
        generator.generate(&store, &project.seed),
        generator.generate(&restored, &project.seed)
    );
}

#[test]
fn test_flagged_start_node_wins_over_entry() {
    let mut store = entry_to_room();
    let boss = Room::new(NodeKind::Boss, Position::default())
        .with_seed("boss")
        .with_start(true);
    let boss_id = store.add_node(boss);

    let layout = DungeonGenerator::with_defaults().generate(&store, "abc");
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.tiles[0].node, Some(boss_id));
    let footprint = &layout.tiles[0].footprint;
    assert!((3..=5).contains(&footprint.width));
    assert!((3..=5).contains(&footprint.height));
}

#[test]
fn test_session_follows_graph_edits() {
    let mut store = entry_to_room();
    let mut session = DungeonSession::new(DungeonGenerator::with_defaults(), &store, "abc");
    assert!(session.refresh(&store));
    assert!(session.layout().len() >= 2);

    let connection = store.connections()[0].id;
    store.remove(&[Selectable::Connection(connection)]);
    assert!(session.refresh(&store));
    assert_eq!(session.layout().len(), 1);

    let entry = store.find_start_node().map(|node| node.id).unwrap();
    store.remove(&[Selectable::Node(entry)]);
    assert!(session.refresh(&store));
    assert!(session.layout().is_empty());
    assert_eq!(session.layout().warnings, vec![GenerationWarning::NoStartNode]);
}
