//! Graph store - sole owner of the room graph and the editor selection.
//!
//! Every mutation batch ends with one [`GraphEvent::Changed`] sent to the store's listeners.
//! The store keeps the graph referentially sound: a connection only ever references pins of
//! nodes that are present, and removing a node removes every connection touching it.

mod marquee;

pub use marquee::*;

use std::collections::HashSet;
use tracing::debug;

use crate::entities::{
    Connection, ConnectionId, NodeId, NodeKind, Pin, PinDirection, PinId, PropertyDescriptor,
    Room, Selectable,
};
use crate::error::{GraphError, Result};
use crate::geometry::{Bounds, Position};
use crate::listen::{Listener, ListenerId, Notifier};

/// Messages sent by the store to its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    /// Nodes, connections or generation-relevant properties changed.
    Changed,
    /// Exactly one node is selected; drives the property panel.
    NodeSelected(NodeId),
    /// Selection no longer focuses a single node.
    SelectionCleared,
}

/// Something that can be added to the store.
#[derive(Debug, Clone)]
pub enum GraphItem {
    Node(Room),
    Connection(Connection),
}

impl From<Room> for GraphItem {
    fn from(room: Room) -> Self {
        GraphItem::Node(room)
    }
}

impl From<Connection> for GraphItem {
    fn from(connection: Connection) -> Self {
        GraphItem::Connection(connection)
    }
}

/// Owner of all nodes, connections and the selection.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Room>,
    connections: Vec<Connection>,
    selection: Vec<Selectable>,
    notifier: Notifier<GraphEvent>,
}

impl GraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to store events.
    pub fn listen<L: Listener<GraphEvent> + 'static>(&self, listener: L) -> ListenerId {
        self.notifier.listen(listener)
    }

    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.notifier.unlisten(id)
    }

    pub fn listener_count(&self) -> usize {
        self.notifier.count()
    }

    // ----- queries -----

    pub fn nodes(&self) -> &[Room] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: NodeId) -> Option<&Room> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == id)
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.nodes.iter().find_map(|node| node.pin(id))
    }

    /// The node owning pin `id`.
    pub fn pin_owner(&self, id: PinId) -> Option<&Room> {
        self.nodes.iter().find(|node| node.owns_pin(id))
    }

    /// Connections leaving `node`, in connection-list order.
    pub fn outgoing_connections(&self, node: NodeId) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.iter().filter(move |connection| {
            self.pin_owner(connection.from())
                .is_some_and(|owner| owner.id == node)
        })
    }

    /// Bound connections arriving at `node`, in connection-list order.
    pub fn incoming_connections(&self, node: NodeId) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.iter().filter(move |connection| {
            connection
                .to()
                .and_then(|to| self.pin_owner(to))
                .is_some_and(|owner| owner.id == node)
        })
    }

    /// The designated start node: the first flagged `is_start`, else the first Entry node.
    pub fn find_start_node(&self) -> Option<&Room> {
        self.nodes
            .iter()
            .find(|node| node.is_start)
            .or_else(|| self.nodes.iter().find(|node| node.kind == NodeKind::Entry))
    }

    pub fn selection(&self) -> &[Selectable] {
        &self.selection
    }

    pub fn is_selected(&self, item: Selectable) -> bool {
        self.selection.contains(&item)
    }

    fn contains(&self, item: Selectable) -> bool {
        match item {
            Selectable::Node(id) => self.node(id).is_some(),
            Selectable::Connection(id) => self.connection(id).is_some(),
        }
    }

    // ----- mutation -----

    /// Add a node or connection and notify listeners.
    ///
    /// A connection must only reference pins of nodes already in the store.
    pub fn add(&mut self, item: impl Into<GraphItem>) -> Result<Selectable> {
        let added = match item.into() {
            GraphItem::Node(room) => Selectable::Node(self.insert_node(room)),
            GraphItem::Connection(connection) => {
                for pin in connection.endpoints() {
                    if self.pin(pin).is_none() {
                        return Err(GraphError::UnknownPin(pin));
                    }
                }
                let id = connection.id;
                let target = connection.to();
                debug!(connection = %id, "adding connection");
                self.mark_pins(connection.endpoints());
                self.connections.push(connection);
                if let Some(to) = target {
                    self.refresh_owner_footprint(to);
                }
                Selectable::Connection(id)
            }
        };
        self.notifier.notify(&GraphEvent::Changed);
        Ok(added)
    }

    /// Add a node, returning its ID.
    pub fn add_node(&mut self, room: Room) -> NodeId {
        let id = self.insert_node(room);
        self.notifier.notify(&GraphEvent::Changed);
        id
    }

    fn insert_node(&mut self, room: Room) -> NodeId {
        let id = room.id;
        debug!(node = %id, kind = ?room.kind, "adding node");
        self.nodes.push(room);
        self.refresh_footprint(id);
        id
    }

    /// Bind a pending connection to `to`.
    ///
    /// Direction and ownership rules are the editor's business and are not checked here.
    pub fn bind(&mut self, connection: ConnectionId, to: PinId) -> Result<()> {
        if self.pin(to).is_none() {
            return Err(GraphError::UnknownPin(to));
        }
        let entry = self
            .connections
            .iter_mut()
            .find(|candidate| candidate.id == connection)
            .ok_or(GraphError::UnknownConnection(connection))?;
        entry.bind(to)?;
        let from = entry.from();

        self.mark_pins([from, to]);
        self.refresh_owner_footprint(to);
        self.notifier.notify(&GraphEvent::Changed);
        Ok(())
    }

    /// Add a pin to a node.
    pub fn add_pin(&mut self, node: NodeId, direction: PinDirection) -> Result<PinId> {
        let room = self
            .nodes
            .iter_mut()
            .find(|room| room.id == node)
            .ok_or(GraphError::UnknownNode(node))?;
        let pin = room.add_pin(direction)?;
        self.notifier.notify(&GraphEvent::Changed);
        Ok(pin)
    }

    /// Apply a property edit from the property panel.
    pub fn update_property(&mut self, node: NodeId, update: PropertyDescriptor) -> Result<()> {
        let room = self
            .nodes
            .iter_mut()
            .find(|room| room.id == node)
            .ok_or(GraphError::UnknownNode(node))?;
        room.apply_property(update)?;
        self.refresh_footprint(node);
        self.notifier.notify(&GraphEvent::Changed);
        Ok(())
    }

    /// Move a node in the editor. Layout is unaffected, so no change is announced.
    pub fn move_node(&mut self, node: NodeId, position: Position) -> Result<()> {
        let room = self
            .nodes
            .iter_mut()
            .find(|room| room.id == node)
            .ok_or(GraphError::UnknownNode(node))?;
        room.position = position;
        Ok(())
    }

    /// Record where the renderer drew a pin.
    pub fn set_pin_hitbox(&mut self, pin: PinId, hitbox: Bounds) -> Result<()> {
        let pin = self
            .nodes
            .iter_mut()
            .find_map(|room| room.pin_mut(pin))
            .ok_or(GraphError::UnknownPin(pin))?;
        pin.hitbox = hitbox;
        Ok(())
    }

    /// Remove nodes and connections.
    ///
    /// Removing a node cascades to every connection touching any of its pins. Afterwards any
    /// connection whose endpoints no longer resolve to a live node is pruned, pin flags are
    /// recomputed, and the selection is cleared. Listeners hear one `Changed` at the end.
    pub fn remove(&mut self, items: &[Selectable]) {
        let mut touched: Vec<PinId> = Vec::new();

        for item in items {
            match *item {
                Selectable::Node(id) => {
                    let Some(index) = self.nodes.iter().position(|node| node.id == id) else {
                        continue;
                    };
                    let room = self.nodes.remove(index);
                    let pins: HashSet<PinId> = room.pins.iter().map(|pin| pin.id).collect();
                    self.connections.retain(|connection| {
                        let doomed = connection.endpoints().any(|pin| pins.contains(&pin));
                        if doomed {
                            touched.extend(connection.endpoints());
                        }
                        !doomed
                    });
                    debug!(node = %id, "removed node");
                }
                Selectable::Connection(id) => {
                    if let Some(index) = self.connections.iter().position(|c| c.id == id) {
                        let connection = self.connections.remove(index);
                        touched.extend(connection.endpoints());
                        debug!(connection = %id, "removed connection");
                    }
                }
            }
        }

        self.prune_dangling_connections(&mut touched);
        self.refresh_pin_flags(&touched);
        self.refresh_all_footprints();

        self.selection.clear();
        self.notifier.notify(&GraphEvent::SelectionCleared);
        self.notifier.notify(&GraphEvent::Changed);
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        let items: Vec<Selectable> = self
            .nodes
            .iter()
            .map(|node| Selectable::Node(node.id))
            .chain(self.connections.iter().map(|c| Selectable::Connection(c.id)))
            .collect();
        self.remove(&items);
    }

    // ----- selection -----

    /// Replace the selection. Items not in the store are ignored.
    pub fn select(&mut self, items: &[Selectable]) {
        self.selection.clear();
        for item in items {
            if self.contains(*item) && !self.selection.contains(item) {
                self.selection.push(*item);
            }
        }
        if let [Selectable::Node(id)] = self.selection.as_slice() {
            self.notifier.notify(&GraphEvent::NodeSelected(*id));
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.notifier.notify(&GraphEvent::SelectionCleared);
    }

    pub fn select_all(&mut self) {
        self.selection = self
            .nodes
            .iter()
            .map(|node| Selectable::Node(node.id))
            .chain(self.connections.iter().map(|c| Selectable::Connection(c.id)))
            .collect();
        self.notifier.notify(&GraphEvent::SelectionCleared);
    }

    /// Editor bounds of every selectable item. Pending connections have no extent.
    pub fn selectable_bounds(&self) -> Vec<(Selectable, Bounds)> {
        let nodes = self
            .nodes
            .iter()
            .map(|node| (Selectable::Node(node.id), node.editor_bounds()));
        let connections = self.connections.iter().filter_map(|connection| {
            let from = self.pin(connection.from())?.hitbox.center();
            let to = self.pin(connection.to()?)?.hitbox.center();
            Some((
                Selectable::Connection(connection.id),
                Bounds::from_corners(from, to),
            ))
        });
        nodes.chain(connections).collect()
    }

    /// Select everything overlapping the dragged rectangle and return it.
    pub fn marquee_select(&mut self, top_left: Position, bottom_right: Position) -> Vec<Selectable> {
        let hits = items_in_rectangle(self.selectable_bounds(), top_left, bottom_right);
        self.select(&hits);
        hits
    }

    // ----- bookkeeping -----

    fn mark_pins(&mut self, pins: impl IntoIterator<Item = PinId>) {
        for id in pins {
            if let Some(pin) = self.nodes.iter_mut().find_map(|room| room.pin_mut(id)) {
                pin.has_connection = true;
            }
        }
    }

    /// Recompute `has_connection` for each of `pins` from the remaining connections.
    fn refresh_pin_flags(&mut self, pins: &[PinId]) {
        for id in pins {
            let referenced = self.connections.iter().any(|c| c.touches(*id));
            if let Some(pin) = self.nodes.iter_mut().find_map(|room| room.pin_mut(*id)) {
                pin.has_connection = referenced;
            }
        }
    }

    fn prune_dangling_connections(&mut self, touched: &mut Vec<PinId>) {
        let live: HashSet<PinId> = self
            .nodes
            .iter()
            .flat_map(|node| node.pins.iter().map(|pin| pin.id))
            .collect();
        self.connections.retain(|connection| {
            let intact = connection.endpoints().all(|pin| live.contains(&pin));
            if !intact {
                debug!(connection = %connection.id, "pruned dangling connection");
                touched.extend(connection.endpoints());
            }
            intact
        });
    }

    fn refresh_footprint(&mut self, node: NodeId) {
        let incoming = self.incoming_connections(node).count();
        if let Some(room) = self.nodes.iter_mut().find(|room| room.id == node) {
            room.regenerate_footprint(incoming);
        }
    }

    fn refresh_owner_footprint(&mut self, pin: PinId) {
        if let Some(owner) = self.pin_owner(pin).map(|room| room.id) {
            self.refresh_footprint(owner);
        }
    }

    fn refresh_all_footprints(&mut self) {
        let ids: Vec<NodeId> = self.nodes.iter().map(|node| node.id).collect();
        for id in ids {
            self.refresh_footprint(id);
        }
    }
}
