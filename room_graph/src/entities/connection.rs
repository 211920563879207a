//! Connections (directed edges) between pins.

use serde::{Deserialize, Serialize};

use super::{ConnectionId, PinId};
use crate::error::GraphError;

/// Lifecycle of a connection still in the graph. Removal drops it from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Dragged out from a pin, no target yet.
    Pending,
    /// Linked to a target pin. Terminal.
    Bound { to: PinId },
}

/// A directed edge from one pin to another.
///
/// The connection does not check pin directions or owners; the editor decides which
/// targets are legal before binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    from: PinId,
    state: ConnectionState,
}

impl Connection {
    /// Start a pending connection from `from`.
    pub fn create(from: PinId) -> Self {
        Self {
            id: ConnectionId::new(),
            from,
            state: ConnectionState::Pending,
        }
    }

    /// Create an already bound connection.
    pub fn between(from: PinId, to: PinId) -> Self {
        Self {
            id: ConnectionId::new(),
            from,
            state: ConnectionState::Bound { to },
        }
    }

    pub fn with_id(mut self, id: ConnectionId) -> Self {
        self.id = id;
        self
    }

    /// Attach the target pin.
    pub fn bind(&mut self, to: PinId) -> Result<(), GraphError> {
        match self.state {
            ConnectionState::Pending => {
                self.state = ConnectionState::Bound { to };
                Ok(())
            }
            ConnectionState::Bound { .. } => Err(GraphError::ConnectionAlreadyBound(self.id)),
        }
    }

    pub fn from(&self) -> PinId {
        self.from
    }

    pub fn to(&self) -> Option<PinId> {
        match self.state {
            ConnectionState::Pending => None,
            ConnectionState::Bound { to } => Some(to),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, ConnectionState::Bound { .. })
    }

    /// Every pin this connection references.
    pub fn endpoints(&self) -> impl Iterator<Item = PinId> {
        std::iter::once(self.from).chain(self.to())
    }

    /// Check if this connection references `pin`.
    pub fn touches(&self, pin: PinId) -> bool {
        self.endpoints().any(|endpoint| endpoint == pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_then_bound() {
        let from = PinId::new();
        let to = PinId::new();
        let mut connection = Connection::create(from);

        assert_eq!(connection.state(), ConnectionState::Pending);
        assert!(connection.to().is_none());
        assert_eq!(connection.endpoints().count(), 1);

        connection.bind(to).unwrap();
        assert!(connection.is_bound());
        assert_eq!(connection.to(), Some(to));
        assert!(connection.touches(from));
        assert!(connection.touches(to));
    }

    #[test]
    fn test_bound_is_terminal() {
        let mut connection = Connection::between(PinId::new(), PinId::new());
        let err = connection.bind(PinId::new()).unwrap_err();
        assert!(matches!(err, GraphError::ConnectionAlreadyBound(id) if id == connection.id));
    }

    #[test]
    fn test_no_validation_of_targets() {
        let pin = PinId::new();
        let mut connection = Connection::create(pin);
        // Self-loops are the caller's business
        assert!(connection.bind(pin).is_ok());
    }
}
