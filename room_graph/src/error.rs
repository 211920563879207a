//! Error type for graph editing and persistence.

use thiserror::Error;

use crate::entities::{ConnectionId, NodeId, NodeKind, PinId, PropertyId, PropertyKind};

/// Errors raised while editing the room graph or loading/saving projects.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    #[error("pin {0} is not owned by any node in the graph")]
    UnknownPin(PinId),

    #[error("connection {0} is not in the graph")]
    UnknownConnection(ConnectionId),

    #[error("connection {0} is already bound")]
    ConnectionAlreadyBound(ConnectionId),

    #[error("unknown node type {0}")]
    UnknownNodeKind(u8),

    #[error("unknown pin direction {0}")]
    UnknownPinDirection(u8),

    #[error("unknown draw mode {0}")]
    UnknownDrawMode(u8),

    #[error("unknown property id {0}")]
    UnknownProperty(u8),

    #[error("{kind:?} nodes do not expose property {property:?}")]
    PropertyNotExposed { kind: NodeKind, property: PropertyId },

    #[error("property {property:?} expects a {expected:?} value")]
    PropertyMismatch {
        property: PropertyId,
        expected: PropertyKind,
    },

    #[error("invalid size range {min}..={max}")]
    InvalidRange { min: i32, max: i32 },

    #[error("{0:?} nodes cannot take additional pins")]
    PinsLocked(NodeKind),

    #[error("malformed project data: {0}")]
    Persistence(#[from] serde_json::Error),

    #[error("project storage failed: {0}")]
    Storage(String),
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
