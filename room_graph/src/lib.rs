//! # Room Graph
//!
//! The designer-facing data model: rooms (graph nodes) with typed pins, directed connections
//! between pins, and the [`GraphStore`] that owns them together with the editor selection.
//! Rooms derive their grid footprint from their own seed through the deterministic [`Prng`].
//!
//! This crate is the single source of truth for the graph. Layout generation lives in
//! `dungeon_gen`, which only reads a [`GraphStore`].

pub mod entities;
pub mod error;
pub mod geometry;
pub mod graph_store;
pub mod layout;
pub mod listen;
pub mod notification;
pub mod records;
pub mod rng;

pub use entities::*;
pub use error::{GraphError, Result};
pub use geometry::*;
pub use graph_store::*;
pub use layout::*;
pub use listen::{DirtyFlag, Listener, ListenerId, Notifier, Sink};
pub use notification::*;
pub use records::*;
pub use rng::*;
