//! # Dungeon Gen
//!
//! Turns a `room_graph` [`GraphStore`](room_graph::GraphStore) into a 2D dungeon layout: the
//! start room's footprint at the origin plus a corridor chain for each of its connections.
//!
//! ## Core Components
//!
//! - **generator**: Deterministic placement of footprints and corridor chains
//! - **config**: TOML configuration for corridor shapes
//! - **session**: Re-runs generation when the graph or the dungeon seed changes
//!
//! Identical seeds and an identical graph always produce an identical layout.

pub mod config;
pub mod generator;
pub mod session;

pub use config::*;
pub use generator::*;
pub use session::*;
