//! Client management system
//!
//! Handles connection records, their outbound links, and the registry of
//! pending and active players.

pub mod registry;
pub mod state;

pub use registry::ClientRegistry;
pub use state::{Collection, Connection, ConnectionId, Link, OUTBOUND_QUEUE};
