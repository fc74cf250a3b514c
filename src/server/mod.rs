//! Server core functionality
//!
//! This module contains the event loop, the game server state it drives,
//! and the broadcast helpers shared by every handler.

pub mod announce;
pub mod core;
pub mod state;

pub use self::core::{ConnectionEvent, Server};
pub use state::ServerState;
