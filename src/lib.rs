//! RAX Word Server
//!
//! A multi-player, turn-based word guessing game served over TCP with a
//! CRLF line protocol.

pub mod client;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod server;

pub use config::ServerConfig;
pub use server::Server;
