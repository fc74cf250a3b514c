//! Error types
//!
//! Defines domain-specific error types for each module of the word server.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::client::{Collection, ConnectionId};

/// Dictionary loading errors
#[derive(Debug)]
pub enum DictionaryError {
    Io(PathBuf, io::Error),
    Empty(PathBuf),
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionaryError::Io(path, e) => {
                write!(f, "Failed to read dictionary {}: {}", path.display(), e)
            }
            DictionaryError::Empty(path) => {
                write!(f, "Dictionary {} has no usable words", path.display())
            }
        }
    }
}

impl std::error::Error for DictionaryError {}

/// Client registry errors
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    UnknownConnection(ConnectionId, Collection),
    DuplicateConnection(ConnectionId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownConnection(id, collection) => {
                write!(f, "Connection {} is not in the {} list", id, collection)
            }
            RegistryError::DuplicateConnection(id) => {
                write!(f, "Connection {} is already registered", id)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Protocol violations committed by a single connection.
///
/// These never change game state; each one is answered with a reply to the
/// offending connection only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    NotYourTurn,
    InvalidGuess,
    EmptyUsername,
    IllegalCharacters,
    UsernameTaken,
    UsernameTooLong(usize),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::NotYourTurn => write!(f, "Guess out of turn"),
            ProtocolError::InvalidGuess => write!(f, "Invalid guess"),
            ProtocolError::EmptyUsername => write!(f, "Empty username"),
            ProtocolError::IllegalCharacters => write!(f, "Username has illegal characters"),
            ProtocolError::UsernameTaken => write!(f, "Username already in use"),
            ProtocolError::UsernameTooLong(max) => {
                write!(f, "Username longer than {} characters", max)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// General server error that encompasses all startup and runtime failures
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Dictionary(DictionaryError),
    Bind(String, io::Error),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Dictionary(e) => write!(f, "Dictionary error: {}", e),
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<DictionaryError> for ServerError {
    fn from(error: DictionaryError) -> Self {
        ServerError::Dictionary(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
