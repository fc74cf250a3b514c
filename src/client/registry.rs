//! Client registry
//!
//! Tracks every connection in exactly one of two ordered lists, pending or
//! active, and the handle of the active connection whose turn it is.

use std::collections::HashMap;

use crate::client::{Collection, Connection, ConnectionId};
use crate::error::RegistryError;

/// Registry of connected clients.
///
/// Records live in an arena keyed by `ConnectionId`; the lists only hold
/// handles, so the turn handle can never point at a freed record. A handle
/// is in at most one list at any time.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    connections: HashMap<ConnectionId, Connection>,
    pending: Vec<ConnectionId>,
    active: Vec<ConnectionId>,
    current_turn: Option<ConnectionId>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, collection: Collection) -> &Vec<ConnectionId> {
        match collection {
            Collection::Pending => &self.pending,
            Collection::Active => &self.active,
        }
    }

    fn list_mut(&mut self, collection: Collection) -> &mut Vec<ConnectionId> {
        match collection {
            Collection::Pending => &mut self.pending,
            Collection::Active => &mut self.active,
        }
    }

    /// Returns whether `id` is currently held by `collection`
    pub fn exists(&self, collection: Collection, id: ConnectionId) -> bool {
        self.list(collection).contains(&id)
    }

    /// Returns the list currently holding `id`, if any
    pub fn collection_of(&self, id: ConnectionId) -> Option<Collection> {
        if self.exists(Collection::Active, id) {
            Some(Collection::Active)
        } else if self.exists(Collection::Pending, id) {
            Some(Collection::Pending)
        } else {
            None
        }
    }

    /// Adds a new unnamed connection at the front of the pending list
    pub fn add_pending(&mut self, connection: Connection) -> Result<(), RegistryError> {
        let id = connection.id();
        if self.connections.contains_key(&id) {
            return Err(RegistryError::DuplicateConnection(id));
        }
        self.connections.insert(id, connection);
        self.pending.insert(0, id);
        Ok(())
    }

    /// Moves a pending connection to the end of the active list under `name`.
    ///
    /// The record and its socket are kept; only its list changes. Returns
    /// `true` when the connection became the current turn because the active
    /// list was empty.
    pub fn promote(
        &mut self,
        id: ConnectionId,
        name: String,
        line_limit: usize,
    ) -> Result<bool, RegistryError> {
        let pos = self
            .pending
            .iter()
            .position(|&p| p == id)
            .ok_or(RegistryError::UnknownConnection(id, Collection::Pending))?;
        let connection = self
            .connections
            .get_mut(&id)
            .ok_or(RegistryError::UnknownConnection(id, Collection::Pending))?;

        connection.set_name(name);
        connection.framer_mut().set_limit(line_limit);
        self.pending.remove(pos);
        self.active.push(id);

        if self.current_turn.is_none() {
            self.current_turn = Some(id);
            return Ok(true);
        }
        Ok(false)
    }

    /// Takes `id` out of `collection` and hands back its record.
    ///
    /// If `id` holds the current turn, the turn passes to the next active
    /// connection before the record is detached. The turn is cleared when
    /// the active list becomes empty.
    pub fn detach(
        &mut self,
        id: ConnectionId,
        collection: Collection,
    ) -> Result<Connection, RegistryError> {
        let pos = self
            .list(collection)
            .iter()
            .position(|&p| p == id)
            .ok_or(RegistryError::UnknownConnection(id, collection))?;

        if collection == Collection::Active && self.current_turn == Some(id) {
            self.advance_turn();
            if self.current_turn == Some(id) {
                self.current_turn = None;
            }
        }

        self.list_mut(collection).remove(pos);
        if self.active.is_empty() {
            self.current_turn = None;
        }

        self.connections
            .remove(&id)
            .ok_or(RegistryError::UnknownConnection(id, collection))
    }

    /// Passes the turn to the next active connection, wrapping to the first
    pub fn advance_turn(&mut self) {
        let Some(current) = self.current_turn else {
            return;
        };
        self.current_turn = match self.active.iter().position(|&a| a == current) {
            Some(pos) => self.active.get((pos + 1) % self.active.len()).copied(),
            None => self.active.first().copied(),
        };
    }

    // --------------------
    // Lookups
    // --------------------

    pub fn current_turn(&self) -> Option<ConnectionId> {
        self.current_turn
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(&id)
    }

    /// Name of a connection, empty for unknown or unnamed ones
    pub fn name_of(&self, id: ConnectionId) -> &str {
        self.connections.get(&id).map(Connection::name).unwrap_or("")
    }

    /// Copy of the active handles in turn order
    pub fn active_ids(&self) -> Vec<ConnectionId> {
        self.active.clone()
    }

    pub fn pending_ids(&self) -> Vec<ConnectionId> {
        self.pending.clone()
    }

    /// Case-sensitive check against the names of active connections
    pub fn name_in_use(&self, name: &str) -> bool {
        self.active
            .iter()
            .filter_map(|id| self.connections.get(id))
            .any(|c| c.name() == name)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
