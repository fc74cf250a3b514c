//! Fan-out to active players and connection removal.
//!
//! Any write may fail and remove its connection, which in turn broadcasts a
//! goodbye. Every loop here therefore walks a snapshot of the active handles
//! and re-checks membership before each write.

use log::{info, warn};

use crate::client::{Collection, ConnectionId};
use crate::protocol::responses;
use crate::server::ServerState;

impl ServerState {
    /// Writes `msg` to every active connection except `exclude`.
    pub fn broadcast(&mut self, msg: &str, exclude: Option<ConnectionId>) {
        self.fanout_depth += 1;
        for id in self.registry.active_ids() {
            if Some(id) == exclude || !self.registry.exists(Collection::Active, id) {
                continue;
            }
            self.send_or_remove(id, Collection::Active, msg, "broadcast");
        }
        self.fanout_depth -= 1;
        self.reannounce_if_stale();
    }

    /// Prompts the current-turn holder and tells everyone else whose turn it is.
    ///
    /// If the turn holder is removed part way through, the pass starts over
    /// for the new holder. Other removals let the pass carry on, so each
    /// remaining player hears about the turn once.
    pub fn announce_turn(&mut self) {
        self.fanout_depth += 1;
        'pass: loop {
            let Some(current) = self.registry.current_turn() else {
                break;
            };
            let others = responses::turn_of(self.registry.name_of(current));
            for id in self.registry.active_ids() {
                if !self.registry.exists(Collection::Active, id) {
                    continue;
                }
                let msg = if id == current {
                    responses::YOUR_TURN
                } else {
                    others.as_str()
                };
                self.send_or_remove(id, Collection::Active, msg, "announce turn");
                if self.registry.current_turn() != Some(current) {
                    continue 'pass;
                }
            }
            break;
        }
        self.fanout_depth -= 1;
        self.turn_stale = false;

        if let Some(current) = self.registry.current_turn() {
            info!("It's {}'s turn.", self.registry.name_of(current));
        }
    }

    pub fn announce_winner(&mut self, winner: ConnectionId, winner_name: &str) {
        let others = responses::winner_is(winner_name);
        self.fanout_depth += 1;
        for id in self.registry.active_ids() {
            if !self.registry.exists(Collection::Active, id) {
                continue;
            }
            let msg = if id == winner {
                responses::YOU_WIN
            } else {
                others.as_str()
            };
            self.send_or_remove(id, Collection::Active, msg, "announce winner");
        }
        self.fanout_depth -= 1;
        self.reannounce_if_stale();
    }

    /// Detaches `id` from `collection` and closes its socket.
    ///
    /// A named player leaving the game triggers a goodbye and a fresh turn
    /// announcement. When that happens inside another fan-out, the
    /// announcement waits until the outermost one finishes. Unknown handles
    /// are logged and otherwise ignored.
    pub fn remove(&mut self, id: ConnectionId, collection: Collection, during: &str) {
        let connection = match self.registry.detach(id, collection) {
            Ok(connection) => connection,
            Err(e) => {
                warn!("Trying to remove {} during {}: {}", id, during, e);
                return;
            }
        };
        info!(
            "Removing client {} {} during {}",
            id,
            connection.addr(),
            during
        );

        if collection == Collection::Active && connection.has_name() {
            let farewell = responses::goodbye(connection.name());
            drop(connection);
            self.turn_stale = true;
            self.broadcast(&farewell, Some(id));
            self.reannounce_if_stale();
        }
    }

    fn reannounce_if_stale(&mut self) {
        if self.fanout_depth == 0 && self.turn_stale {
            self.announce_turn();
        }
    }

    /// Writes to one connection, removing it if the write fails. Returns
    /// whether the connection is still registered afterwards.
    pub(super) fn send_or_remove(
        &mut self,
        id: ConnectionId,
        collection: Collection,
        msg: &str,
        during: &str,
    ) -> bool {
        let result = match self.registry.get(id) {
            Some(connection) => connection.send(msg),
            None => return false,
        };
        if let Err(e) = result {
            warn!("Write to client {} failed during {}: {}", id, during, e);
            self.remove(id, collection, during);
            return false;
        }
        true
    }
}
