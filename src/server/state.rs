//! Server state
//!
//! The single aggregate the event loop mutates: client registry, current
//! round and word source. Every handler runs to completion before the loop
//! looks at the next event, so no locking is needed.

use log::{debug, info, warn};
use std::net::SocketAddr;

use crate::client::{ClientRegistry, Collection, Connection, ConnectionId, Link};
use crate::config::GameSettings;
use crate::error::ProtocolError;
use crate::game::{GameState, GuessOutcome, WordSource};
use crate::protocol::{Frame, responses, validate_username};

pub struct ServerState {
    pub(super) registry: ClientRegistry,
    pub(super) game: GameState,
    words: Box<dyn WordSource>,
    settings: GameSettings,
    /// Fan-out loops currently running, outermost first
    pub(super) fanout_depth: usize,
    /// A player left during a fan-out and the turn has not been re-announced
    pub(super) turn_stale: bool,
}

impl ServerState {
    pub fn new(settings: GameSettings, mut words: Box<dyn WordSource>) -> Self {
        let game = GameState::new(words.next_word(), settings.max_guesses);
        Self {
            registry: ClientRegistry::new(),
            game,
            words,
            settings,
            fanout_depth: 0,
            turn_stale: false,
        }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Registers a freshly accepted socket as pending and greets it.
    pub fn accept(&mut self, id: ConnectionId, addr: SocketAddr, link: Link) {
        info!("Adding client {} from {}", id, addr);
        let connection = Connection::new(id, addr, link, self.settings.max_name_length);
        if let Err(e) = self.registry.add_pending(connection) {
            warn!("Refusing connection {}: {}", id, e);
            return;
        }
        self.send_or_remove(id, Collection::Pending, responses::WELCOME, "accept");
    }

    /// Feeds bytes read from `id` through its framer and handles every
    /// complete line in order.
    ///
    /// The connection is looked up again before each line: handling one
    /// line can promote it (later lines become guesses) or remove it (the
    /// rest of the chunk is dropped).
    pub fn handle_input(&mut self, id: ConnectionId, bytes: &[u8]) {
        debug!("[{}] Read {} bytes", id, bytes.len());
        let mut input = bytes;

        while !input.is_empty() {
            let Some(collection) = self.registry.collection_of(id) else {
                debug!("Dropping input from removed connection {}", id);
                return;
            };
            let Some(connection) = self.registry.get_mut(id) else {
                return;
            };
            let Some(frame) = connection.framer_mut().feed(&mut input) else {
                break;
            };

            match collection {
                Collection::Pending => self.handle_name(id, frame),
                Collection::Active => self.handle_guess(id, frame),
            }
        }
    }

    /// Removes a connection whose socket reported end-of-stream or an error.
    pub fn handle_disconnect(&mut self, id: ConnectionId, reason: &str) {
        match self.registry.collection_of(id) {
            Some(collection) => {
                info!("Disconnect from {}: {}", id, reason);
                self.remove(id, collection, "disconnect");
            }
            None => debug!("Connection {} already removed ({})", id, reason),
        }
    }

    fn handle_name(&mut self, id: ConnectionId, frame: Frame) {
        let checked = match frame {
            Frame::Line(name) => validate_username(&name, &self.registry).map(|()| name),
            Frame::Overlong => Err(ProtocolError::UsernameTooLong(
                self.settings.max_name_length,
            )),
        };
        let name = match checked {
            Ok(name) => name,
            Err(err) => {
                info!("Rejected username from {}: {}", id, err);
                self.reject(id, Collection::Pending, &err);
                return;
            }
        };

        if let Err(e) = self
            .registry
            .promote(id, name.clone(), self.settings.max_guess_length)
        {
            warn!("Could not move {} into the game: {}", id, e);
            return;
        }
        info!("{} has joined", name);

        self.broadcast(&responses::joined(&name), Some(id));
        if self.registry.exists(Collection::Active, id) {
            let status = responses::status_message(&self.game);
            self.send_or_remove(id, Collection::Active, &status, "join");
        }
        self.announce_turn();
    }

    fn handle_guess(&mut self, id: ConnectionId, frame: Frame) {
        let name = self.registry.name_of(id).to_string();

        if self.registry.current_turn() != Some(id) {
            info!("Player {} tried to guess out of turn", name);
            self.reject(id, Collection::Active, &ProtocolError::NotYourTurn);
            return;
        }

        let checked = match frame {
            Frame::Line(line) => self.game.check_guess(&line),
            Frame::Overlong => Err(ProtocolError::InvalidGuess),
        };
        let letter = match checked {
            Ok(letter) => letter,
            Err(err) => {
                self.reject(id, Collection::Active, &err);
                return;
            }
        };
        debug!("[{}] Found newline {}", id, letter);

        match self.game.apply_guess(letter) {
            GuessOutcome::Solved => {
                let solved = responses::word_was(self.game.word());
                self.broadcast(&solved, None);
                self.announce_winner(id, &name);
                info!("Game over. {} won!", name);
                self.start_new_round();
                self.announce_turn();
                return;
            }
            GuessOutcome::Missed => {
                info!("Letter {} is not in the word", letter);
                let notice = responses::not_in_word(letter);
                self.send_or_remove(id, Collection::Active, &notice, "wrong guess");
                // Removing the guesser has already moved the turn on
                if self.registry.current_turn() == Some(id) {
                    self.registry.advance_turn();
                }
            }
            GuessOutcome::Revealed => {}
        }

        self.broadcast(&responses::guessed(&name, letter), None);
        let status = responses::status_message(&self.game);
        self.broadcast(&status, None);

        if self.game.is_exhausted() {
            let lost = responses::out_of_guesses(self.game.word());
            self.broadcast(&lost, None);
            info!("No guesses left, the word was {}", self.game.word());
            self.start_new_round();
        }
        self.announce_turn();
    }

    fn start_new_round(&mut self) {
        let word = self.words.next_word();
        self.game.start_round(word);
        info!("New game started");
    }

    fn reject(&mut self, id: ConnectionId, collection: Collection, err: &ProtocolError) {
        let reply = responses::rejection_message(err);
        self.send_or_remove(id, collection, &reply, "reject");
    }
}
