//! Word game
//!
//! Round state, guess rules and the dictionary that supplies hidden words.

pub mod dictionary;
pub mod state;

pub use dictionary::{Dictionary, WordSource};
pub use state::{GameState, GuessOutcome};
