//! Server responses
//!
//! Every line the server writes to clients. All messages end with the
//! network terminator.

use crate::error::ProtocolError;
use crate::game::GameState;

pub const WELCOME: &str = "Welcome to our word game. What is your name? \r\n";
pub const YOUR_TURN: &str = "Your guess?\r\n";
pub const YOU_WIN: &str = "Game over! You win!\n\n\nLet's start a new game\r\n";

const STATUS_RULE: &str = "***************";

/// Reply sent to a connection that broke the protocol
pub fn rejection_message(err: &ProtocolError) -> String {
    match err {
        ProtocolError::NotYourTurn => "It's not your turn to guess\r\n".to_string(),
        ProtocolError::InvalidGuess => "Please enter a single valid letter\r\n".to_string(),
        ProtocolError::EmptyUsername => "Please enter a non-empty username\r\n".to_string(),
        ProtocolError::IllegalCharacters => "Please enter legal characters\r\n".to_string(),
        ProtocolError::UsernameTaken => {
            "Please enter a username that hasn't been used\r\n".to_string()
        }
        ProtocolError::UsernameTooLong(max) => {
            format!("Please enter a username of at most {} characters\r\n", max)
        }
    }
}

pub fn turn_of(name: &str) -> String {
    format!("It's {}'s turn\r\n", name)
}

pub fn goodbye(name: &str) -> String {
    format!("Goodbye {}\r\n", name)
}

pub fn joined(name: &str) -> String {
    format!("{} has joined.\r\n", name)
}

pub fn guessed(name: &str, letter: char) -> String {
    format!("{} guesses: {}\r\n", name, letter)
}

pub fn not_in_word(letter: char) -> String {
    format!("{} is not in the word\r\n", letter)
}

pub fn word_was(word: &str) -> String {
    format!("The word was {}\r\n", word)
}

pub fn winner_is(name: &str) -> String {
    format!("Game over! {} won!\n\n\nLet's start a new game\r\n", name)
}

pub fn out_of_guesses(word: &str) -> String {
    format!(
        "The word was {}\nNo guesses left. Game over.\n\nLet's start a new game\r\n",
        word
    )
}

/// Full status block: pattern so far, guesses remaining and letters tried
pub fn status_message(game: &GameState) -> String {
    let tried: Vec<String> = game.tried_letters().map(String::from).collect();
    format!(
        "{rule}\r\nWord to guess: {pattern}\r\nGuesses remaining: {left}\r\nLetters guessed: \r\n{tried}\r\n{rule}\r\n",
        rule = STATUS_RULE,
        pattern = game.pattern(),
        left = game.guesses_left(),
        tried = tried.join(" "),
    )
}
