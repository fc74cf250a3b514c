//! Module `state`
//!
//! Per-round state of the word game: hidden word, revealed pattern, letters
//! already tried and the wrong-guess counter.

use crate::error::ProtocolError;

/// Character shown for letters not yet revealed
pub const PLACEHOLDER: char = '-';

const ALPHABET: usize = 26;

/// What an accepted guess did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter is in the word and the word is not complete yet
    Revealed,
    /// The letter is not in the word; one guess was used up
    Missed,
    /// The letter completed the word
    Solved,
}

#[derive(Debug, Clone)]
pub struct GameState {
    word: String,
    pattern: String,
    letters_guessed: [bool; ALPHABET],
    guesses_left: u32,
    max_guesses: u32,
}

impl GameState {
    pub fn new(word: String, max_guesses: u32) -> Self {
        let pattern = hidden_pattern(&word);
        Self {
            word,
            pattern,
            letters_guessed: [false; ALPHABET],
            guesses_left: max_guesses,
            max_guesses,
        }
    }

    /// Starts a new round with `word`, resetting every per-round field.
    pub fn start_round(&mut self, word: String) {
        self.pattern = hidden_pattern(&word);
        self.word = word;
        self.letters_guessed = [false; ALPHABET];
        self.guesses_left = self.max_guesses;
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn word(&self) -> &str {
        &self.word
    }

    /// The word with unrevealed letters replaced by `PLACEHOLDER`
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn guesses_left(&self) -> u32 {
        self.guesses_left
    }

    pub fn max_guesses(&self) -> u32 {
        self.max_guesses
    }

    pub fn is_tried(&self, letter: char) -> bool {
        letter_index(letter).is_some_and(|i| self.letters_guessed[i])
    }

    /// Letters already attempted this round, in alphabetical order
    pub fn tried_letters(&self) -> impl Iterator<Item = char> + '_ {
        ('a'..='z').filter(|&c| self.is_tried(c))
    }

    pub fn is_solved(&self) -> bool {
        self.pattern == self.word
    }

    pub fn is_exhausted(&self) -> bool {
        self.guesses_left == 0
    }

    // --------------------
    // Guess rules
    // --------------------

    /// Checks that `line` is a single untried lowercase letter.
    pub fn check_guess(&self, line: &str) -> Result<char, ProtocolError> {
        let mut chars = line.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_lowercase() && !self.is_tried(letter) => {
                Ok(letter)
            }
            _ => Err(ProtocolError::InvalidGuess),
        }
    }

    /// Records `letter` as tried and reveals it wherever it occurs.
    ///
    /// The caller must have accepted `letter` through `check_guess`.
    pub fn apply_guess(&mut self, letter: char) -> GuessOutcome {
        if let Some(i) = letter_index(letter) {
            self.letters_guessed[i] = true;
        }

        let mut matched = false;
        self.pattern = self
            .word
            .chars()
            .zip(self.pattern.chars())
            .map(|(w, p)| {
                if p == PLACEHOLDER && w == letter {
                    matched = true;
                    w
                } else {
                    p
                }
            })
            .collect();

        if self.is_solved() {
            GuessOutcome::Solved
        } else if matched {
            GuessOutcome::Revealed
        } else {
            self.guesses_left = self.guesses_left.saturating_sub(1);
            GuessOutcome::Missed
        }
    }
}

fn hidden_pattern(word: &str) -> String {
    word.chars().map(|_| PLACEHOLDER).collect()
}

fn letter_index(letter: char) -> Option<usize> {
    letter
        .is_ascii_lowercase()
        .then(|| (letter as u8 - b'a') as usize)
}
