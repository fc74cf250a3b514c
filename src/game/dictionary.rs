//! Word dictionary
//!
//! Loads the word list once at startup and hands out a random word for
//! every new round.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fs;
use std::path::Path;

use crate::error::DictionaryError;

/// Source of hidden words, one per round
pub trait WordSource: Send {
    fn next_word(&mut self) -> String;
}

/// Word list read from a file with one word per line
pub struct Dictionary {
    words: Vec<String>,
    rng: StdRng,
}

impl Dictionary {
    /// Reads `path`, keeping only lines made entirely of `a`-`z`.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let contents =
            fs::read_to_string(path).map_err(|e| DictionaryError::Io(path.to_path_buf(), e))?;
        let dictionary = Self::from_words(contents.lines(), StdRng::from_entropy())
            .ok_or_else(|| DictionaryError::Empty(path.to_path_buf()))?;

        info!(
            "Loaded {} words from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Builds a dictionary from in-memory words. Returns `None` if no word
    /// survives filtering.
    pub fn from_words<'a, I>(words: I, rng: StdRng) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(str::trim)
            .filter(|word| {
                let usable = !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase());
                if !usable && !word.is_empty() {
                    debug!("Skipping dictionary entry {:?}", word);
                }
                usable
            })
            .map(str::to_string)
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(Self { words, rng })
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for Dictionary {
    fn next_word(&mut self) -> String {
        // from_words guarantees at least one word
        self.words
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}
