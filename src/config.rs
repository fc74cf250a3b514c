//! Configuration management for the RAX word server
//!
//! Settings come from built-in defaults, then an optional `config.toml`,
//! then `RAX_WORD_` prefixed environment variables. Command line flags are
//! applied on top by `main`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Default listening port
pub const DEFAULT_PORT: u16 = 52943;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK ═══
    /// IP address to listen on
    pub bind_address: String,

    /// Port to listen on
    pub port: u16,

    /// Pending connection queue length handed to listen(2)
    pub listen_backlog: u32,

    // ═══ GAME ═══
    /// Word list, one word per line
    pub dictionary_path: String,

    /// Wrong guesses allowed per round
    pub max_guesses: u32,

    /// Longest accepted username, terminator excluded
    pub max_name_length: usize,

    /// Longest accepted guess line, terminator excluded
    pub max_guess_length: usize,
}

/// Limits the game logic needs at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub max_guesses: u32,
    pub max_name_length: usize,
    pub max_guess_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            listen_backlog: 5,
            dictionary_path: "dictionary.txt".to_string(),
            max_guesses: 4,
            max_name_length: 30,
            max_guess_length: 4,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        ServerConfig::default().game_settings()
    }
}

impl ServerConfig {
    /// Load configuration from `path` (extension optional, file optional)
    /// with environment overrides
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("listen_backlog", i64::from(defaults.listen_backlog))?
            .set_default("dictionary_path", defaults.dictionary_path)?
            .set_default("max_guesses", i64::from(defaults.max_guesses))?
            .set_default("max_name_length", defaults.max_name_length as i64)?
            .set_default("max_guess_length", defaults.max_guess_length as i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("RAX_WORD").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.listen_backlog == 0 {
            return Err(config::ConfigError::Message(
                "listen_backlog must be greater than 0".into(),
            ));
        }

        if self.dictionary_path.is_empty() {
            return Err(config::ConfigError::Message(
                "dictionary_path cannot be empty".into(),
            ));
        }

        if self.max_guesses == 0 {
            return Err(config::ConfigError::Message(
                "max_guesses must be greater than 0".into(),
            ));
        }

        if self.max_name_length == 0 || self.max_guess_length == 0 {
            return Err(config::ConfigError::Message(
                "line length limits must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        PathBuf::from(&self.dictionary_path)
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            max_guesses: self.max_guesses,
            max_name_length: self.max_name_length,
            max_guess_length: self.max_guess_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_socket(), "0.0.0.0:52943");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = ServerConfig::load("no-such-rax-word-config").unwrap();
        assert_eq!(config.max_name_length, 30);
        assert_eq!(config.max_guess_length, 4);
    }

    #[test]
    fn test_load_reads_toml() {
        let path = std::env::temp_dir().join(format!("rax-word-config-{}.toml", std::process::id()));
        std::fs::write(&path, "max_guesses = 9\ndictionary_path = \"words.txt\"\n").unwrap();

        let config = ServerConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.max_guesses, 9);
        assert_eq!(config.dictionary_path(), PathBuf::from("words.txt"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rejects_zero_guesses() {
        let config = ServerConfig {
            max_guesses: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_line_limits() {
        let config = ServerConfig {
            max_guess_length: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
