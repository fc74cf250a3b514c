//! Input validation
//!
//! Checks a proposed display name before a pending connection may join.

use crate::client::ClientRegistry;
use crate::error::ProtocolError;

/// Accepts `name` if it is non-empty, printable ASCII only, and not held by
/// any active connection. Checks run in that order.
pub fn validate_username(name: &str, registry: &ClientRegistry) -> Result<(), ProtocolError> {
    if name.is_empty() {
        return Err(ProtocolError::EmptyUsername);
    }
    if !name.bytes().all(is_printable) {
        return Err(ProtocolError::IllegalCharacters);
    }
    if registry.name_in_use(name) {
        return Err(ProtocolError::UsernameTaken);
    }
    Ok(())
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Connection, ConnectionId, Link, OUTBOUND_QUEUE};
    use tokio::sync::mpsc;

    fn registry_with(name: &str) -> ClientRegistry {
        let (tx, _rx) = mpsc::channel(OUTBOUND_QUEUE);
        let addr = "127.0.0.1:4000".parse().unwrap();
        let mut registry = ClientRegistry::new();
        registry
            .add_pending(Connection::new(ConnectionId(1), addr, Link::new(tx, Vec::new()), 30))
            .unwrap();
        registry.promote(ConnectionId(1), name.to_string(), 4).unwrap();
        registry
    }

    #[test]
    fn test_accepts_printable_name() {
        let registry = ClientRegistry::new();
        assert_eq!(validate_username("Ada Lovelace ~!", &registry), Ok(()));
    }

    #[test]
    fn test_rejects_empty() {
        let registry = registry_with("alice");
        assert_eq!(validate_username("", &registry), Err(ProtocolError::EmptyUsername));
    }

    #[test]
    fn test_rejects_control_and_non_ascii() {
        let registry = ClientRegistry::new();
        for bad in ["tab\there", "nul\0", "del\x7f", "caf\u{e9}", "a\rb"] {
            assert_eq!(
                validate_username(bad, &registry),
                Err(ProtocolError::IllegalCharacters),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_rejects_taken_name_exactly() {
        let registry = registry_with("alice");
        assert_eq!(validate_username("alice", &registry), Err(ProtocolError::UsernameTaken));
        assert_eq!(validate_username("Alice", &registry), Ok(()));
    }
}
