//! Module `state`
//!
//! Defines the connection record kept for every client socket, and the
//! outbound link through which the event loop writes to it.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::AbortHandle;

use crate::protocol::LineFramer;

/// Server-assigned handle of one client connection. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two client lists a connection can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Connected, no accepted name yet
    Pending,
    /// Named and taking part in the game
    Active,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Pending => write!(f, "pending"),
            Collection::Active => write!(f, "active"),
        }
    }
}

/// Messages a connection may have waiting for its writer task. A peer that
/// stops reading fills this and gets disconnected.
pub const OUTBOUND_QUEUE: usize = 64;

/// Write side of a client socket.
///
/// Messages go to the connection's writer task through a queue of at most
/// `OUTBOUND_QUEUE` entries. Dropping the link closes the socket by
/// aborting the connection's tasks.
#[derive(Debug)]
pub struct Link {
    outbound: Sender<String>,
    tasks: Vec<AbortHandle>,
}

impl Link {
    pub fn new(outbound: Sender<String>, tasks: Vec<AbortHandle>) -> Self {
        Self { outbound, tasks }
    }

    /// Queues `msg` for the socket without waiting. Fails once the writer
    /// task has stopped or the queue is full.
    pub fn send(&self, msg: &str) -> io::Result<()> {
        self.outbound
            .try_send(msg.to_string())
            .map_err(|e| match e {
                TrySendError::Full(_) => io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "client is not reading, outbound queue full",
                ),
                TrySendError::Closed(_) => {
                    io::Error::new(io::ErrorKind::BrokenPipe, "connection writer has stopped")
                }
            })
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Record of one connected client.
///
/// Owned by whichever registry list currently holds it; promotion moves it
/// between lists without touching the socket.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    addr: SocketAddr,
    name: String,
    framer: LineFramer,
    link: Link,
}

impl Connection {
    pub fn new(id: ConnectionId, addr: SocketAddr, link: Link, line_limit: usize) -> Self {
        Self {
            id,
            addr,
            name: String::new(),
            framer: LineFramer::new(line_limit),
            link,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn addr(&self) -> &SocketAddr {
        &self.addr
    }

    /// Display name, empty until the connection is promoted
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn framer(&self) -> &LineFramer {
        &self.framer
    }

    pub fn framer_mut(&mut self) -> &mut LineFramer {
        &mut self.framer
    }

    pub fn send(&self, msg: &str) -> io::Result<()> {
        self.link.send(msg)
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_send_fails_when_queue_full() {
        let (tx, mut rx) = mpsc::channel(2);
        let link = Link::new(tx, Vec::new());

        link.send("one\r\n").unwrap();
        link.send("two\r\n").unwrap();
        let err = link.send("three\r\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        assert_eq!(rx.try_recv().unwrap(), "one\r\n");
        link.send("three\r\n").unwrap();
    }

    #[test]
    fn test_send_fails_when_writer_gone() {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
        let link = Link::new(tx, Vec::new());
        drop(rx);

        let err = link.send("hello\r\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
