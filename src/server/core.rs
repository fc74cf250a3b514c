use log::{debug, error, info};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpSocket, TcpStream, lookup_host};
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::client::{ConnectionId, Link, OUTBOUND_QUEUE};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::game::WordSource;
use crate::server::ServerState;

/// Largest single read from a client socket
const READ_CHUNK: usize = 256;

/// Events waiting for the loop. Reader tasks wait for room once it is full.
const EVENT_QUEUE: usize = 128;

/// Something that happened on a client socket, reported by its reader or
/// writer task.
#[derive(Debug)]
pub enum ConnectionEvent {
    Data(ConnectionId, Vec<u8>),
    Closed(ConnectionId, String),
}

/// The word game server.
///
/// One task owns the listener and all game state. Each connection gets a
/// reader task that forwards raw chunks into a single bounded event
/// channel and a writer task fed through the connection's `Link`. The event loop handles
/// one accept or one event to completion before waiting again.
pub struct Server {
    listener: TcpListener,
    state: ServerState,
    events_tx: Sender<ConnectionEvent>,
    events_rx: Receiver<ConnectionEvent>,
    next_id: u64,
}

impl Server {
    pub async fn bind(
        config: &ServerConfig,
        words: Box<dyn WordSource>,
    ) -> Result<Self, ServerError> {
        let listener = listen(&config.bind_address, config.port, config.listen_backlog)
            .await
            .map_err(|e| ServerError::Bind(config.listen_socket(), e))?;
        info!("Server bound to {}", listener.local_addr()?);

        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);
        Ok(Self {
            listener,
            state: ServerState::new(config.game_settings(), words),
            events_tx,
            events_rx,
            next_id: 1,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the event loop. Per-connection failures never end it.
    pub async fn run(self) -> Result<(), ServerError> {
        let Server {
            listener,
            mut state,
            events_tx,
            mut events_rx,
            mut next_id,
        } = self;
        info!("Starting RAX word server on {}", listener.local_addr()?);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let id = ConnectionId(next_id);
                        next_id += 1;
                        open_connection(&mut state, &events_tx, id, stream, addr);
                    }
                    Err(e) => error!("Error accepting connection: {}", e),
                },
                Some(event) = events_rx.recv() => match event {
                    ConnectionEvent::Data(id, bytes) => state.handle_input(id, &bytes),
                    ConnectionEvent::Closed(id, reason) => state.handle_disconnect(id, &reason),
                },
            }
        }
    }
}

/// Resolves `host` and listens on the first address that binds.
async fn listen(host: &str, port: u16, backlog: u32) -> io::Result<TcpListener> {
    let mut last_err = None;
    for addr in lookup_host((host, port)).await? {
        match listen_on(addr, backlog) {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                debug!("Could not listen on {}: {}", addr, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} did not resolve to any address", host),
        )
    }))
}

fn listen_on(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

/// Spawns the reader and writer tasks for a new socket and registers it.
fn open_connection(
    state: &mut ServerState,
    events_tx: &Sender<ConnectionEvent>,
    id: ConnectionId,
    stream: TcpStream,
    addr: SocketAddr,
) {
    info!("A new client is connecting from {}", addr);
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Could not set TCP_NODELAY for {}: {}", id, e);
    }

    let (read_half, write_half) = stream.into_split();
    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);

    let writer = tokio::spawn(write_loop(id, write_half, outbound_rx, events_tx.clone()));
    let reader = tokio::spawn(read_loop(id, read_half, events_tx.clone()));

    let tasks = vec![reader.abort_handle(), writer.abort_handle()];
    state.accept(id, addr, Link::new(outbound_tx, tasks));
}

/// Forwards every chunk read from the socket to the event loop until the
/// peer closes or the read fails. Waits for room in the event channel, so
/// a busy loop stops this connection from being read.
async fn read_loop(
    id: ConnectionId,
    mut read_half: OwnedReadHalf,
    events_tx: Sender<ConnectionEvent>,
) {
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let event = match read_half.read(&mut buf).await {
            Ok(0) => ConnectionEvent::Closed(id, "connection closed by peer".to_string()),
            Ok(n) => ConnectionEvent::Data(id, buf[..n].to_vec()),
            Err(e) => ConnectionEvent::Closed(id, e.to_string()),
        };
        let closed = matches!(event, ConnectionEvent::Closed(..));
        if events_tx.send(event).await.is_err() || closed {
            return;
        }
    }
}

/// Writes queued messages in order. The first failed write is reported to
/// the event loop as a close, and later `Link::send` calls fail.
async fn write_loop(
    id: ConnectionId,
    mut write_half: OwnedWriteHalf,
    mut outbound_rx: Receiver<String>,
    events_tx: Sender<ConnectionEvent>,
) {
    while let Some(msg) = outbound_rx.recv().await {
        if let Err(e) = write_half.write_all(msg.as_bytes()).await {
            debug!("Write to client {} failed: {}", id, e);
            outbound_rx.close();
            let _ = events_tx
                .send(ConnectionEvent::Closed(id, format!("write failed: {}", e)))
                .await;
            return;
        }
    }
    if let Err(e) = write_half.shutdown().await {
        debug!("Shutdown of client {} failed: {}", id, e);
    }
}
