use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use rax_word_server::game::WordSource;
use rax_word_server::{Server, ServerConfig};

const WAIT: Duration = Duration::from_secs(5);

struct Rotation {
    words: Vec<&'static str>,
    next: usize,
}

impl WordSource for Rotation {
    fn next_word(&mut self) -> String {
        let word = self.words[self.next % self.words.len()];
        self.next += 1;
        word.to_string()
    }
}

// Start a server on an ephemeral port
async fn start_server(words: &[&'static str], max_guesses: u32) -> SocketAddr {
    start_server_on("127.0.0.1", words, max_guesses).await
}

async fn start_server_on(bind: &str, words: &[&'static str], max_guesses: u32) -> SocketAddr {
    let config = ServerConfig {
        bind_address: bind.to_string(),
        port: 0,
        max_guesses,
        ..ServerConfig::default()
    };
    let words = Rotation {
        words: words.to_vec(),
        next: 0,
    };
    let server = Server::bind(&config, Box::new(words)).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

struct Player {
    stream: TcpStream,
    seen: String,
    log: String,
}

impl Player {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let mut player = Self {
            stream,
            seen: String::new(),
            log: String::new(),
        };
        player.expect("What is your name?").await;
        player
    }

    async fn join(addr: SocketAddr, name: &str) -> Self {
        let mut player = Self::connect(addr).await;
        player.send(name).await;
        // status block, then the turn announcement line
        player.expect("Letters guessed: \r\n").await;
        player.expect("***************\r\n").await;
        player.expect("\r\n").await;
        player
    }

    async fn send(&mut self, line: &str) {
        self.send_raw(format!("{line}\r\n").as_bytes()).await;
    }

    async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.unwrap();
    }

    // Read until `needle` shows up, then forget everything up to it
    async fn expect(&mut self, needle: &str) {
        let mut buf = [0u8; 1024];
        while !self.seen.contains(needle) {
            let n = timeout(WAIT, self.stream.read(&mut buf))
                .await
                .unwrap_or_else(|_| panic!("timed out waiting for {needle:?}, saw {:?}", self.seen))
                .unwrap();
            assert!(n > 0, "connection closed waiting for {needle:?}");
            let text = String::from_utf8_lossy(&buf[..n]);
            self.seen.push_str(&text);
            self.log.push_str(&text);
        }
        let end = self.seen.find(needle).unwrap() + needle.len();
        self.seen.drain(..end);
    }
}

#[tokio::test]
async fn test_single_player_joins_and_gets_turn() {
    let addr = start_server(&["apple"], 4).await;
    let mut alice = Player::connect(addr).await;

    alice.send("alice").await;
    alice.expect("Word to guess: -----").await;
    alice.expect("Guesses remaining: 4").await;
    alice.expect("Your guess?\r\n").await;
}

#[tokio::test]
async fn test_username_rejected_then_accepted() {
    let addr = start_server(&["apple"], 4).await;
    let _alice = Player::join(addr, "alice").await;
    let mut other = Player::connect(addr).await;

    other.send("").await;
    other.expect("Please enter a non-empty username\r\n").await;
    other.send("alice").await;
    other.expect("Please enter a username that hasn't been used\r\n").await;
    other.send("bob").await;
    other.expect("It's alice's turn\r\n").await;
}

#[tokio::test]
async fn test_turns_alternate_on_misses() {
    let addr = start_server(&["apple"], 4).await;
    let mut alice = Player::join(addr, "alice").await;
    let mut bob = Player::join(addr, "bob").await;
    alice.expect("bob has joined.\r\n").await;

    bob.send("z").await;
    bob.expect("It's not your turn to guess\r\n").await;

    alice.send("z").await;
    alice.expect("z is not in the word\r\n").await;
    bob.expect("alice guesses: z\r\n").await;
    bob.expect("Guesses remaining: 3").await;
    bob.expect("Your guess?\r\n").await;
    alice.expect("It's bob's turn\r\n").await;
}

#[tokio::test]
async fn test_fragmented_and_batched_lines() {
    let addr = start_server(&["apple"], 4).await;
    let mut alice = Player::connect(addr).await;

    alice.send_raw(b"al").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    alice.send_raw(b"ice\r").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    alice.send_raw(b"\n").await;
    alice.expect("Your guess?\r\n").await;

    alice.send_raw(b"a\r\np\r\n").await;
    alice.expect("alice guesses: a\r\n").await;
    alice.expect("alice guesses: p\r\n").await;
    alice.expect("Word to guess: app--").await;
}

#[tokio::test]
async fn test_winning_starts_new_round() {
    let addr = start_server(&["kiwi", "melon"], 4).await;
    let mut alice = Player::join(addr, "alice").await;
    let mut bob = Player::join(addr, "bob").await;

    for letter in ["k", "i"] {
        alice.send(letter).await;
        alice.expect(&format!("alice guesses: {letter}\r\n")).await;
    }
    alice.send("w").await;

    alice.expect("The word was kiwi\r\n").await;
    alice.expect("Game over! You win!").await;
    bob.expect("Game over! alice won!").await;
    bob.expect("It's alice's turn\r\n").await;
    alice.expect("Your guess?\r\n").await;

    alice.send("m").await;
    bob.expect("Word to guess: m----").await;
}

#[tokio::test]
async fn test_turn_holder_disconnect() {
    let addr = start_server(&["apple"], 4).await;
    let alice = Player::join(addr, "alice").await;
    let mut bob = Player::join(addr, "bob").await;

    drop(alice);
    bob.expect("Goodbye alice\r\n").await;
    bob.expect("Your guess?\r\n").await;

    bob.send("e").await;
    bob.expect("Word to guess: ----e").await;
}

#[tokio::test]
async fn test_pending_disconnect_is_not_announced() {
    let addr = start_server(&["apple"], 4).await;
    let mut alice = Player::join(addr, "alice").await;

    let lurker = Player::connect(addr).await;
    drop(lurker);

    alice.send("q").await;
    alice.expect("q is not in the word\r\n").await;
    alice.expect("Your guess?\r\n").await;
    assert!(!alice.log.contains("Goodbye"));
}

#[tokio::test]
async fn test_client_that_never_reads_is_disconnected() {
    let addr = start_server(&["apple"], 4).await;
    let mut alice = Player::join(addr, "alice").await;

    // every empty line earns a rejection the client never reads
    let mut flooder = TcpStream::connect(addr).await.unwrap();
    let chunk = b"\r\n".repeat(32 * 1024);
    let flood = async {
        loop {
            if let Err(e) = flooder.write_all(&chunk).await {
                return e;
            }
        }
    };
    timeout(Duration::from_secs(30), flood)
        .await
        .expect("flooding client was never disconnected");

    alice.send("z").await;
    alice.expect("z is not in the word\r\n").await;
    assert!(!alice.log.contains("Goodbye"));
}

#[tokio::test]
async fn test_bind_address_may_be_a_hostname() {
    let addr = start_server_on("localhost", &["apple"], 4).await;
    assert!(addr.ip().is_loopback());

    let mut alice = Player::connect(addr).await;
    alice.send("alice").await;
    alice.expect("Your guess?\r\n").await;
}
