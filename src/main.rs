//! RAX Word Server - Entry Point
//!
//! Multi-player word guessing game over TCP.

use clap::Parser;
use log::info;
use std::path::PathBuf;

use rax_word_server::error::ServerError;
use rax_word_server::error::handlers::{error_to_exit_code, handle_error};
use rax_word_server::game::Dictionary;
use rax_word_server::{Server, ServerConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Word list, one word per line (overrides dictionary_path)
    dictionary: Option<PathBuf>,
    /// Configuration file, extension optional
    #[arg(short, long, default_value = "config")]
    config: String,
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
    /// IP address to bind to
    #[arg(short = 'H', long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()).await {
        handle_error(&e);
        std::process::exit(error_to_exit_code(&e));
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let mut config = ServerConfig::load(&args.config)?;
    if let Some(dictionary) = args.dictionary {
        config.dictionary_path = dictionary.to_string_lossy().into_owned();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    config.validate()?;

    info!("Launching word server...");
    let dictionary = Dictionary::load(&config.dictionary_path())?;
    let server = Server::bind(&config, Box::new(dictionary)).await?;

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
