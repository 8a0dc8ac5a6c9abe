//! Otter CLI Client
//!
//! Command-line interface for interacting with an Otter server.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use otter::{ChunkedTransport, Client, Config, OtterError, TcpTransport, Transport};
use tracing_subscriber::{fmt, EnvFilter};

/// Otter CLI
#[derive(Parser, Debug)]
#[command(name = "otter-cli")]
#[command(about = "CLI for the Otter key-value store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8119")]
    addr: String,

    /// Send and receive one byte per system call
    #[arg(long)]
    chunked: bool,

    /// Read/write timeout in milliseconds (0 disables)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Receive buffer size in bytes
    #[arg(short, long, default_value = "1024")]
    buffer_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Ping the server and print the round-trip time
    Ping,

    /// Echo a message through the server
    Echo {
        /// The message to send
        message: String,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let transport: Arc<dyn Transport> = if args.chunked {
        Arc::new(ChunkedTransport::default())
    } else {
        Arc::new(TcpTransport::default())
    };

    let config = Config::builder()
        .addr(&args.addr)
        .transport(transport)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .recv_buffer_size(args.buffer_size)
        .build();

    let mut client = match Client::with_config(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut client, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(OtterError::NotFound) => {
            println!("(not found)");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(client: &mut Client, command: Commands) -> otter::Result<()> {
    match command {
        Commands::Get { key } => {
            let value = client.get(&key)?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Put { key, value } => {
            client.put(&key, &value)?;
            println!("OK");
        }
        Commands::Del { key } => {
            client.delete(&key)?;
            println!("OK");
        }
        Commands::Ping => {
            let latency = client.ping()?;
            println!("PONG {}ms", latency);
        }
        Commands::Echo { message } => {
            client.echo(message.as_bytes())?;
            println!("{}", message);
        }
    }
    Ok(())
}
