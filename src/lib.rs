//! # Otter Client
//!
//! Client for the Otter key-value store's binary wire protocol:
//! - Fixed 8 byte frame header, big-endian
//! - Length-prefixed strings and status codes
//! - Synchronous request/response sessions, one call in flight per connection
//! - Pluggable transports (TCP, byte-at-a-time for conformance testing)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Client Session                        │
//! │            get / put / delete / ping / echo                 │
//! └──────────────┬───────────────────────────────▲──────────────┘
//!                │                               │
//!                ▼                               │
//!        ┌──────────────┐                ┌───────┴──────┐
//!        │   Request    │                │   Payload    │
//!        │   Builder    │                │   Parser     │
//!        └──────┬───────┘                └───────▲──────┘
//!               │          Header Codec          │
//!               ▼                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │           Transport (write_full / read_full)                │
//! │                 TCP  |  Chunked  |  ...                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use otter::Client;
//!
//! # fn main() -> otter::Result<()> {
//! let mut client = Client::connect("127.0.0.1:8119")?;
//! client.put("k1", "v1")?;
//! assert_eq!(client.get("k1")?, b"v1");
//! client.delete("k1")?;
//! assert!(client.get("k1").unwrap_err().is_not_found());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{OtterError, Result};
pub use config::Config;
pub use client::Client;
pub use transport::{ChunkedTransport, Connection, TcpTransport, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the Otter client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
