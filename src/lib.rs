//! WebRCON - Remote-console client over WebSocket.
//!
//! This library speaks the WebRCON protocol: one WebSocket connection
//! per console, authenticated by a secret URL path segment, exchanging
//! JSON envelopes in which a client-chosen identifier correlates each
//! command with its reply.
//!
//! # Architecture
//!
//! The client follows a request/response model over a full-duplex
//! stream:
//!
//! - **Client (Rust)**: sends command envelopes, tagged with an
//!   identifier from a session-local sequence
//! - **Console (remote)**: echoes the identifier in the correlated
//!   reply, interleaved with unsolicited log and chat traffic
//!
//! Key design principles:
//!
//! - One [`Session`] owns one connection plus its immutable [`Settings`]
//! - Commands run one at a time; `execute` takes `&mut self` so the
//!   borrow checker enforces serialization
//! - Deadlines are per read/write call, re-armed each time, never
//!   accumulated across an exchange
//! - Every failure is returned to the caller; nothing is retried
//!
//! # Quick Start
//!
//! ```no_run
//! use webrcon::{Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // The secret path segment is the credential
//!     let mut session = Session::connect("127.0.0.1:28016", "secret").await?;
//!
//!     let status = session.execute("status").await?;
//!     println!("{status}");
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Wire envelope types |
//! | [`session`] | Connection, execution and settings |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Wire protocol message types.
///
/// The JSON envelope exchanged with the console in both directions.
pub mod protocol;

/// Console session layer.
///
/// Connection lifecycle, command execution and timeout configuration.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{Envelope, Kind};

// Session types
pub use session::{DEFAULT_DEADLINE, DEFAULT_DIAL_TIMEOUT, MAX_COMMAND_LEN, Session, Settings};
