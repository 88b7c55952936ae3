//! Error types for the WebRCON client.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webrcon::{Result, Session};
//!
//! async fn example(session: &mut Session) -> Result<()> {
//!     let players = session.execute("playerlist").await?;
//!     println!("{players}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Command validation | [`Error::EmptyCommand`], [`Error::CommandTooLong`] |
//! | Connection | [`Error::InvalidAddress`], [`Error::AuthenticationFailed`], [`Error::Transport`] |
//! | Envelope codec | [`Error::Decode`], [`Error::Encode`] |
//!
//! Deadline expiry is not a category of its own: it surfaces as
//! [`Error::Transport`] whose cause is an I/O timeout, and callers
//! distinguish it with [`Error::is_timeout`].

// ============================================================================
// Imports
// ============================================================================

use std::io::{Error as IoError, ErrorKind};
use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::session::MAX_COMMAND_LEN;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Command Validation Errors
    // ========================================================================
    /// Command string is empty.
    ///
    /// Returned before any I/O is attempted.
    #[error("command is empty")]
    EmptyCommand,

    /// Command exceeds the maximum accepted length.
    ///
    /// Returned before any I/O is attempted.
    #[error("command too long: {length} bytes (limit {limit})", limit = MAX_COMMAND_LEN)]
    CommandTooLong {
        /// Byte length of the rejected command.
        length: usize,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Console address could not be turned into an endpoint URL.
    ///
    /// Returned before any I/O is attempted.
    #[error("invalid console address: {address}")]
    InvalidAddress {
        /// The address as supplied by the caller.
        address: String,
    },

    /// The console rejected the handshake for this secret.
    ///
    /// Distinct from [`Error::Transport`]: the connection reached the
    /// console, which refused to upgrade it.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Any other failure of the underlying connection.
    ///
    /// Covers refused connections, DNS failures, read/write I/O errors,
    /// deadline expiry and closed connections. Carries the cause for
    /// diagnostics.
    #[error("transport error: {0}")]
    Transport(#[from] WsError),

    // ========================================================================
    // Envelope Codec Errors
    // ========================================================================
    /// A received message could not be parsed as an envelope.
    #[error("malformed envelope: {0}")]
    Decode(#[source] serde_json::Error),

    /// An outbound envelope could not be serialized.
    #[error("envelope encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a command-too-long error.
    #[inline]
    pub fn command_too_long(length: usize) -> Self {
        Self::CommandTooLong { length }
    }

    /// Creates an invalid address error.
    #[inline]
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
        }
    }

    /// Creates a transport error for an elapsed per-call deadline.
    ///
    /// The cause is an [`ErrorKind::TimedOut`] I/O error, matching how the
    /// transport itself reports timeouts.
    pub(crate) fn timed_out(operation: &str, after: Duration) -> Self {
        Self::Transport(WsError::Io(IoError::new(
            ErrorKind::TimedOut,
            format!("{operation} deadline elapsed after {after:?}"),
        )))
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a transport failure whose cause is a
    /// deadline expiry.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(WsError::Io(e)) if e.kind() == ErrorKind::TimedOut)
    }

    /// Returns `true` if this is a transport-level failure.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
