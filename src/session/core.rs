//! Session connection and command execution.
//!
//! A [`Session`] owns one authenticated WebSocket connection to a
//! remote console. Commands are executed one at a time: the request
//! envelope is written, then the session reads envelopes until one
//! echoes the request's identifier, discarding everything else the
//! console interleaves (log lines, chat, replies to nothing).
//!
//! The configured deadline is re-armed before the write and before each
//! individual read. It bounds the single call, not the whole exchange:
//! a console that keeps sending unrelated envelopes restarts the window
//! every time.

// ============================================================================
// Imports
// ============================================================================

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::error::UrlError;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::Envelope;

use super::settings::Settings;

// ============================================================================
// Constants
// ============================================================================

/// Maximum accepted command length in bytes.
///
/// An artificial restriction, but it guards against accidentally large
/// payloads reaching the console.
pub const MAX_COMMAND_LEN: usize = 1000;

// ============================================================================
// Types
// ============================================================================

/// The underlying message transport.
type Transport = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// Session
// ============================================================================

/// An open, authenticated console connection.
///
/// Created by [`Session::connect`]; lives until [`Session::close`]
/// consumes it. [`Session::execute`] takes `&mut self`, so commands on
/// one session are serialized by the borrow checker: the protocol has
/// no per-request demultiplexing and interleaved exchanges would steal
/// each other's replies.
pub struct Session {
    /// Open WebSocket stream.
    stream: Transport,
    /// Timeout configuration, fixed at connect time.
    settings: Settings,
    /// Source of request identifiers.
    identifiers: IdentifierSequence,
    /// Local endpoint, captured at connect time.
    local_addr: SocketAddr,
    /// Console endpoint, captured at connect time.
    remote_addr: SocketAddr,
}

impl Session {
    /// Connects and authenticates with default [`Settings`].
    ///
    /// See [`Session::connect_with`].
    pub async fn connect(address: &str, secret: &str) -> Result<Self> {
        Self::connect_with(address, secret, Settings::default()).await
    }

    /// Connects to `ws://{address}/{secret}` and authenticates.
    ///
    /// The secret is the URL path, acting as an implicit bearer
    /// credential: the console either upgrades the connection or
    /// rejects the handshake outright. The handshake is bounded by
    /// `settings.dial_timeout` unless that is zero.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] if no endpoint URL can be built from
    ///   `address`; checked before any I/O
    /// - [`Error::AuthenticationFailed`] if the console refused the
    ///   handshake for this secret
    /// - [`Error::Transport`] for every other connection failure,
    ///   including an elapsed dial timeout
    pub async fn connect_with(address: &str, secret: &str, settings: Settings) -> Result<Self> {
        let endpoint = endpoint_url(address, secret)?;

        debug!(address, "connecting to remote console");

        let connected = if settings.dial_timeout.is_zero() {
            connect_async(endpoint.as_str()).await
        } else {
            match timeout(settings.dial_timeout, connect_async(endpoint.as_str())).await {
                Ok(result) => result,
                Err(_) => return Err(Error::timed_out("handshake", settings.dial_timeout)),
            }
        };

        let (stream, _response) = connected.map_err(classify_handshake_error)?;
        let (local_addr, remote_addr) = endpoint_addrs(&stream)?;

        debug!(%local_addr, %remote_addr, "session established");

        Ok(Self {
            stream,
            settings,
            identifiers: IdentifierSequence::new(),
            local_addr,
            remote_addr,
        })
    }

    /// Executes a command and returns the console's textual result.
    ///
    /// Blocks the calling task until the correlated response arrives or
    /// the exchange fails. Envelopes whose identifier does not match
    /// the request are discarded; there is no buffering and no retry.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyCommand`] / [`Error::CommandTooLong`] before any
    ///   I/O is attempted
    /// - [`Error::Transport`] on write/read failure, connection closure
    ///   or an elapsed deadline (see [`Error::is_timeout`])
    /// - [`Error::Decode`] if a received message is not an envelope
    pub async fn execute(&mut self, command: &str) -> Result<String> {
        validate_command(command)?;

        let request = Envelope::request(command, self.identifiers.next());
        let payload = serde_json::to_string(&request).map_err(Error::Encode)?;

        self.write(Message::text(payload)).await?;
        trace!(identifier = request.identifier, command, "command sent");

        loop {
            let message = self.read().await?;

            let response = match &message {
                Message::Text(text) => {
                    serde_json::from_str::<Envelope>(text).map_err(Error::Decode)?
                }
                Message::Binary(bytes) => {
                    serde_json::from_slice::<Envelope>(bytes).map_err(Error::Decode)?
                }
                Message::Close(_) => return Err(Error::Transport(WsError::ConnectionClosed)),
                // Ping/pong is transport chatter, not console traffic
                _ => continue,
            };

            if response.correlates_with(request.identifier) {
                trace!(identifier = response.identifier, "response received");
                return Ok(response.message);
            }

            trace!(
                identifier = response.identifier,
                expected = request.identifier,
                "discarding unrelated envelope"
            );
        }
    }

    /// Closes the connection.
    ///
    /// Consuming `self` makes use-after-close unrepresentable. A
    /// transport that already completed its close handshake reports
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the close handshake fails.
    pub async fn close(mut self) -> Result<()> {
        debug!(remote_addr = %self.remote_addr, "closing session");

        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(err) => Err(Error::Transport(err)),
        }
    }

    /// Returns the local network address.
    #[inline]
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the console's network address.
    #[inline]
    #[must_use]
    pub const fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Returns the settings this session was created with.
    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Writes one transport message, bounded by the deadline.
    ///
    /// The deadline applies to this write only and is armed immediately
    /// before issuing it.
    async fn write(&mut self, message: Message) -> Result<()> {
        let deadline = self.settings.deadline;

        if deadline.is_zero() {
            self.stream.send(message).await?;
        } else {
            timeout(deadline, self.stream.send(message))
                .await
                .map_err(|_| Error::timed_out("write", deadline))??;
        }

        Ok(())
    }

    /// Reads one transport message, bounded by a fresh deadline.
    async fn read(&mut self) -> Result<Message> {
        let deadline = self.settings.deadline;

        let received = if deadline.is_zero() {
            self.stream.next().await
        } else {
            timeout(deadline, self.stream.next())
                .await
                .map_err(|_| Error::timed_out("read", deadline))?
        };

        match received {
            Some(message) => Ok(message?),
            None => Err(Error::Transport(WsError::ConnectionClosed)),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("local_addr", &self.local_addr)
            .field("remote_addr", &self.remote_addr)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// IdentifierSequence
// ============================================================================

/// Session-local source of request identifiers.
///
/// Monotonically increasing, starting at 1 and wrapping back to 1 past
/// `i32::MAX`, so identifiers within one session never collide in
/// practice and are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IdentifierSequence {
    next: i32,
}

impl IdentifierSequence {
    /// Creates a sequence starting at 1.
    const fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next identifier and advances the sequence.
    fn next(&mut self) -> i32 {
        let identifier = self.next;
        self.next = if identifier == i32::MAX { 1 } else { identifier + 1 };
        identifier
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Checks the command preconditions, before any I/O.
fn validate_command(command: &str) -> Result<()> {
    if command.is_empty() {
        return Err(Error::EmptyCommand);
    }

    if command.len() > MAX_COMMAND_LEN {
        return Err(Error::command_too_long(command.len()));
    }

    Ok(())
}

/// Builds the `ws://{address}/{secret}` endpoint.
///
/// The secret lands in the path percent-encoded; an empty secret yields
/// the root path.
fn endpoint_url(address: &str, secret: &str) -> Result<Url> {
    let mut endpoint =
        Url::parse(&format!("ws://{address}")).map_err(|_| Error::invalid_address(address))?;

    if endpoint.host_str().is_none() {
        return Err(Error::invalid_address(address));
    }

    endpoint.set_path(secret);

    Ok(endpoint)
}

/// Maps a failed client handshake onto the error taxonomy.
///
/// A wrong secret is rejected before the upgrade completes, either as
/// an HTTP error response or (the production console) as a raw close
/// frame where the HTTP response should be, which fails response
/// parsing. Everything else stays a transport error.
fn classify_handshake_error(err: WsError) -> Error {
    match err {
        WsError::Http(response) if response.status().is_client_error() => {
            Error::AuthenticationFailed
        }
        WsError::HttpFormat(_) => Error::AuthenticationFailed,
        other => Error::Transport(other),
    }
}

/// Captures both endpoint addresses from the underlying TCP stream.
fn endpoint_addrs(stream: &Transport) -> Result<(SocketAddr, SocketAddr)> {
    match stream.get_ref() {
        MaybeTlsStream::Plain(tcp) => {
            let local = tcp.local_addr().map_err(WsError::Io)?;
            let remote = tcp.peer_addr().map_err(WsError::Io)?;
            Ok((local, remote))
        }
        // Only ws:// endpoints are dialed, so the stream is always plain
        _ => Err(Error::Transport(WsError::Url(
            UrlError::UnsupportedUrlScheme,
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use tokio_tungstenite::tungstenite::http;

    #[test]
    fn test_validate_command_empty() {
        assert!(matches!(validate_command(""), Err(Error::EmptyCommand)));
    }

    #[test]
    fn test_validate_command_at_limit() {
        let command = "x".repeat(MAX_COMMAND_LEN);
        assert!(validate_command(&command).is_ok());
    }

    #[test]
    fn test_validate_command_over_limit() {
        let command = "x".repeat(MAX_COMMAND_LEN + 1);
        assert!(matches!(
            validate_command(&command),
            Err(Error::CommandTooLong { length }) if length == MAX_COMMAND_LEN + 1
        ));
    }

    proptest! {
        #[test]
        fn prop_bounded_commands_accepted(len in 1usize..=MAX_COMMAND_LEN) {
            let command = "x".repeat(len);
            prop_assert!(validate_command(&command).is_ok());
        }

        #[test]
        fn prop_overlong_commands_rejected(extra in 1usize..64) {
            let command = "x".repeat(MAX_COMMAND_LEN + extra);
            let rejected = matches!(
                validate_command(&command),
                Err(Error::CommandTooLong { .. })
            );
            prop_assert!(rejected);
        }
    }

    #[test]
    fn test_identifier_sequence_is_monotonic() {
        let mut sequence = IdentifierSequence::new();
        assert_eq!(sequence.next(), 1);
        assert_eq!(sequence.next(), 2);
        assert_eq!(sequence.next(), 3);
    }

    #[test]
    fn test_identifier_sequence_wraps_to_one() {
        let mut sequence = IdentifierSequence { next: i32::MAX };
        assert_eq!(sequence.next(), i32::MAX);
        assert_eq!(sequence.next(), 1);
    }

    #[test]
    fn test_endpoint_url_shape() {
        let url = endpoint_url("127.0.0.1:28016", "secret").expect("endpoint");
        assert_eq!(url.as_str(), "ws://127.0.0.1:28016/secret");
    }

    #[test]
    fn test_endpoint_url_encodes_secret() {
        let url = endpoint_url("127.0.0.1:28016", "p4ss word").expect("endpoint");
        assert_eq!(url.path(), "/p4ss%20word");
    }

    #[test]
    fn test_endpoint_url_empty_secret() {
        let url = endpoint_url("127.0.0.1:28016", "").expect("endpoint");
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn test_endpoint_url_rejects_garbage() {
        assert!(matches!(
            endpoint_url("not an address", "secret"),
            Err(Error::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_handshake_rejection_is_authentication_failure() {
        let response = http::Response::builder()
            .status(http::StatusCode::FORBIDDEN)
            .body(None)
            .expect("response");

        let err = classify_handshake_error(WsError::Http(Box::new(response)));
        assert!(matches!(err, Error::AuthenticationFailed));
    }

    #[test]
    fn test_other_handshake_failures_stay_transport() {
        let err = classify_handshake_error(WsError::ConnectionClosed);
        assert!(matches!(err, Error::Transport(WsError::ConnectionClosed)));
    }
}
