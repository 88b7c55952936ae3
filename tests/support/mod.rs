//! In-process mock console for integration tests.
//!
//! Emulates the remote end: accepts one WebSocket connection per
//! client, checks the secret path segment during the upgrade, then
//! answers command envelopes from a small fixed table.

// ============================================================================
// Imports
// ============================================================================

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

use webrcon::{Envelope, Kind};

// ============================================================================
// Constants
// ============================================================================

/// The secret the mock console accepts.
pub const PASSWORD: &str = "password";

/// Canned reply to the `status` command.
pub const STATUS_TEXT: &str = "status\n\
    hostname: Rust Server [DOCKER]\n\
    version : 2260 secure (secure mode enabled, connected to Steam3)\n\
    map     : Procedural Map\n\
    players : 0 (500 max) (0 queued) (0 joining)\n\
    \n\
    id name ping connected addr owner violation kicks\n";

/// Reply to the out-of-order `shadowed` command.
pub const SHADOWED_TEXT: &str = "shadowed done";

/// How long the `deadline` command stalls before replying.
pub const STALL: Duration = Duration::from_secs(1);

// ============================================================================
// MockConsole
// ============================================================================

/// A console emulator bound to a random localhost port.
///
/// The listener task is aborted on drop; per-connection tasks die with
/// the test runtime.
pub struct MockConsole {
    addr: SocketAddr,
    listener_task: JoinHandle<()>,
}

impl MockConsole {
    /// Binds the mock console and starts accepting connections.
    pub async fn spawn() -> Self {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock console");
        let addr = listener.local_addr().expect("mock console address");

        let listener_task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(serve(stream));
            }
        });

        Self {
            addr,
            listener_task,
        }
    }

    /// Returns the `host:port` string clients connect to.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Returns the socket address the console is bound to.
    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockConsole {
    fn drop(&mut self) {
        self.listener_task.abort();
    }
}

// ============================================================================
// Connection Handling
// ============================================================================

/// Serves one client connection until it closes.
async fn serve(stream: TcpStream) {
    let check_secret = |request: &Request, response: Response| {
        if request.uri().path() == format!("/{PASSWORD}") {
            Ok(response)
        } else {
            let mut rejection = ErrorResponse::new(Some("invalid secret".to_string()));
            *rejection.status_mut() = StatusCode::FORBIDDEN;
            Err(rejection)
        }
    };

    let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(stream, check_secret).await else {
        return;
    };

    while let Some(Ok(message)) = ws.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(request) = serde_json::from_str::<Envelope>(&text) else {
            return;
        };

        match request.message.as_str() {
            "status" => {
                reply(&mut ws, STATUS_TEXT, request.identifier, Kind::Generic).await;
            }
            "deadline" => {
                tokio::time::sleep(STALL).await;
                reply(&mut ws, "slept", request.identifier, Kind::Generic).await;
            }
            "shadowed" => {
                // A log line for nobody arrives before the real reply
                reply(
                    &mut ws,
                    "[CHAT] somebody: hi",
                    request.identifier.wrapping_add(1),
                    Kind::Log,
                )
                .await;
                reply(&mut ws, SHADOWED_TEXT, request.identifier, Kind::Generic).await;
            }
            other => {
                let text = format!("Command '{other}' not found");
                reply(&mut ws, &text, request.identifier, Kind::Warning).await;
            }
        }
    }
}

/// Sends one envelope back to the client.
async fn reply(ws: &mut WebSocketStream<TcpStream>, text: &str, identifier: i32, kind: Kind) {
    let envelope = Envelope {
        message: text.to_string(),
        identifier,
        kind,
        stacktrace: String::new(),
    };

    let payload = serde_json::to_string(&envelope).expect("serialize mock reply");
    let _ = ws.send(Message::text(payload)).await;
}

// ============================================================================
// Tracing
// ============================================================================

/// Installs a fmt subscriber once, honoring `RUST_LOG`.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
