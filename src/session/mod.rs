//! Console session layer.
//!
//! This module owns the connection lifecycle: the authenticated
//! WebSocket handshake, the single-command exchange with identifier
//! correlation, and the per-call deadlines bounding each read and
//! write.
//!
//! # Session Lifecycle
//!
//! 1. [`Session::connect`] dials `ws://{address}/{secret}`, where the
//!    secret path segment is the credential
//! 2. [`Session::execute`] writes a request envelope, then reads until
//!    the correlated response arrives
//! 3. [`Session::close`] runs the close handshake, consuming the session
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Session connection and command execution |
//! | `settings` | Timeout configuration |

// ============================================================================
// Submodules
// ============================================================================

/// Session connection and command execution.
pub mod core;

/// Session timeout configuration.
pub mod settings;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::{MAX_COMMAND_LEN, Session};
pub use settings::{DEFAULT_DEADLINE, DEFAULT_DIAL_TIMEOUT, Settings};
