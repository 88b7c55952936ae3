//! Session timeout configuration.
//!
//! Settings are fixed when a session is created and never change
//! afterwards. Builder calls apply in order, so a later call overrides
//! an earlier one for the same option.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use webrcon::Settings;
//!
//! let settings = Settings::new()
//!     .with_dial_timeout(Duration::from_secs(10))
//!     .with_deadline(Duration::from_secs(2));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Default bound on the connection handshake.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on each individual read or write during a command
/// exchange.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

// ============================================================================
// Settings
// ============================================================================

/// Per-session timeout configuration.
///
/// A zero duration disables enforcement of that bound entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Bounds the initial handshake. Zero disables the bound.
    pub dial_timeout: Duration,

    /// Bounds each individual read or write call during a command
    /// exchange. Applied fresh per call, never accumulated across the
    /// exchange. Zero disables the bound.
    pub deadline: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Settings {
    /// Creates the default baseline settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl Settings {
    /// Overrides the handshake bound. Zero disables it.
    #[inline]
    #[must_use]
    pub const fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    /// Overrides the per-call read/write deadline. Zero disables it.
    #[inline]
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
