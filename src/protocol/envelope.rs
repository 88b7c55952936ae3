//! Envelope message type.
//!
//! Defines the JSON payload exchanged with the remote console in both
//! directions. Field names on the wire are fixed by the console and do
//! not follow Rust naming conventions.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Envelope
// ============================================================================

/// The message unit exchanged over the transport.
///
/// Requests and responses share one shape; direction decides whether
/// `message` carries a command or its textual result.
///
/// # Format
///
/// ```json
/// {
///   "Message": "status",
///   "Identifier": 42,
///   "Type": "",
///   "stacktrace": ""
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Command to execute (outbound) or the command's textual result
    /// (inbound). Untyped content; the wire imposes no size limit.
    #[serde(rename = "Message")]
    pub message: String,

    /// Correlation key chosen by the request sender and echoed verbatim
    /// in the console's response. Matching is by equality only.
    #[serde(rename = "Identifier")]
    pub identifier: i32,

    /// Advisory classification of the message. Requests leave it blank;
    /// the correlation protocol never interprets it.
    #[serde(rename = "Type", default)]
    pub kind: Kind,

    /// Optional diagnostic text attached by the console. Unused by the
    /// correlation logic.
    #[serde(rename = "stacktrace", default)]
    pub stacktrace: String,
}

impl Envelope {
    /// Creates an outbound request envelope with a blank kind.
    #[inline]
    #[must_use]
    pub fn request(command: impl Into<String>, identifier: i32) -> Self {
        Self {
            message: command.into(),
            identifier,
            kind: Kind::None,
            stacktrace: String::new(),
        }
    }

    /// Returns `true` if this envelope answers a request with the given
    /// identifier.
    #[inline]
    #[must_use]
    pub const fn correlates_with(&self, identifier: i32) -> bool {
        self.identifier == identifier
    }
}

// ============================================================================
// Kind
// ============================================================================

/// Advisory message classification.
///
/// The console labels its messages with one of a few recognized values.
/// The field is informational only, so an unrecognized label must never
/// fail envelope decoding: it is preserved as [`Kind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Kind {
    /// Blank classification, what requests are sent with.
    #[default]
    None,
    /// Ordinary command output.
    Generic,
    /// Console log line.
    Log,
    /// Warning-level message.
    Warning,
    /// Error-level message.
    Error,
    /// Any label this client does not recognize, kept verbatim.
    Other(String),
}

impl From<String> for Kind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => Self::None,
            "Generic" => Self::Generic,
            "Log" => Self::Log,
            "Warning" => Self::Warning,
            "Error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::None => String::new(),
            Kind::Generic => "Generic".to_string(),
            Kind::Log => "Log".to_string(),
            Kind::Warning => "Warning".to_string(),
            Kind::Error => "Error".to_string(),
            Kind::Other(value) => value,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
