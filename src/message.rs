//! Core message type exchanged over a session
//!
//! All types use camelCase JSON serialization for wire compatibility.

use serde::{Deserialize, Serialize};

/// The payload carried by every interaction pattern
///
/// Messages are immutable values: whichever side originates a request or
/// response constructs one, the recipient consumes it. Two messages with
/// the same fields are the same message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Endpoint that produced the message
    pub source: String,

    /// Endpoint the message is addressed to
    pub destination: String,

    /// Text body
    pub text: String,
}

impl Message {
    /// Create a new message
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            text: text.into(),
        }
    }

    /// Build the response to this message
    ///
    /// Swaps `source` and `destination` and prefixes the text with
    /// `"In response to: "`. The original is left untouched; replying
    /// to a reply stacks the prefix.
    pub fn reply(&self) -> Self {
        Self {
            source: self.destination.clone(),
            destination: self.source.clone(),
            text: format!("In response to: {}", self.text),
        }
    }
}
