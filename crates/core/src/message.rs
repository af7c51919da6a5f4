//! Message types exchanged with the bridge.
//!
//! Inbound items arrive as [`PendingInput`], decoded from the bridge's
//! [`PollResponse`]. Everything sent back is an [`OutboundMessage`] carrying
//! the correlation token of the input it answers.

use serde::{Deserialize, Serialize};

/// One inbound item surfaced by a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInput {
    /// The raw message text, as the bridge delivered it
    pub text: String,

    /// Opaque token from the source; echoed on every derived response
    pub correlation_id: String,
}

impl PendingInput {
    pub fn new(text: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            correlation_id: correlation_id.into(),
        }
    }
}

/// Wire format of `GET /api/<queue>/pending`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub has_pending: bool,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub timestamp: String,
}

impl PollResponse {
    /// Convert into a pending input, if the bridge reported one.
    pub fn into_pending(self) -> Option<PendingInput> {
        if self.has_pending {
            Some(PendingInput {
                text: self.message,
                correlation_id: self.timestamp,
            })
        } else {
            None
        }
    }
}

/// Wire format of `POST /api/<queue>/respond`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: String,
    pub message: String,
    /// The correlation id of the input this message answers
    pub timestamp: String,
}

/// One bounded, ordered fragment of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseChunk {
    /// 1-based position of this chunk
    pub index: usize,

    /// Total number of chunks in the response
    pub total: usize,

    pub text: String,
}

impl ResponseChunk {
    /// Render the chunk for delivery.
    ///
    /// Single-chunk responses go out untouched; fragments of a split
    /// response get an `[i/n] ` prefix.
    pub fn render(&self) -> String {
        if self.total > 1 {
            format!("[{}/{}] {}", self.index, self.total, self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Shorten `text` to at most `max_chars` characters for log output,
/// appending `...` when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_response_without_pending() {
        let resp: PollResponse = serde_json::from_str(r#"{"has_pending": false}"#).unwrap();
        assert!(resp.into_pending().is_none());
    }

    #[test]
    fn poll_response_with_pending() {
        let resp: PollResponse = serde_json::from_str(
            r#"{"has_pending": true, "message": "status?", "timestamp": "T1"}"#,
        )
        .unwrap();
        let input = resp.into_pending().unwrap();
        assert_eq!(input.text, "status?");
        assert_eq!(input.correlation_id, "T1");
    }

    #[test]
    fn outbound_message_serialization() {
        let msg = OutboundMessage {
            recipient: "+15550100".into(),
            message: "hello".into(),
            timestamp: "T1".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["recipient"], "+15550100");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["timestamp"], "T1");
    }

    #[test]
    fn single_chunk_renders_without_prefix() {
        let chunk = ResponseChunk {
            index: 1,
            total: 1,
            text: "all good".into(),
        };
        assert_eq!(chunk.render(), "all good");
    }

    #[test]
    fn split_chunk_renders_with_prefix() {
        let chunk = ResponseChunk {
            index: 2,
            total: 3,
            text: "middle".into(),
        };
        assert_eq!(chunk.render(), "[2/3] middle");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ééééé", 2), "éé...");
    }
}
