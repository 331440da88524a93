//! Inbound wire format.
//!
//! Every server frame is one JSON object `{"type": ..., "data": ...}`. Only
//! `chat` and `userlist` are understood; other types decode to
//! [`Inbound::Ignored`] so the caller can skip them without touching the
//! display.

use chrono::DateTime;
use serde::{Deserialize, Deserializer};

use crate::error::ChatError;

/// Envelope type for a single chat line.
pub const TYPE_CHAT: &str = "chat";
/// Envelope type for a full user-list snapshot.
pub const TYPE_USERLIST: &str = "userlist";

/// One chat line as broadcast by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    pub user: String,
    pub content: String,
    /// Unix epoch milliseconds.
    #[serde(deserialize_with = "deserialize_epoch_millis")]
    pub timestamp: i64,
}

/// Decoded form of one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Chat(ChatMessage),
    /// Authoritative, ordered snapshot of connected usernames.
    UserList(Vec<String>),
    /// Well-formed envelope with a type this client does not handle.
    Ignored(String),
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Decode one text frame.
///
/// Returns [`ChatError::MalformedFrame`] when the payload is not JSON, has no
/// `type`, or carries `data` that does not match the declared type.
pub fn decode_frame(text: &str) -> Result<Inbound, ChatError> {
    let raw: RawEnvelope = serde_json::from_str(text)?;
    match raw.kind.as_str() {
        TYPE_CHAT => Ok(Inbound::Chat(serde_json::from_value(raw.data)?)),
        TYPE_USERLIST => {
            // An empty Go slice marshals as `null`.
            let users: Option<Vec<String>> = serde_json::from_value(raw.data)?;
            Ok(Inbound::UserList(users.unwrap_or_default()))
        }
        _ => Ok(Inbound::Ignored(raw.kind)),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Millis(i64),
    Fractional(f64),
    Rfc3339(String),
}

fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match WireTimestamp::deserialize(deserializer)? {
        WireTimestamp::Millis(ms) => Ok(ms),
        WireTimestamp::Fractional(ms) if ms.is_finite() => Ok(ms.trunc() as i64),
        WireTimestamp::Fractional(ms) => Err(serde::de::Error::custom(format!(
            "timestamp is not a finite number: {ms}"
        ))),
        WireTimestamp::Rfc3339(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.timestamp_millis())
            .map_err(|e| serde::de::Error::custom(format!("bad timestamp '{text}': {e}"))),
    }
}
