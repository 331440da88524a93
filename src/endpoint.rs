//! WebSocket endpoint derivation from the page origin.
//!
//! The server always serves its socket at `/ws` on the same host the chat
//! page came from. A secure origin (`https`) means a secure socket (`wss`).

use url::Url;

use crate::error::ChatError;

/// Fixed socket path on the chat server.
pub const WS_PATH: &str = "/ws";

/// Default page origin; the reference server listens on `:8080`.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// WebSocket scheme chosen for a given origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Ws,
    Wss,
}

impl Scheme {
    /// Map an origin scheme onto a socket scheme. `ws`/`wss` pass through.
    pub fn for_origin(origin_scheme: &str) -> Option<Self> {
        match origin_scheme {
            "https" | "wss" => Some(Scheme::Wss),
            "http" | "ws" => Some(Scheme::Ws),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Ws => write!(f, "ws"),
            Scheme::Wss => write!(f, "wss"),
        }
    }
}

/// Build `{scheme}://{host[:port]}/ws` from a page origin such as
/// `https://chat.example.com`.
///
/// Path, query and fragment of the origin are discarded.
pub fn endpoint_url(origin: &str) -> Result<Url, ChatError> {
    let invalid = |reason: String| ChatError::InvalidOrigin {
        origin: origin.to_string(),
        reason,
    };

    let parsed = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
    let scheme = Scheme::for_origin(parsed.scheme())
        .ok_or_else(|| invalid(format!("unsupported scheme '{}'", parsed.scheme())))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| invalid("origin has no host".to_string()))?;

    let authority = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Url::parse(&format!("{scheme}://{authority}{WS_PATH}")).map_err(|e| invalid(e.to_string()))
}
