//! Terminal client for a WebSocket chat server.
//!
//! The server pushes two kinds of frames, `chat` lines and `userlist`
//! snapshots; the client renders them and sends each non-blank input line
//! back as a plain text frame.

pub mod cli;
pub mod composer;
pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod render;
pub mod session;
pub mod view;

pub use config::ClientConfig;
pub use envelope::{decode_frame, ChatMessage, Inbound};
pub use error::ChatError;
pub use session::{ChatSession, Dispatch, SessionEnd};
pub use view::{ChatView, MemoryView, Region, TerminalView};
