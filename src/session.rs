//! The chat session: one socket, one view, one input field.
//!
//! ## Design
//! - `ChatSession` owns the view and the input field for the lifetime of one
//!   connection. Nothing is global; dropping the session tears it down.
//! - `run` multiplexes inbound socket frames and input lines with
//!   `tokio::select!`. Each event is handled to completion before the next is
//!   polled, so no locking is needed.
//! - No reconnection. When the socket closes or errors the session ends.

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite};
use tokio_stream::wrappers::SplitStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn, Instrument};
use url::Url;

use crate::composer::MessageInput;
use crate::envelope::{decode_frame, Inbound};
use crate::error::ChatError;
use crate::render::{ChatLine, TimeStyle};
use crate::view::{ChatView, Region};

/// What a single inbound frame did to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// One line appended to the log.
    Appended,
    /// User list rebuilt with this many entries.
    UsersReplaced(usize),
    /// Envelope type not handled; display untouched.
    Ignored(String),
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server sent a close frame or the stream ended.
    ServerClosed,
    /// Local input reached end of file.
    InputClosed,
}

pub struct ChatSession<V: ChatView> {
    view: V,
    input: MessageInput,
    time_style: TimeStyle,
}

impl<V: ChatView> ChatSession<V> {
    pub fn new(view: V, time_style: TimeStyle) -> Self {
        Self {
            view,
            input: MessageInput::new(),
            time_style,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn input(&self) -> &MessageInput {
        &self.input
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Apply one inbound text frame to the view.
    ///
    /// A malformed frame returns an error and leaves the view unchanged.
    pub fn handle_frame(&mut self, text: &str) -> Result<Dispatch, ChatError> {
        match decode_frame(text)? {
            Inbound::Chat(msg) => {
                let line = ChatLine::render(&msg, &self.time_style);
                self.view.append_line(&line)?;
                self.view.scroll_to_bottom()?;
                debug!(region = %Region::ChatBox, user = %msg.user, "message appended");
                Ok(Dispatch::Appended)
            }
            Inbound::UserList(users) => {
                self.view.replace_users(&users)?;
                debug!(region = %Region::UserList, count = users.len(), "user list replaced");
                Ok(Dispatch::UsersReplaced(users.len()))
            }
            Inbound::Ignored(kind) => {
                debug!(kind = %kind, "ignoring envelope");
                Ok(Dispatch::Ignored(kind))
            }
        }
    }

    /// Type `line` into the input field and submit the form.
    ///
    /// Returns the outbound frame, if any. Blank lines send nothing and stay
    /// in the field.
    pub fn submit_line(&mut self, line: &str) -> Option<String> {
        self.input.set(line);
        let frame = self.input.submit();
        if frame.is_none() {
            debug!(region = %Region::ChatForm, "blank submission suppressed");
        }
        frame
    }
}

/// Open the single socket connection to `endpoint`.
pub async fn connect(
    endpoint: &Url,
) -> Result<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>, ChatError> {
    let (ws_stream, response) = tokio_tungstenite::connect_async(endpoint.as_str()).await?;
    info!(endpoint = %endpoint, status = %response.status(), "connected");
    Ok(ws_stream)
}

/// Turn one raw input line into text. A trailing `\r` is dropped and bytes
/// that are not UTF-8 become U+FFFD, so a bad line never ends the session.
pub fn input_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => {
            warn!(region = %Region::MessageInput, "input is not valid UTF-8, replacing bad bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Drive `session` until the socket closes or `input` reaches EOF.
///
/// Each line read from `input` is one form submission. Malformed inbound
/// frames are logged and dropped.
pub async fn run<S, R, V>(
    ws_stream: WebSocketStream<S>,
    input: R,
    session: &mut ChatSession<V>,
) -> Result<SessionEnd, ChatError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
    V: ChatView,
{
    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let mut lines = SplitStream::new(input.split(b'\n'));

    loop {
        tokio::select! {
            // Frame from the server.
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Err(e) = session.handle_frame(&text) {
                            match e {
                                ChatError::MalformedFrame(_) => {
                                    warn!(error = %e, "dropping inbound frame");
                                }
                                other => return Err(other),
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        info!(?frame, "server closed the connection");
                        // Push out the close reply tungstenite queued; the peer may be gone.
                        let _ = ws_sink.flush().await;
                        return Ok(SessionEnd::ServerClosed);
                    }
                    Some(Ok(_)) => {} // Binary / ping / pong frames carry nothing for the view.
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(SessionEnd::ServerClosed),
                }
            }

            // Line typed into the input field.
            line = lines.next() => {
                match line {
                    Some(Ok(bytes)) => {
                        let line = input_line(bytes);
                        if let Some(frame) = session.submit_line(&line) {
                            debug!(region = %Region::MessageInput, len = frame.len(), "sending");
                            ws_sink.send(WsMessage::Text(frame)).await?;
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        info!("input closed, leaving");
                        // The peer may already be gone.
                        let _ = ws_sink.close().await;
                        return Ok(SessionEnd::InputClosed);
                    }
                }
            }
        }
    }
}

/// Connect to `endpoint` and run a session over stdin until it ends.
pub async fn run_stdin<V: ChatView>(
    endpoint: &Url,
    session: &mut ChatSession<V>,
) -> Result<SessionEnd, ChatError> {
    let span = tracing::info_span!(
        "session",
        id = %uuid::Uuid::new_v4(),
        endpoint = %endpoint,
    );
    async {
        let ws_stream = connect(endpoint).await?;
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        run(ws_stream, stdin, session).await
    }
    .instrument(span)
    .await
}
