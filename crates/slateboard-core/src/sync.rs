//! Wire protocol and WebSocket transport for room collaboration.
//!
//! Outbound traffic is an envelope with a `type` tag, the room id, and a
//! `message` field that carries its payload as an independently JSON-encoded
//! string. The inner encoding is part of the wire contract with existing
//! relay deployments, so both directions keep it.

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding inbound traffic.
///
/// A malformed frame is reported and skipped; it never tears down the
/// session or the rest of a batch.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),
    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The outer frame exchanged with the relay server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// A shape create. `message` holds a JSON-encoded [`ChatPayload`].
    Chat {
        #[serde(rename = "roomId")]
        room_id: String,
        message: String,
    },
    /// A shape erase. `message` holds a JSON-encoded [`ErasePayload`].
    Erase {
        #[serde(rename = "roomId")]
        room_id: String,
        message: String,
    },
    /// Room subscription handshake, sent once after connecting.
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
}

impl Envelope {
    pub fn room_id(&self) -> &str {
        match self {
            Envelope::Chat { room_id, .. }
            | Envelope::Erase { room_id, .. }
            | Envelope::JoinRoom { room_id } => room_id,
        }
    }

    /// Parse an envelope from a raw text frame.
    pub fn parse(raw: &str) -> Result<Envelope, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::MalformedEnvelope)
    }

    /// Decode the inner payload into a board operation.
    ///
    /// `join_room` carries no payload and yields `None`.
    pub fn operation(&self) -> Result<Option<Operation>, ProtocolError> {
        match self {
            Envelope::Chat { message, .. } => {
                let payload: ChatPayload = serde_json::from_str(message).map_err(|source| {
                    ProtocolError::MalformedPayload {
                        kind: "chat",
                        source,
                    }
                })?;
                Ok(Some(Operation::Create(payload.shape)))
            }
            Envelope::Erase { message, .. } => {
                let payload: ErasePayload = serde_json::from_str(message).map_err(|source| {
                    ProtocolError::MalformedPayload {
                        kind: "erase",
                        source,
                    }
                })?;
                Ok(Some(Operation::Erase(payload.shapes_to_erase)))
            }
            Envelope::JoinRoom { .. } => Ok(None),
        }
    }
}

/// Inner payload of a chat envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    pub shape: Shape,
}

/// Inner payload of an erase envelope. Carries the full removed shapes,
/// not bare ids; receivers match on the embedded ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErasePayload {
    pub shapes_to_erase: Vec<Shape>,
}

/// A board mutation, decoded from or encoded into an envelope.
#[derive(Debug, Clone)]
pub enum Operation {
    Create(Shape),
    Erase(Vec<Shape>),
}

impl Operation {
    /// Encode into the wire envelope for a room. The payload is serialized
    /// to its own JSON string before being placed in `message`.
    pub fn into_envelope(self, room_id: &str) -> Result<Envelope, serde_json::Error> {
        match self {
            Operation::Create(shape) => {
                let message = serde_json::to_string(&ChatPayload { shape })?;
                Ok(Envelope::Chat {
                    room_id: room_id.to_string(),
                    message,
                })
            }
            Operation::Erase(shapes) => {
                let message = serde_json::to_string(&ErasePayload {
                    shapes_to_erase: shapes,
                })?;
                Ok(Envelope::Erase {
                    room_id: room_id.to_string(),
                    message,
                })
            }
        }
    }
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events from the WebSocket client
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Connected to server
    Connected,
    /// Disconnected from server
    Disconnected,
    /// A decoded envelope from the server
    Message(Envelope),
    /// Error occurred
    Error { message: String },
}

/// The sync connection as the engine sees it.
///
/// Sends are fire-and-forget: a send on a not-open transport is dropped,
/// not queued. Inbound traffic is pumped by polling.
pub trait SyncTransport {
    /// Whether the connection is currently open for sending.
    fn is_open(&self) -> bool;

    /// Send a text frame.
    fn send(&self, msg: &str) -> Result<(), String>;

    /// Drain pending connection and message events (non-blocking).
    fn poll_events(&mut self) -> Vec<SyncEvent> {
        Vec::new()
    }

    /// Close the connection. Idempotent.
    fn close(&mut self);
}

mod native_client {
    use super::*;
    use std::net::TcpStream;
    use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tungstenite::stream::MaybeTlsStream;
    use tungstenite::{connect, Message, WebSocket};
    use url::Url;

    /// Commands handed to the socket thread.
    enum Command {
        Send(String),
        Close,
    }

    /// WebSocket client for native platforms.
    ///
    /// The socket lives on a background thread; the handle here only moves
    /// frames and events across channels, so every call is non-blocking.
    pub struct NativeWebSocket {
        state: ConnectionState,
        pending: Vec<SyncEvent>,
        cmd_tx: Sender<Command>,
        event_rx: Receiver<SyncEvent>,
        _thread: Option<JoinHandle<()>>,
    }

    impl NativeWebSocket {
        /// Open a connection to a relay.
        ///
        /// Only the URL is validated here; the handshake happens on the
        /// socket thread and its outcome arrives through
        /// [`SyncTransport::poll_events`].
        pub fn connect(url: &str) -> Result<Self, String> {
            let parsed = Url::parse(url).map_err(|e| format!("Invalid URL: {}", e))?;
            if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
                return Err(format!(
                    "Invalid WebSocket URL scheme: {}",
                    parsed.scheme()
                ));
            }

            let (cmd_tx, cmd_rx) = channel::<Command>();
            let (event_tx, event_rx) = channel::<SyncEvent>();
            let target = url.to_string();
            let handle = thread::spawn(move || socket_thread(target, cmd_rx, event_tx));

            Ok(Self {
                state: ConnectionState::Connecting,
                pending: Vec::new(),
                cmd_tx,
                event_rx,
                _thread: Some(handle),
            })
        }

        /// Ask the socket thread to shut down.
        pub fn disconnect(&mut self) {
            let _ = self.cmd_tx.send(Command::Close);
            self.state = ConnectionState::Disconnected;
        }

        /// Get current connection state.
        pub fn state(&self) -> ConnectionState {
            self.state
        }
    }

    impl SyncTransport for NativeWebSocket {
        fn is_open(&self) -> bool {
            self.state == ConnectionState::Connected
        }

        fn send(&self, msg: &str) -> Result<(), String> {
            self.cmd_tx
                .send(Command::Send(msg.to_string()))
                .map_err(|e| format!("Send failed: {}", e))
        }

        fn poll_events(&mut self) -> Vec<SyncEvent> {
            while let Ok(event) = self.event_rx.try_recv() {
                match &event {
                    SyncEvent::Connected => self.state = ConnectionState::Connected,
                    SyncEvent::Disconnected => self.state = ConnectionState::Disconnected,
                    SyncEvent::Error { .. } => self.state = ConnectionState::Error,
                    SyncEvent::Message(_) => {}
                }
                self.pending.push(event);
            }
            std::mem::take(&mut self.pending)
        }

        fn close(&mut self) {
            self.disconnect();
        }
    }

    impl Drop for NativeWebSocket {
        fn drop(&mut self) {
            self.disconnect();
        }
    }

    /// Body of the socket thread: connect, then shuttle frames until
    /// either side closes.
    fn socket_thread(url: String, cmd_rx: Receiver<Command>, event_tx: Sender<SyncEvent>) {
        log::info!("Connecting to {}", url);
        let mut socket = match connect(url.as_str()) {
            Ok((socket, response)) => {
                log::info!("Connected, status: {}", response.status());
                socket
            }
            Err(e) => {
                log::error!("Connection failed: {}", e);
                let _ = event_tx.send(SyncEvent::Error {
                    message: format!("Connection failed: {}", e),
                });
                return;
            }
        };
        let _ = event_tx.send(SyncEvent::Connected);
        tune_stream(&mut socket);

        loop {
            // Outbound first, so queued frames are not starved by reads
            match cmd_rx.try_recv() {
                Ok(Command::Send(msg)) => {
                    log::debug!("Sending: {}", &msg[..msg.len().min(100)]);
                    if let Err(e) = socket.send(Message::Text(msg)) {
                        log::error!("Send error: {}", e);
                        break;
                    }
                }
                Ok(Command::Close) | Err(TryRecvError::Disconnected) => {
                    let _ = socket.close(None);
                    break;
                }
                Err(TryRecvError::Empty) => {}
            }

            match socket.read() {
                Ok(Message::Text(txt)) => {
                    log::debug!("Received: {}", &txt[..txt.len().min(100)]);
                    match Envelope::parse(&txt) {
                        Ok(envelope) => {
                            let _ = event_tx.send(SyncEvent::Message(envelope));
                        }
                        Err(e) => log::warn!("Dropping malformed frame: {}", e),
                    }
                }
                Ok(Message::Ping(data)) => {
                    let _ = socket.send(Message::Pong(data));
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {} // Ignore binary, pong
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    // Read timeout; loop back to check for commands
                }
                Err(e) => {
                    log::error!("Read error: {}", e);
                    break;
                }
            }
        }

        log::info!("Socket thread exiting");
        let _ = event_tx.send(SyncEvent::Disconnected);
    }

    /// A short read timeout on the raw stream keeps the thread responsive
    /// to outbound commands between inbound frames.
    fn tune_stream(socket: &mut WebSocket<MaybeTlsStream<TcpStream>>) {
        if let MaybeTlsStream::Plain(tcp) = socket.get_mut() {
            let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
            let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
        }
    }
}

pub use native_client::NativeWebSocket;
