//! WebSocket transport for the streaming room connection.
//!
//! [`Connection::open`] returns a handle immediately; the handshake and all
//! socket I/O run in a spawned task that reports lifecycle transitions and
//! parsed frames through channels. Protocol interpretation stays in the
//! caller; this layer only moves frames.

use futures_util::{SinkExt, StreamExt};
use parlor_core::{ClientFrame, ConnectionStatus, RoomId, ServerFrame, Username};
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{
    Endpoints,
    error::{ConnectionError, MalformedFrameError},
};

type WsSink = futures_util::stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

const CHANNEL_CAPACITY: usize = 32;

/// Events delivered by a [`Connection`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The connection status changed.
    Status(ConnectionStatus),
    /// A parsed frame arrived from the server.
    Frame(ServerFrame),
}

/// Handle to one streaming connection scoped to a room and an identity.
///
/// The manager does not reconnect on failure: a transport error leaves the
/// status at [`ConnectionStatus::Failed`] until the owner re-activates the
/// room with a fresh handle.
#[derive(Debug)]
pub struct Connection {
    outbound: mpsc::Sender<ClientFrame>,
    events: mpsc::Receiver<ConnectionEvent>,
    status: watch::Receiver<ConnectionStatus>,
    abort: tokio::task::AbortHandle,
    closed: bool,
}

impl Connection {
    /// Open a streaming connection for the given room and user.
    ///
    /// Returns immediately with status [`ConnectionStatus::Connecting`];
    /// the handshake outcome arrives as a [`ConnectionEvent::Status`].
    /// Must be called within a tokio runtime.
    pub fn open(endpoints: &Endpoints, room_id: &RoomId, username: &Username) -> Self {
        let url = endpoints.stream_url(room_id, username);
        let (outbound_tx, outbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);

        let task = tokio::spawn(run_connection(url, outbound_rx, event_tx, status_tx));

        Self {
            outbound: outbound_tx,
            events: event_rx,
            status: status_rx,
            abort: task.abort_handle(),
            closed: false,
        }
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        if self.closed { ConnectionStatus::Closed } else { *self.status.borrow() }
    }

    /// Send a frame to the server if the connection is open.
    ///
    /// Never attempts a write on an unready channel: while the status is
    /// not [`ConnectionStatus::Open`] the frame is dropped silently, so
    /// callers check [`status`](Self::status) first.
    pub fn send(&self, frame: ClientFrame) {
        if !self.status().can_send() {
            tracing::debug!(status = %self.status(), "dropping outbound frame: connection not open");
            return;
        }
        if self.outbound.try_send(frame).is_err() {
            tracing::warn!("outbound channel full or closed; frame dropped");
        }
    }

    /// Next status transition or inbound frame, in arrival order.
    ///
    /// Returns `None` once the connection has been closed locally or the
    /// transport task has stopped and its buffered events are drained.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        if self.closed {
            return None;
        }
        self.events.recv().await
    }

    /// Close the connection.
    ///
    /// Idempotent and always safe to call, including on a handle whose
    /// handshake never completed.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.abort.abort();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Transport task: handshake, then pump frames both ways until the channel
/// closes or fails.
async fn run_connection(
    url: String,
    mut outbound: mpsc::Receiver<ClientFrame>,
    events: mpsc::Sender<ConnectionEvent>,
    status: watch::Sender<ConnectionStatus>,
) {
    let stream = match connect_async(&url).await {
        Ok((stream, _response)) => stream,
        Err(error) => {
            tracing::warn!(%error, url, "websocket connect failed");
            publish(&status, &events, ConnectionStatus::Failed).await;
            return;
        },
    };
    publish(&status, &events, ConnectionStatus::Open).await;

    let (mut sink, mut source) = stream.split();
    let final_status = loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    if let Err(error) = send_frame(&mut sink, &frame).await {
                        tracing::warn!(%error, "websocket send failed");
                        break ConnectionStatus::Failed;
                    }
                },
                // Handle dropped without close(); stop quietly.
                None => break ConnectionStatus::Closed,
            },
            message = source.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerFrame>(text.as_str()) {
                        Ok(frame) => {
                            if events.send(ConnectionEvent::Frame(frame)).await.is_err() {
                                break ConnectionStatus::Closed;
                            }
                        },
                        Err(error) => {
                            // One bad frame must not abort the connection.
                            let error = MalformedFrameError::from(error);
                            tracing::warn!(%error, "dropping inbound frame");
                        },
                    }
                },
                Some(Ok(Message::Close(_))) | None => break ConnectionStatus::Closed,
                Some(Ok(_)) => {},
                Some(Err(error)) => {
                    tracing::warn!(%error, "websocket receive failed");
                    break ConnectionStatus::Failed;
                },
            },
        }
    };
    publish(&status, &events, final_status).await;
}

async fn publish(
    status: &watch::Sender<ConnectionStatus>,
    events: &mpsc::Sender<ConnectionEvent>,
    next: ConnectionStatus,
) {
    let _ = status.send(next);
    let _ = events.send(ConnectionEvent::Status(next)).await;
}

async fn send_frame(sink: &mut WsSink, frame: &ClientFrame) -> Result<(), ConnectionError> {
    let text = serde_json::to_string(frame)?;
    sink.send(Message::Text(text.into())).await?;
    Ok(())
}
