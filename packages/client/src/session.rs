//! WebSocket session: wires the socket and user input into one client.

use std::{sync::Arc, time::Duration};

use chatterm_shared::time::Clock;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    client::ChatClient,
    domain::{ClientEvent, ConnectionState},
    error::ClientError,
    sink::{ChannelSink, Outbound},
    view::MessageView,
};

/// How long a user-requested close waits for the server's close reply
const CLOSE_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(2);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Result of a finished session
pub struct SessionOutcome<V> {
    /// The view, holding every message rendered during the session
    pub view: V,
    /// `Ok(())` when the user left, the failure otherwise
    pub result: Result<(), ClientError>,
}

/// Run one connection from handshake to close
///
/// `events_tx` and `events_rx` are the two halves of the client's event
/// channel. Input producers (the line editor, or a test) hold clones of
/// `events_tx`; socket events are pushed into the same channel, so the
/// client sees a single stream in arrival order.
///
/// Failures are never retried: the session ends after the first close.
pub async fn run_session<V: MessageView>(
    url: &str,
    view: V,
    clock: Arc<dyn Clock>,
    events_tx: mpsc::UnboundedSender<ClientEvent>,
    mut events_rx: mpsc::UnboundedReceiver<ClientEvent>,
) -> SessionOutcome<V> {
    let (sink, outbound_rx) = ChannelSink::channel();
    let mut client = ChatClient::new(view, sink, clock);
    let mut tasks = Vec::new();

    // Input keeps flowing while the handshake is pending so the user can
    // still leave; anything else is handled in the Connecting state.
    let connect = connect_async(url);
    tokio::pin!(connect);
    let connected = loop {
        tokio::select! {
            result = &mut connect => break Some(result),
            Some(event) = events_rx.recv() => {
                client.dispatch(event);
                if client.quit_requested() {
                    break None;
                }
            }
        }
    };

    match connected {
        Some(Ok((ws_stream, response))) => {
            tracing::debug!("Handshake completed with status {}", response.status());
            // Queued before the reader starts so the open always precedes frames.
            let _ = events_tx.send(ClientEvent::Opened);

            let (write, read) = ws_stream.split();
            tasks.push(tokio::spawn(read_frames(read, events_tx.clone())));
            tasks.push(tokio::spawn(write_frames(
                write,
                outbound_rx,
                events_tx.clone(),
            )));
        }
        Some(Err(e)) => {
            tracing::error!("Failed to connect to {}: {}", url, e);
            let _ = events_tx.send(ClientEvent::TransportError(e.to_string()));
            let _ = events_tx.send(ClientEvent::Closed);
        }
        None => {
            tracing::info!("Connection attempt to {} abandoned", url);
            client.dispatch(ClientEvent::Closed);
        }
    }
    drop(events_tx);

    while client.state() != ConnectionState::Closed {
        let next = if client.state() == ConnectionState::Closing && client.quit_requested() {
            match tokio::time::timeout(CLOSE_HANDSHAKE_TIMEOUT, events_rx.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::warn!("Server did not answer the close request");
                    Some(ClientEvent::Closed)
                }
            }
        } else {
            events_rx.recv().await
        };

        let Some(event) = next else {
            break;
        };

        client.dispatch(event);
    }

    for task in tasks {
        task.abort();
    }

    let result = client.outcome();
    SessionOutcome {
        view: client.into_view(),
        result,
    }
}

/// Forward inbound socket traffic as client events, ending with `Closed`
async fn read_frames(
    mut read: SplitStream<WsStream>,
    events_tx: mpsc::UnboundedSender<ClientEvent>,
) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let event = ClientEvent::FrameReceived(text.as_str().to_owned());
                if events_tx.send(event).is_err() {
                    return;
                }
            }
            Ok(Message::Binary(data)) => {
                tracing::warn!("Ignoring {} bytes of binary data", data.len());
            }
            Ok(Message::Close(frame)) => {
                tracing::info!("Server closed the connection: {:?}", frame);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                let _ = events_tx.send(ClientEvent::TransportError(e.to_string()));
                break;
            }
        }
    }

    let _ = events_tx.send(ClientEvent::Closed);
}

/// Drain queued frames into the socket
async fn write_frames(
    mut write: SplitSink<WsStream, Message>,
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
    events_tx: mpsc::UnboundedSender<ClientEvent>,
) {
    while let Some(outbound) = outbound_rx.recv().await {
        match outbound {
            Outbound::Text(text) => {
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    tracing::warn!("Failed to send message: {}", e);
                    let _ = events_tx.send(ClientEvent::TransportError(e.to_string()));
                    break;
                }
            }
            Outbound::Close => {
                if let Err(e) = write.send(Message::Close(None)).await {
                    tracing::debug!("Failed to send close frame: {}", e);
                }
                break;
            }
        }
    }
}
