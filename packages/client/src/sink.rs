//! Outbound frame delivery.

use tokio::sync::mpsc;

use crate::error::ClientError;

/// Outbound traffic handed to the socket writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// One text frame
    Text(String),
    /// Begin the closing handshake
    Close,
}

/// Fire-and-forget frame transmission
///
/// Implementations must not block: the caller runs on the client's event
/// loop and there is no acknowledgment of delivery.
pub trait FrameSink {
    /// Queue one text frame
    fn send_frame(&mut self, text: &str) -> Result<(), ClientError>;

    /// Queue the closing handshake
    fn close(&mut self) -> Result<(), ClientError>;
}

/// [`FrameSink`] backed by an unbounded channel drained by the writer task
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end for the writer task
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl FrameSink for ChannelSink {
    fn send_frame(&mut self, text: &str) -> Result<(), ClientError> {
        self.tx
            .send(Outbound::Text(text.to_string()))
            .map_err(|_| ClientError::SinkClosed)
    }

    fn close(&mut self) -> Result<(), ClientError> {
        self.tx
            .send(Outbound::Close)
            .map_err(|_| ClientError::SinkClosed)
    }
}
