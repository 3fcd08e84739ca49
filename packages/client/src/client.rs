//! The chat client: connection state, message log and input in one object.
//!
//! Every event goes through [`ChatClient::dispatch`] and each handler runs to
//! completion before the next event is taken, so the client never needs a
//! lock. The session runner feeds it from the socket and the line editor;
//! tests feed it synthetic events directly.

use std::sync::Arc;

use chatterm_shared::time::Clock;

use crate::{
    domain::{ChatMessage, ClientEvent, ConnectionState, InputField, KeyPress, Sender},
    error::ClientError,
    sink::FrameSink,
    view::MessageView,
};

pub const WELCOME_MESSAGE: &str = "Welcome! How can I help you today?";
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Please restart the client.";
pub const DISCONNECTED_MESSAGE: &str = "Disconnected. Please restart the client to reconnect.";

/// Single chat client for one connection
pub struct ChatClient<V, S> {
    state: ConnectionState,
    view: V,
    sink: S,
    input: InputField,
    clock: Arc<dyn Clock>,
    /// First transport error reported on this connection
    last_error: Option<String>,
    /// The user asked to leave; the close that follows is not a failure
    user_closed: bool,
}

impl<V: MessageView, S: FrameSink> ChatClient<V, S> {
    pub fn new(view: V, sink: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: ConnectionState::Connecting,
            view,
            sink,
            input: InputField::new(),
            clock,
            last_error: None,
            user_closed: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Whether the user asked to leave
    pub fn quit_requested(&self) -> bool {
        self.user_closed
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// How the connection ended, once it has
    ///
    /// # Returns
    ///
    /// `Ok(())` if the user asked to leave, `ConnectionError` if a transport
    /// error was reported, `ConnectionClosed` otherwise
    pub fn outcome(&self) -> Result<(), ClientError> {
        if self.user_closed {
            return Ok(());
        }
        match &self.last_error {
            Some(reason) => Err(ClientError::ConnectionError(reason.clone())),
            None => Err(ClientError::ConnectionClosed),
        }
    }

    /// Route an event to its handler
    pub fn dispatch(&mut self, event: ClientEvent) {
        tracing::trace!("Dispatching {:?} event", event.kind());

        match event {
            ClientEvent::Opened => self.on_open(),
            ClientEvent::FrameReceived(text) => self.on_message(text),
            ClientEvent::TransportError(reason) => self.on_error(reason),
            ClientEvent::Closed => self.on_close(),
            ClientEvent::InputChanged(value) => self.input.set(value),
            ClientEvent::SendTriggered => self.on_send(),
            ClientEvent::KeyPressed(key) => self.on_key_press(key),
            ClientEvent::QuitRequested => self.on_quit(),
        }
    }

    fn on_open(&mut self) {
        if self.state != ConnectionState::Connecting {
            tracing::debug!("Ignoring open event in state {:?}", self.state);
            return;
        }

        self.state = ConnectionState::Open;
        tracing::info!("Connected to chat service");
        self.render(Sender::System, WELCOME_MESSAGE);
    }

    fn on_message(&mut self, text: String) {
        self.render(Sender::Bot, text);
    }

    fn on_error(&mut self, reason: String) {
        tracing::warn!("WebSocket error: {}", reason);

        if self.state == ConnectionState::Closed || self.last_error.is_some() {
            return;
        }

        self.last_error = Some(reason);
        self.state = ConnectionState::Closing;
        if !self.user_closed {
            self.render(Sender::System, CONNECTION_ERROR_MESSAGE);
        }
    }

    fn on_close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }

        self.state = ConnectionState::Closed;
        tracing::info!("Disconnected from chat service");
        if !self.user_closed {
            self.render(Sender::System, DISCONNECTED_MESSAGE);
        }
    }

    fn on_send(&mut self) {
        let text = self.input.trimmed().to_string();
        if text.is_empty() || self.state != ConnectionState::Open {
            tracing::debug!(
                "Dropping send (empty: {}, state: {:?})",
                text.is_empty(),
                self.state
            );
            return;
        }

        self.render(Sender::You, text.as_str());
        if let Err(e) = self.sink.send_frame(&text) {
            self.on_error(e.to_string());
        }
        self.input.clear();
    }

    fn on_key_press(&mut self, key: KeyPress) {
        if key.is_submit() {
            self.on_send();
        }
    }

    fn on_quit(&mut self) {
        if matches!(
            self.state,
            ConnectionState::Closing | ConnectionState::Closed
        ) {
            self.user_closed = true;
            return;
        }

        self.user_closed = true;
        self.state = ConnectionState::Closing;
        if let Err(e) = self.sink.close() {
            tracing::debug!("Close request not delivered: {}", e);
        }
    }

    fn render(&mut self, sender: Sender, text: impl Into<String>) {
        let message = ChatMessage::new(sender, text, self.clock.now_millis());
        self.view.append(&message);
        self.view.scroll_to_bottom();
    }
}
