//! Client-side domain types.
//!
//! Everything here is plain data without I/O, so handlers built on top of
//! these types can be driven by synthetic events in tests.

use std::fmt;

/// Who a displayed message is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// Text typed locally and sent over the connection
    You,
    /// Text received from the server
    Bot,
    /// Locally generated connection-state notice
    System,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::You => "You",
            Sender::Bot => "Bot",
            Sender::System => "System",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the visible message log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// Unix timestamp (milliseconds) at which the entry was created
    pub sent_at: i64,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>, sent_at: i64) -> Self {
        Self {
            sender,
            text: text.into(),
            sent_at,
        }
    }
}

/// Lifecycle of the single WebSocket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// The single-line text input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Value with leading and trailing whitespace removed
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Keys the client reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
}

/// A key press in the text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            shift: false,
        }
    }

    pub fn shift_enter() -> Self {
        Self {
            key: Key::Enter,
            shift: true,
        }
    }

    /// Enter without a modifier submits the input
    pub fn is_submit(&self) -> bool {
        self.key == Key::Enter && !self.shift
    }
}

/// Everything that can happen to a client, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The WebSocket handshake completed
    Opened,
    /// One inbound text frame
    FrameReceived(String),
    /// Transport-level failure
    TransportError(String),
    /// The connection is gone
    Closed,
    /// The text input now holds this value
    InputChanged(String),
    /// The send control was activated
    SendTriggered,
    /// A key was pressed while the input had focus
    KeyPressed(KeyPress),
    /// The user asked to leave (Ctrl+C / Ctrl+D)
    QuitRequested,
}

/// Discriminant of [`ClientEvent`], used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Open,
    Message,
    Error,
    Close,
    Input,
    Click,
    KeyPress,
    Quit,
}

impl ClientEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ClientEvent::Opened => EventKind::Open,
            ClientEvent::FrameReceived(_) => EventKind::Message,
            ClientEvent::TransportError(_) => EventKind::Error,
            ClientEvent::Closed => EventKind::Close,
            ClientEvent::InputChanged(_) => EventKind::Input,
            ClientEvent::SendTriggered => EventKind::Click,
            ClientEvent::KeyPressed(_) => EventKind::KeyPress,
            ClientEvent::QuitRequested => EventKind::Quit,
        }
    }
}
