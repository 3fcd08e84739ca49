//! Message log views.
//!
//! [`MessageLog`] is the in-memory scrollback shared by every view;
//! [`TerminalView`] additionally prints each entry and redraws the prompt.

use std::io::Write;

use crate::{domain::ChatMessage, formatter::MessageFormatter};

/// Prompt shown by the line editor
pub const PROMPT: &str = "> ";

/// Return to column 0 and erase the half-typed input line
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Default number of visible lines in the log
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 24;

/// A scrollable container of rendered messages
pub trait MessageView {
    /// Append one message to the end of the log
    fn append(&mut self, message: &ChatMessage);

    /// Move the scroll position to the newest line
    fn scroll_to_bottom(&mut self);
}

/// In-memory scrollback
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
    line_count: usize,
    viewport_height: usize,
    scroll_top: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl MessageLog {
    pub fn new(viewport_height: usize) -> Self {
        Self {
            messages: Vec::new(),
            line_count: 0,
            viewport_height,
            scroll_top: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total number of rendered lines
    pub fn scroll_height(&self) -> usize {
        self.line_count
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Largest valid scroll position
    pub fn max_scroll(&self) -> usize {
        self.line_count.saturating_sub(self.viewport_height)
    }

    /// Scroll to `top`, clamped to the valid range
    pub fn scroll_to(&mut self, top: usize) {
        self.scroll_top = top.min(self.max_scroll());
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top == self.max_scroll()
    }
}

impl MessageView for MessageLog {
    fn append(&mut self, message: &ChatMessage) {
        self.line_count += MessageFormatter::line_count(message);
        self.messages.push(message.clone());
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll();
    }
}

/// Log view printed to a terminal (stdout in the binary)
///
/// The line editor owns the current line, so every printed message starts
/// on a fresh line and the prompt is redrawn afterwards.
pub struct TerminalView<W: Write> {
    log: MessageLog,
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            log: MessageLog::default(),
            out,
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redisplay_prompt(&mut self) {
        if let Err(e) = write!(self.out, "{}", PROMPT).and_then(|_| self.out.flush()) {
            tracing::debug!("Failed to redraw prompt: {}", e);
        }
    }
}

impl<W: Write> MessageView for TerminalView<W> {
    fn append(&mut self, message: &ChatMessage) {
        self.log.append(message);

        let formatted = MessageFormatter::format_message(message);
        if let Err(e) = write!(self.out, "{}{}", CLEAR_LINE, formatted) {
            tracing::warn!("Failed to write message to terminal: {}", e);
        }
    }

    fn scroll_to_bottom(&mut self) {
        // Printing already leaves the newest line at the bottom of the terminal.
        self.log.scroll_to_bottom();
        self.redisplay_prompt();
    }
}
